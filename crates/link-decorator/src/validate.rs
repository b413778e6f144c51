//! Authoring-time syntax checks for rule expressions.
//!
//! Nothing here executes user code: sources are compiled and dropped.

use crate::expression::{strip_script_wrapper, Callable, FieldSource, META_PARAM, VALUE_PARAM};
use crate::types::{DecorationRule, Target};
use serde::{Deserialize, Serialize};

/// Outcome of compiling a source without running it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }
}

/// Compiles `source` as a callable body.
pub fn validate_source(source: &str) -> SourceValidation {
    compile_check(source, VALUE_PARAM)
}

fn compile_check(source: &str, default_param: &str) -> SourceValidation {
    match Callable::compile(source, default_param) {
        Ok(_) => SourceValidation::ok(),
        Err(e) => SourceValidation::failed(e.message()),
    }
}

/// Validates a rule field. Literal and empty fields are always valid.
pub fn validate_field(raw: &str) -> SourceValidation {
    match FieldSource::parse(raw) {
        FieldSource::Expression(body) => validate_source(body),
        FieldSource::Empty | FieldSource::Literal(_) => SourceValidation::ok(),
    }
}

/// Validates a metadata script, with or without its backtick wrapper.
pub fn validate_script(script: &str) -> SourceValidation {
    compile_check(strip_script_wrapper(script), META_PARAM)
}

/// A syntax problem in one field of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiagnostic {
    pub rule_id: String,
    pub field: &'static str,
    pub message: String,
}

/// Checks the key and every expression-bearing field of `rule`.
pub fn validate_rule(rule: &DecorationRule) -> Vec<FieldDiagnostic> {
    let mut checks: Vec<(&'static str, SourceValidation)> = Vec::new();

    match rule.target {
        Target::Metadata => {
            checks.push(("value", validate_script(&rule.value)));
        }
        Target::Tag | Target::Frontmatter => {
            if rule.key.trim().is_empty() {
                let missing = SourceValidation::failed("no key set; the rule never matches");
                checks.push(("key", missing));
            }
            if rule.target == Target::Frontmatter {
                checks.push(("value", validate_field(&rule.value)));
            }
            checks.push(("text", validate_field(&rule.text)));
            checks.push(("icon", validate_field(&rule.icon)));
            checks.push(("cssClass", validate_field(&rule.css_class)));
        }
    }

    checks
        .into_iter()
        .filter_map(|(field, check)| {
            check.error.map(|message| FieldDiagnostic {
                rule_id: rule.id.clone(),
                field,
                message,
            })
        })
        .collect()
}
