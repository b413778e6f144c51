//! User expression compilation and evaluation.
//!
//! Rule fields may hold CEL expressions wrapped in backticks. An expression is
//! a *callable* over exactly one input:
//!
//! - `` `(v) => v > 5` `` binds the input to `v`
//! - `` `v => v > 5` `` is the same without parentheses
//! - `` `value > 5` `` binds the input to a default name (`value` for
//!   property expressions, `meta` for metadata scripts)
//!
//! Every call compiles the source afresh and runs it synchronously against a
//! context that holds only the input. Nothing is cached and nothing outlives
//! the call, so unrelated evaluations cannot observe each other.

use crate::error::EvaluationFailure;
use crate::value::{display, to_cel};
use cel_interpreter::{Context, Program, Value};
use regex::Regex;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::LazyLock;

/// Name bound to the input of a bare property expression.
pub const VALUE_PARAM: &str = "value";

/// Name bound to the input of a bare metadata script.
pub const META_PARAM: &str = "meta";

static CALLABLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*\)|([A-Za-z_][A-Za-z0-9_]*))\s*=>")
        .expect("callable header pattern is valid")
});

/// How a rule field is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource<'a> {
    /// Nothing was entered.
    Empty,
    /// Used verbatim.
    Literal(&'a str),
    /// The body between the backticks.
    Expression(&'a str),
}

impl<'a> FieldSource<'a> {
    /// Classifies a raw field. Only a value wrapped in exactly one pair of
    /// backticks with a non-empty body is an expression.
    pub fn parse(raw: &'a str) -> Self {
        if raw.is_empty() {
            return FieldSource::Empty;
        }

        match raw.strip_prefix('`').and_then(|rest| rest.strip_suffix('`')) {
            Some(body) if !body.is_empty() => FieldSource::Expression(body),
            _ => FieldSource::Literal(raw),
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, FieldSource::Expression(_))
    }
}

/// Trims a metadata script and removes one optional enclosing pair of backticks.
pub fn strip_script_wrapper(script: &str) -> &str {
    let trimmed = script.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('`') && trimmed.ends_with('`') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// A compiled single-argument expression.
#[derive(Debug)]
pub struct Callable {
    param: String,
    program: Program,
}

impl Callable {
    /// Compiles `source`, splitting off an optional `(param) =>` header.
    pub fn compile(source: &str, default_param: &str) -> Result<Self, EvaluationFailure> {
        let (param, body) = match CALLABLE_HEADER.captures(source) {
            Some(caps) => {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map_or(default_param, |m| m.as_str());
                let header_len = caps.get(0).map_or(0, |m| m.end());
                (name, &source[header_len..])
            }
            None => (default_param, source),
        };

        if body.trim().is_empty() {
            return Err(EvaluationFailure::Compile("expression body is empty".to_string()));
        }

        let program = guarded(|| Program::compile(body))
            .map_err(EvaluationFailure::Compile)?
            .map_err(|e| EvaluationFailure::Compile(e.to_string()))?;

        Ok(Self {
            param: param.to_string(),
            program,
        })
    }

    /// The name the input is bound to.
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Runs the program with `input` bound to the parameter.
    pub fn call(&self, input: &serde_json::Value) -> Result<Value, EvaluationFailure> {
        let mut context = Context::default();
        context.add_variable_from_value(self.param.as_str(), to_cel(input));

        guarded(|| self.program.execute(&context))
            .map_err(EvaluationFailure::Runtime)?
            .map_err(|e| EvaluationFailure::Runtime(e.to_string()))
    }
}

/// Runs `f`, turning a panic inside the CEL parser or interpreter into an
/// error message. Some malformed sources (an unterminated string literal) and
/// some arithmetic (`-v` on the smallest integer) panic there instead of
/// returning an error.
///
/// wasm32 builds abort on panic, so there this only helps native callers.
fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "expression engine panicked".to_string()
    }
}

/// Compiles and runs `source` against `input`, binding bare bodies to `value`.
pub fn evaluate(source: &str, input: &serde_json::Value) -> Result<Value, EvaluationFailure> {
    evaluate_with(source, VALUE_PARAM, input)
}

/// Like [`evaluate`], with a caller-chosen default parameter name.
pub fn evaluate_with(
    source: &str,
    default_param: &str,
    input: &serde_json::Value,
) -> Result<Value, EvaluationFailure> {
    Callable::compile(source, default_param)?.call(input)
}

/// Resolves a templated field against a property value.
///
/// Returns `None` when `source` is not backtick-delimited (the caller keeps
/// the literal) or when evaluation fails (logged).
pub fn evaluate_template(source: &str, value: &serde_json::Value) -> Option<String> {
    let FieldSource::Expression(body) = FieldSource::parse(source) else {
        return None;
    };

    match evaluate(body, value) {
        Ok(result) => Some(display(&result)),
        Err(e) => {
            log::warn!("error evaluating dynamic string `{}`: {}", body, e);
            None
        }
    }
}
