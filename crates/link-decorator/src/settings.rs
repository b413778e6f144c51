//! Decorator settings and rule construction.

use crate::error::{DecoratorError, Result};
use crate::types::{DecorationRule, Position, Target};
use crate::validate::{validate_rule, FieldDiagnostic};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The persisted settings document: an ordered rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorSettings {
    /// Rules, in evaluation order.
    #[serde(default)]
    pub rules: Vec<DecorationRule>,
}

impl DecoratorSettings {
    /// Creates empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the settings.
    pub fn with_rule(mut self, rule: DecorationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Parses settings from YAML. Any well-formed document loads; rule
    /// problems are reported by [`Self::diagnostics`].
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the settings to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| DecoratorError::SerializationError(e.to_string()))
    }

    /// Serializes the settings to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DecoratorError::SerializationError(e.to_string()))
    }

    /// Authoring problems across all rules, in rule order.
    ///
    /// A missing or repeated id is reported here rather than failing the load,
    /// so one bad rule never hides the decorations of the others.
    pub fn diagnostics(&self) -> Vec<FieldDiagnostic> {
        let mut diagnostics = Vec::new();
        let mut seen = HashSet::new();

        for (index, rule) in self.rules.iter().enumerate() {
            let id_problem = if rule.id.is_empty() {
                Some(format!("rule #{} has no id", index + 1))
            } else if !seen.insert(rule.id.as_str()) {
                Some(format!("duplicate rule id '{}'", rule.id))
            } else {
                None
            };

            if let Some(message) = id_problem {
                diagnostics.push(FieldDiagnostic {
                    rule_id: rule.id.clone(),
                    field: "id",
                    message,
                });
            }
            diagnostics.extend(validate_rule(rule));
        }

        diagnostics
    }
}

/// Builder for creating rules.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    rule: DecorationRule,
}

impl RuleBuilder {
    /// Creates a new rule builder.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            rule: DecorationRule::new(id),
        }
    }

    /// Matches a tag and its descendants.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.rule.target = Target::Tag;
        self.rule.key = tag.into();
        self
    }

    /// Matches a frontmatter property against `value` (literal, expression or empty).
    pub fn frontmatter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.rule.target = Target::Frontmatter;
        self.rule.key = key.into();
        self.rule.value = value.into();
        self
    }

    /// Runs a whole-metadata script.
    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.rule.target = Target::Metadata;
        self.rule.key.clear();
        self.rule.value = script.into();
        self
    }

    /// Sets the text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.rule.text = text.into();
        self
    }

    /// Sets the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.rule.icon = icon.into();
        self
    }

    /// Sets the position.
    pub fn position(mut self, position: Position) -> Self {
        self.rule.position = position;
        self
    }

    /// Places the decoration before the link.
    pub fn before(self) -> Self {
        self.position(Position::Before)
    }

    /// Places the decoration after the link.
    pub fn after(self) -> Self {
        self.position(Position::After)
    }

    /// Sets the CSS class.
    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.rule.css_class = class.into();
        self
    }

    /// Builds the rule.
    pub fn build(self) -> DecorationRule {
        self.rule
    }
}
