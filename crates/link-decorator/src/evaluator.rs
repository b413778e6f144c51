//! Decoration engine: runs every rule against a snapshot, in declaration order.

use crate::context::MetadataSnapshot;
use crate::decoration::{resolve_decoration_style, Decorations, DecorationStyle, MatchedRule};
use crate::error::Result;
use crate::matcher::match_property_rule;
use crate::script::match_script;
use crate::settings::DecoratorSettings;
use crate::types::{DecorationRule, Target};

/// Finds every rule that applies to `snapshot`.
///
/// Output order follows `rules`; a metadata rule contributes up to two
/// entries at its own position in the list.
pub fn find_matching_rules(
    rules: &[DecorationRule],
    snapshot: &MetadataSnapshot,
) -> Vec<MatchedRule> {
    let mut matches = Vec::new();

    for rule in rules {
        match rule.target {
            Target::Metadata => matches.extend(match_script(rule, snapshot)),
            Target::Tag | Target::Frontmatter => {
                if let Some(matched) = match_property_rule(rule, snapshot) {
                    matches.push(matched);
                }
            }
        }
    }

    matches
}

/// Holds a rule list and decorates snapshots with it.
///
/// The engine is immutable once built; each call works on its own snapshot
/// and returns a fresh result.
#[derive(Debug, Clone, Default)]
pub struct DecorationEngine {
    rules: Vec<DecorationRule>,
}

impl DecorationEngine {
    /// Creates an engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates an engine from loaded settings.
    pub fn from_settings(settings: DecoratorSettings) -> Self {
        Self {
            rules: settings.rules,
        }
    }

    /// Appends a rule; it is evaluated after all existing ones.
    pub fn add_rule(&mut self, rule: DecorationRule) {
        self.rules.push(rule);
    }

    /// Loads settings from JSON or YAML and appends their rules.
    pub fn load_settings(&mut self, content: &str) -> Result<()> {
        let settings = crate::parser::parse_settings(content)?;
        self.rules.extend(settings.rules);
        Ok(())
    }

    pub fn rules(&self) -> &[DecorationRule] {
        &self.rules
    }

    /// Matches all rules against the snapshot.
    pub fn find_matching_rules(&self, snapshot: &MetadataSnapshot) -> Vec<MatchedRule> {
        find_matching_rules(&self.rules, snapshot)
    }

    /// Combined link class for the snapshot.
    pub fn style(&self, snapshot: &MetadataSnapshot) -> DecorationStyle {
        resolve_decoration_style(&self.find_matching_rules(snapshot))
    }

    /// Combined link class and ordered fragments for the snapshot.
    pub fn decorate(&self, snapshot: &MetadataSnapshot) -> Decorations {
        let matches = self.find_matching_rules(snapshot);
        let decorations = Decorations::from_matches(&matches);

        log::debug!(
            "decorated '{}': {} of {} rules matched, {} fragments",
            snapshot.basename,
            matches.len(),
            self.rules.len(),
            decorations.fragments.len()
        );

        decorations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;
    use serde_json::json;

    fn create_test_snapshot() -> MetadataSnapshot {
        MetadataSnapshot::new("Roadmap")
            .with_tag("#status/active")
            .with_property("priority", json!(8))
    }

    #[test]
    fn test_basic_evaluation() {
        let settings_yaml = r#"
rules:
  - id: active
    target: tag
    key: status
    icon: zap
    cssClass: is-active
  - id: urgent
    target: frontmatter
    key: priority
    value: "`(v) => v > 5 ? 'urgent' : ''`"
    text: "!"
    position: before
  - id: never
    target: tag
    key: archived
    text: old
"#;

        let mut engine = DecorationEngine::new();
        engine.load_settings(settings_yaml).unwrap();
        assert_eq!(engine.rules().len(), 3);

        let decorations = engine.decorate(&create_test_snapshot());
        assert_eq!(decorations.css_class, "is-active urgent");
        assert_eq!(decorations.fragments.len(), 2);
        assert_eq!(decorations.fragments[0].icon.as_deref(), Some("zap"));
        assert_eq!(decorations.fragments[1].position, Position::Before);
        assert_eq!(decorations.fragments[1].text.as_deref(), Some("!"));
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let mut first = DecorationRule::new("script");
        first.target = Target::Metadata;
        first.value = "(m) => {'classname': 'from-script'}".to_string();

        let mut second = DecorationRule::new("tag");
        second.key = "status".to_string();
        second.css_class = "from-tag".to_string();

        let mut engine = DecorationEngine::new();
        engine.add_rule(second.clone());
        engine.add_rule(first.clone());
        assert_eq!(engine.style(&create_test_snapshot()).css_class, "from-tag from-script");

        let ids: Vec<_> = find_matching_rules(&[first, second], &create_test_snapshot())
            .into_iter()
            .map(|m| m.rule.id)
            .collect();
        assert_eq!(ids, vec!["script", "tag"]);
    }

    #[test]
    fn test_no_rules_no_decorations() {
        let engine = DecorationEngine::new();
        assert!(engine.decorate(&create_test_snapshot()).is_empty());
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let mut rule = DecorationRule::new("p");
        rule.target = Target::Frontmatter;
        rule.key = "priority".to_string();
        rule.text = "`(v) => 'P' + string(v)`".to_string();

        let mut engine = DecorationEngine::new();
        engine.add_rule(rule);

        let snapshot = create_test_snapshot();
        let first = serde_json::to_string(&engine.decorate(&snapshot)).unwrap();
        let second = serde_json::to_string(&engine.decorate(&snapshot)).unwrap();
        assert_eq!(first, second);
    }
}
