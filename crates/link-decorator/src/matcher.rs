//! Matching of `tag` and `frontmatter` rules.

use crate::context::MetadataSnapshot;
use crate::decoration::MatchedRule;
use crate::expression::{evaluate, evaluate_template, FieldSource};
use crate::types::{DecorationRule, Target};
use crate::value::{is_truthy, stringify};
use cel_interpreter::Value;

/// Whether a rule applies, and the class its predicate produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleMatch {
    pub matched: bool,
    pub dynamic_class: Option<String>,
}

impl RuleMatch {
    fn no() -> Self {
        Self::default()
    }

    fn yes() -> Self {
        Self {
            matched: true,
            dynamic_class: None,
        }
    }

    fn with_class(class: String) -> Self {
        Self {
            matched: true,
            dynamic_class: Some(class),
        }
    }
}

/// Decides whether a `tag` or `frontmatter` rule applies to the snapshot.
///
/// `metadata` rules never match here; they go through
/// [`crate::script::match_script`].
pub fn match_rule(rule: &DecorationRule, snapshot: &MetadataSnapshot) -> RuleMatch {
    match rule.target {
        Target::Tag => {
            if snapshot.has_tag_or_descendant(&rule.tag_key()) {
                RuleMatch::yes()
            } else {
                RuleMatch::no()
            }
        }
        Target::Frontmatter => match snapshot.property(&rule.key) {
            Some(value) => match_property(rule, value),
            None => RuleMatch::no(),
        },
        Target::Metadata => RuleMatch::no(),
    }
}

fn match_property(rule: &DecorationRule, value: &serde_json::Value) -> RuleMatch {
    match FieldSource::parse(&rule.value) {
        FieldSource::Empty => RuleMatch::yes(),
        FieldSource::Literal(literal) => {
            if stringify(value) == literal {
                RuleMatch::yes()
            } else {
                RuleMatch::no()
            }
        }
        FieldSource::Expression(body) => match evaluate(body, value) {
            Ok(Value::String(s)) if !s.is_empty() => RuleMatch::with_class(s.to_string()),
            Ok(result) if is_truthy(&result) => RuleMatch::yes(),
            Ok(_) => RuleMatch::no(),
            Err(e) => {
                log::warn!("error evaluating rule '{}' predicate: {}", rule.id, e);
                RuleMatch::no()
            }
        },
    }
}

/// Matches a `tag` or `frontmatter` rule and resolves its output.
///
/// For frontmatter matches, templated `text`, `icon` and `cssClass` fields are
/// evaluated against the property value. A templated class is appended after
/// the predicate's class and replaces the literal class.
pub fn match_property_rule(
    rule: &DecorationRule,
    snapshot: &MetadataSnapshot,
) -> Option<MatchedRule> {
    let result = match_rule(rule, snapshot);
    if !result.matched {
        return None;
    }

    let mut matched = MatchedRule::from_rule(rule);
    if let Some(class) = result.dynamic_class {
        matched.push_class(class);
    }

    if rule.target == Target::Frontmatter {
        if let Some(value) = snapshot.property(&rule.key) {
            if let Some(text) = evaluate_template(&rule.text, value) {
                matched.text = text;
            }
            if let Some(icon) = evaluate_template(&rule.icon, value) {
                matched.icon = icon;
            }
            if let Some(class) = evaluate_template(&rule.css_class, value) {
                matched.push_class(class);
                matched.css_class.clear();
            }
        }
    }

    Some(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tag_rule(key: &str) -> DecorationRule {
        let mut rule = DecorationRule::new("tag-rule");
        rule.key = key.to_string();
        rule
    }

    fn frontmatter_rule(key: &str, value: &str) -> DecorationRule {
        let mut rule = DecorationRule::new("fm-rule");
        rule.target = Target::Frontmatter;
        rule.key = key.to_string();
        rule.value = value.to_string();
        rule
    }

    fn create_test_snapshot() -> MetadataSnapshot {
        MetadataSnapshot::new("Note")
            .with_tag("#project/alpha")
            .with_property("status", json!("done"))
            .with_property("priority", json!(42))
            .with_property("draft", json!(false))
            .with_property("owner", serde_json::Value::Null)
    }

    #[test]
    fn test_tag_rule_matches_exact_and_descendant() {
        let snapshot = create_test_snapshot();
        assert!(match_rule(&tag_rule("project"), &snapshot).matched);
        assert!(match_rule(&tag_rule("#project"), &snapshot).matched);
        assert!(match_rule(&tag_rule("project/alpha"), &snapshot).matched);
        assert!(!match_rule(&tag_rule("proj"), &snapshot).matched);
        assert!(!match_rule(&tag_rule("alpha"), &snapshot).matched);
    }

    #[test]
    fn test_tag_rule_ignores_value_expression() {
        let mut rule = tag_rule("project");
        rule.value = "`(v) => false`".to_string();
        assert!(match_rule(&rule, &create_test_snapshot()).matched);
    }

    #[test]
    fn test_missing_property_does_not_match() {
        let rule = frontmatter_rule("missing", "");
        assert_eq!(match_rule(&rule, &create_test_snapshot()), RuleMatch::no());
    }

    #[test]
    fn test_wildcard_matches_falsy_values() {
        let snapshot = create_test_snapshot();
        assert!(match_rule(&frontmatter_rule("draft", ""), &snapshot).matched);
        assert!(match_rule(&frontmatter_rule("owner", ""), &snapshot).matched);
    }

    #[test]
    fn test_literal_match_stringifies() {
        let snapshot = create_test_snapshot();
        assert!(match_rule(&frontmatter_rule("priority", "42"), &snapshot).matched);
        assert!(match_rule(&frontmatter_rule("status", "done"), &snapshot).matched);
        assert!(!match_rule(&frontmatter_rule("status", "Done"), &snapshot).matched);
        assert!(match_rule(&frontmatter_rule("draft", "false"), &snapshot).matched);
        assert!(match_rule(&frontmatter_rule("owner", "null"), &snapshot).matched);
    }

    #[test]
    fn test_literal_match_against_object_property() {
        let snapshot = MetadataSnapshot::default().with_property("meta", json!({"a": 1}));
        assert!(match_rule(&frontmatter_rule("meta", "[object Object]"), &snapshot).matched);
        assert!(!match_rule(&frontmatter_rule("meta", r#"{"a":1}"#), &snapshot).matched);

        let mut rule = frontmatter_rule("meta", "");
        rule.text = "`(v) => v`".to_string();
        let matched = match_property_rule(&rule, &snapshot).unwrap();
        assert_eq!(matched.text, "[object Object]");
    }

    #[test]
    fn test_expression_predicate() {
        let big = MetadataSnapshot::default().with_property("n", json!(10));
        let small = MetadataSnapshot::default().with_property("n", json!(3));

        let rule = frontmatter_rule("n", "`(v) => v > 5`");
        assert_eq!(match_rule(&rule, &big), RuleMatch::yes());
        assert_eq!(match_rule(&rule, &small), RuleMatch::no());

        let classy = frontmatter_rule("n", "`(v) => v > 5 ? 'big' : ''`");
        assert_eq!(match_rule(&classy, &big), RuleMatch::with_class("big".to_string()));
        assert_eq!(match_rule(&classy, &small), RuleMatch::no());
    }

    #[test]
    fn test_broken_expression_does_not_match() {
        let rule = frontmatter_rule("status", "`(`");
        assert!(!match_rule(&rule, &create_test_snapshot()).matched);

        let runtime = frontmatter_rule("status", "`(v) => v.nope.deeper`");
        assert!(!match_rule(&runtime, &create_test_snapshot()).matched);
    }

    #[test]
    fn test_metadata_rule_never_matches_here() {
        let mut rule = DecorationRule::new("m");
        rule.target = Target::Metadata;
        rule.value = "{'classname': 'x'}".to_string();
        assert!(!match_rule(&rule, &create_test_snapshot()).matched);
    }

    #[test]
    fn test_templated_fields_override_literals() {
        let mut rule = frontmatter_rule("priority", "");
        rule.text = "`(v) => 'P' + string(v)`".to_string();
        rule.icon = "flag".to_string();
        rule.css_class = "`(v) => v > 10 ? 'urgent' : 'calm'`".to_string();

        let matched = match_property_rule(&rule, &create_test_snapshot()).unwrap();
        assert_eq!(matched.text, "P42");
        assert_eq!(matched.icon, "flag");
        assert_eq!(matched.dynamic_classes, vec!["urgent"]);
        assert!(matched.css_class.is_empty());
    }

    #[test]
    fn test_predicate_class_precedes_template_class() {
        let mut rule = frontmatter_rule("priority", "`(v) => 'high'`");
        rule.css_class = "`(v) => 'p' + string(v)`".to_string();

        let matched = match_property_rule(&rule, &create_test_snapshot()).unwrap();
        assert_eq!(matched.dynamic_css_class(), "high p42");
    }

    #[test]
    fn test_failed_template_keeps_literal() {
        let mut rule = frontmatter_rule("status", "done");
        rule.text = "`(`".to_string();
        rule.css_class = "plain".to_string();

        let matched = match_property_rule(&rule, &create_test_snapshot()).unwrap();
        assert_eq!(matched.text, "`(`");
        assert_eq!(matched.css_class, "plain");
        assert!(matched.dynamic_classes.is_empty());
    }

    #[test]
    fn test_tag_rule_keeps_literal_fields() {
        let mut rule = tag_rule("project");
        rule.text = "`(v) => 'x'`".to_string();
        let matched = match_property_rule(&rule, &create_test_snapshot()).unwrap();
        assert_eq!(matched.text, "`(v) => 'x'`");
    }
}
