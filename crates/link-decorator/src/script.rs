//! Whole-metadata script rules.
//!
//! A `metadata` rule's `value` is a callable over
//! `{ name, frontmatter, tags }` that returns a map describing the decoration:
//!
//! ```text
//! (meta) => {
//!   'before': {'icon': 'star', 'text': '!'},
//!   'after': {'icon': 'flag'},
//!   'classname': meta.frontmatter.status == 'done' ? 'is-done' : ''
//! }
//! ```

use crate::context::MetadataSnapshot;
use crate::decoration::MatchedRule;
use crate::expression::{evaluate_with, strip_script_wrapper, META_PARAM};
use crate::types::{DecorationRule, Position};
use crate::value::{display, is_truthy, map_field};
use cel_interpreter::objects::Map;
use cel_interpreter::Value;

/// Runs a metadata script and turns its result into zero, one or two matches.
///
/// Script failures and unusable results produce no matches.
pub fn match_script(rule: &DecorationRule, snapshot: &MetadataSnapshot) -> Vec<MatchedRule> {
    let script = strip_script_wrapper(&rule.value);
    let input = snapshot.script_input();

    let result = match evaluate_with(script, META_PARAM, &input) {
        Ok(result) => result,
        Err(e) => {
            log::warn!("error evaluating metadata script for rule '{}': {}", rule.id, e);
            return Vec::new();
        }
    };

    match result {
        Value::Map(map) => matches_from_map(rule, &map),
        other => {
            if is_truthy(&other) {
                log::debug!(
                    "metadata script for rule '{}' returned a non-map value; ignoring it",
                    rule.id
                );
            }
            Vec::new()
        }
    }
}

fn matches_from_map(rule: &DecorationRule, result: &Map) -> Vec<MatchedRule> {
    let classname = string_field(result, "classname");
    let mut matches = Vec::new();

    for position in [Position::Before, Position::After] {
        let Some(side) = present_field(result, position.as_str()) else {
            continue;
        };

        let mut matched = side_match(rule, position, &classname);
        if let Value::Map(side) = side {
            matched.icon = string_field(side, "icon");
            matched.text = string_field(side, "text");
        }
        matches.push(matched);
    }

    if matches.is_empty() && !classname.is_empty() {
        matches.push(side_match(rule, Position::After, &classname));
    }

    matches
}

fn side_match(rule: &DecorationRule, position: Position, classname: &str) -> MatchedRule {
    let mut matched = MatchedRule::from_rule(rule);
    matched.position = position;
    matched.icon.clear();
    matched.text.clear();
    matched.css_class.clear();
    matched.push_class(classname);
    matched
}

/// A field counts as present only when it holds a truthy value.
fn present_field<'a>(map: &'a Map, name: &str) -> Option<&'a Value> {
    map_field(map, name).filter(|v| is_truthy(v))
}

fn string_field(map: &Map, name: &str) -> String {
    present_field(map, name).map(display).unwrap_or_default()
}
