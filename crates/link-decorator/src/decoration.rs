//! Matched rules and the decorations resolved from them.

use crate::hash::fragment_id;
use crate::types::{DecorationRule, Position};
use serde::{Deserialize, Serialize};

/// A rule that applied to a snapshot, with its output resolved.
///
/// The literal class and the computed classes are kept apart: computed
/// tokens are appended in the order they were produced and joined once by
/// [`resolve_decoration_style`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRule {
    /// The triggering rule, unchanged.
    pub rule: DecorationRule,
    pub text: String,
    pub icon: String,
    pub position: Position,
    pub css_class: String,
    pub dynamic_classes: Vec<String>,
}

impl MatchedRule {
    /// Starts from the rule's literal output.
    pub fn from_rule(rule: &DecorationRule) -> Self {
        Self {
            rule: rule.clone(),
            text: rule.text.clone(),
            icon: rule.icon.clone(),
            position: rule.position,
            css_class: rule.css_class.clone(),
            dynamic_classes: Vec::new(),
        }
    }

    /// Appends a computed class token; empty tokens are dropped.
    pub fn push_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !class.is_empty() {
            self.dynamic_classes.push(class);
        }
    }

    /// Computed classes, space-joined.
    pub fn dynamic_css_class(&self) -> String {
        self.dynamic_classes.join(" ")
    }

    /// Computed classes followed by the literal class.
    pub fn combined_class(&self) -> String {
        self.dynamic_classes
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.css_class.as_str()))
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True if the match renders an icon or text, not just styling.
    pub fn has_content(&self) -> bool {
        !self.text.is_empty() || !self.icon.is_empty()
    }

    /// The renderable unit for this match, if it has any content.
    pub fn fragment(&self) -> Option<DecorationFragment> {
        if !self.has_content() {
            return None;
        }

        Some(DecorationFragment {
            text: non_empty(&self.text),
            icon: non_empty(&self.icon),
            position: self.position,
            css_class: self.combined_class(),
            stable_id: fragment_id(&self.rule.id, self.position, &self.text, &self.icon),
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// One icon/text unit attached to one side of a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationFragment {
    pub text: Option<String>,
    pub icon: Option<String>,
    pub position: Position,
    pub css_class: String,
    /// Same rule, side, text and icon always give the same id.
    pub stable_id: String,
}

/// Styling applied to the link itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationStyle {
    pub css_class: String,
}

/// Merges the classes of all matches, in order.
pub fn resolve_decoration_style(matches: &[MatchedRule]) -> DecorationStyle {
    let css_class = matches
        .iter()
        .map(MatchedRule::combined_class)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    DecorationStyle { css_class }
}

/// Everything a presentation surface needs for one link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decorations {
    /// Combined class for the link text.
    pub css_class: String,

    /// Fragments in rule declaration order.
    pub fragments: Vec<DecorationFragment>,

    /// Number of matches the decorations were resolved from.
    pub match_count: usize,
}

impl Decorations {
    /// Resolves the style and fragments of a match list.
    pub fn from_matches(matches: &[MatchedRule]) -> Self {
        Self {
            css_class: resolve_decoration_style(matches).css_class,
            fragments: matches.iter().filter_map(MatchedRule::fragment).collect(),
            match_count: matches.len(),
        }
    }

    /// True if no rule matched.
    pub fn is_empty(&self) -> bool {
        self.match_count == 0
    }

    /// Fragments attached to one side, in order.
    pub fn on_side(&self, position: Position) -> impl Iterator<Item = &DecorationFragment> {
        self.fragments.iter().filter(move |f| f.position == position)
    }
}
