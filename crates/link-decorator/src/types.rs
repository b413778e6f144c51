//! Core types for the decoration engine.

use serde::{Deserialize, Serialize};

/// Which part of the linked document's metadata a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Tag,
    Frontmatter,
    /// Whole-metadata script; the script result decides the decoration shape.
    Metadata,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Tag => "tag",
            Target::Frontmatter => "frontmatter",
            Target::Metadata => "metadata",
        }
    }
}

/// Side of the link a decoration attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Before,
    #[default]
    After,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Before => "before",
            Position::After => "after",
        }
    }

    /// Widget side bias used by the editor surface.
    pub fn side(&self) -> i8 {
        match self {
            Position::Before => -1,
            Position::After => 1,
        }
    }
}

/// A user-authored decoration rule, as persisted by the settings store.
///
/// `value`, `text`, `icon` and `css_class` are either literals or
/// backtick-delimited expressions; see [`crate::expression::FieldSource`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecorationRule {
    pub id: String,
    pub target: Target,
    pub key: String,
    pub value: String,
    pub text: String,
    pub icon: String,
    pub position: Position,
    pub css_class: String,
}

impl DecorationRule {
    /// Creates an empty tag rule with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Creates an empty tag rule identified by the current time in milliseconds.
    pub fn blank() -> Self {
        Self::new(chrono::Utc::now().timestamp_millis().to_string())
    }

    /// The tag this rule looks for, with the leading `#`.
    pub fn tag_key(&self) -> String {
        if self.key.starts_with('#') {
            self.key.clone()
        } else {
            format!("#{}", self.key)
        }
    }
}
