//! Metadata snapshot of a linked document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name given to documents without a basename.
pub const UNTITLED: &str = "Untitled";

/// Read-only view of a linked document's indexed metadata.
///
/// The host builds a fresh snapshot for every evaluation; the engine never
/// mutates or retains it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSnapshot {
    /// Tags with their leading `#`, e.g. `#project/alpha`.
    pub tags: Vec<String>,

    /// Frontmatter properties.
    pub frontmatter: Map<String, Value>,

    /// Display name of the document, without extension.
    pub basename: String,
}

impl MetadataSnapshot {
    /// Creates an empty snapshot for the named document.
    pub fn new(basename: impl Into<String>) -> Self {
        Self {
            basename: basename.into(),
            ..Self::default()
        }
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Sets a frontmatter property.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.frontmatter.insert(key.into(), value);
        self
    }

    /// Looks up a frontmatter property. A present `null` is `Some(Value::Null)`.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.frontmatter.get(key)
    }

    /// True if some tag is `tag` itself or one of its descendants.
    pub fn has_tag_or_descendant(&self, tag: &str) -> bool {
        let prefix = format!("{}/", tag);
        self.tags.iter().any(|t| t == tag || t.starts_with(&prefix))
    }

    /// Tags with one leading `#` removed.
    pub fn bare_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|t| t.strip_prefix('#').unwrap_or(t).to_string())
            .collect()
    }

    /// Builds the object handed to metadata scripts:
    /// `{ name, frontmatter, tags }`.
    pub fn script_input(&self) -> Value {
        let name = if self.basename.is_empty() {
            UNTITLED
        } else {
            self.basename.as_str()
        };

        serde_json::json!({
            "name": name,
            "frontmatter": self.frontmatter,
            "tags": self.bare_tags(),
        })
    }
}
