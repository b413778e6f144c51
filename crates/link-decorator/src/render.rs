//! Shape of a rendered decoration element.
//!
//! Presentation surfaces materialize these into DOM nodes or editor widgets;
//! sharing one description keeps both surfaces visually identical.

use crate::decoration::DecorationFragment;
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// CSS classes applied by presentation surfaces.
pub mod classes {
    /// Every decoration element.
    pub const DECORATION: &str = "lmd-decoration";
    /// Followed by `before` or `after`.
    pub const POS_PREFIX: &str = "lmd-pos-";
    /// Icon container inside a decoration.
    pub const ICON: &str = "lmd-icon";
    /// Decoration shown while its link is being edited.
    pub const EDITING: &str = "lmd-editing";
    /// Link text in the editor surface.
    pub const LINK_TEXT_LP: &str = "lmd-link-lp";
    /// Link text in the reading surface.
    pub const LINK_TEXT_RV: &str = "lmd-link-rv";
}

/// Attribute carrying a fragment's stable id.
pub const ID_ATTRIBUTE: &str = "data-lmd-id";

/// A child of a decoration element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ElementPart {
    /// Icon id, rendered inside a [`classes::ICON`] container.
    Icon(String),
    Text(String),
}

/// A decoration element: a span with classes, an id attribute and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationElement {
    pub classes: Vec<String>,
    /// Stable id, written to the [`ID_ATTRIBUTE`] attribute.
    pub id: String,
    pub parts: Vec<ElementPart>,
}

impl DecorationElement {
    /// Space-joined class attribute.
    pub fn class_attribute(&self) -> String {
        self.classes.join(" ")
    }
}

impl DecorationFragment {
    /// Lays out the element for this fragment.
    ///
    /// A `before` fragment with both icon and text reads `[icon][text]`;
    /// everything else reads `[text][icon]`.
    pub fn element(&self, editing: bool) -> DecorationElement {
        let mut element_classes = vec![
            classes::DECORATION.to_string(),
            format!("{}{}", classes::POS_PREFIX, self.position.as_str()),
        ];
        if editing {
            element_classes.push(classes::EDITING.to_string());
        }
        element_classes.extend(self.css_class.split_whitespace().map(str::to_string));

        let icon = self.icon.clone().map(ElementPart::Icon);
        let text = self.text.clone().map(ElementPart::Text);
        let parts = match (self.position, icon, text) {
            (Position::Before, Some(icon), Some(text)) => vec![icon, text],
            (_, icon, text) => text.into_iter().chain(icon).collect(),
        };

        DecorationElement {
            classes: element_classes,
            id: self.stable_id.clone(),
            parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(position: Position, text: Option<&str>, icon: Option<&str>) -> DecorationFragment {
        DecorationFragment {
            text: text.map(str::to_string),
            icon: icon.map(str::to_string),
            position,
            css_class: "urgent  custom".to_string(),
            stable_id: "lmd-0123456789abcdef".to_string(),
        }
    }

    #[test]
    fn test_before_with_icon_and_text_leads_with_icon() {
        let element = fragment(Position::Before, Some("!"), Some("star")).element(false);
        assert_eq!(
            element.parts,
            vec![ElementPart::Icon("star".to_string()), ElementPart::Text("!".to_string())]
        );
    }

    #[test]
    fn test_after_leads_with_text() {
        let element = fragment(Position::After, Some("!"), Some("star")).element(false);
        assert_eq!(
            element.parts,
            vec![ElementPart::Text("!".to_string()), ElementPart::Icon("star".to_string())]
        );
    }

    #[test]
    fn test_single_part() {
        let element = fragment(Position::Before, None, Some("star")).element(false);
        assert_eq!(element.parts, vec![ElementPart::Icon("star".to_string())]);
    }

    #[test]
    fn test_classes() {
        let element = fragment(Position::After, Some("x"), None).element(true);
        assert_eq!(
            element.class_attribute(),
            "lmd-decoration lmd-pos-after lmd-editing urgent custom"
        );
        assert_eq!(element.id, "lmd-0123456789abcdef");
    }
}
