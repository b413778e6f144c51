//! Placement plans for the two presentation surfaces.
//!
//! The editor surface needs sorted ranges (a mark over the link text plus
//! zero-width widgets at its edges); the reading surface needs the classes to
//! add to the link element and the fragments not yet present beside it. Both
//! are computed here from [`Decorations`] so the surfaces only materialize.

use crate::decoration::{DecorationFragment, Decorations};
use crate::render::classes;
use crate::types::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Location of a link in the source document. Lines are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSpan {
    pub from: usize,
    pub to: usize,
    pub start_line: usize,
    pub end_line: usize,
}

/// Lines covered by the editor selection. 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionLines {
    pub start_line: usize,
    pub end_line: usize,
}

impl SelectionLines {
    /// True if the selection touches any line of the link.
    pub fn overlaps(&self, link: &LinkSpan) -> bool {
        self.end_line >= link.start_line && self.start_line <= link.end_line
    }
}

/// What to place at a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EditorDecorationKind {
    /// Styles the link text.
    Mark { class: String },
    /// Inserts a fragment; `side` is -1 before the link, 1 after it.
    Widget { side: i8, fragment: DecorationFragment },
}

/// One editor decoration, ready for a range-set builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorDecoration {
    pub from: usize,
    pub to: usize,
    #[serde(flatten)]
    pub kind: EditorDecorationKind,
}

/// Plans the editor decorations of one link.
///
/// The mark is always placed when there is a class. Widgets are left out
/// while the selection is on the link's lines so the raw link stays editable.
pub fn plan_editor_link(
    link: &LinkSpan,
    decorations: &Decorations,
    selection: Option<&SelectionLines>,
) -> Vec<EditorDecoration> {
    let mut planned = Vec::new();
    if decorations.is_empty() {
        return planned;
    }

    if !decorations.css_class.is_empty() {
        planned.push(EditorDecoration {
            from: link.from,
            to: link.to,
            kind: EditorDecorationKind::Mark {
                class: format!("{} {}", classes::LINK_TEXT_LP, decorations.css_class),
            },
        });
    }

    if selection.is_some_and(|s| s.overlaps(link)) {
        return planned;
    }

    for fragment in &decorations.fragments {
        let at = match fragment.position {
            Position::Before => link.from,
            Position::After => link.to,
        };
        planned.push(EditorDecoration {
            from: at,
            to: at,
            kind: EditorDecorationKind::Widget {
                side: fragment.position.side(),
                fragment: fragment.clone(),
            },
        });
    }

    planned
}

/// Plans all links of a document, sorted by `(from, to)`.
///
/// Items at the same range keep their link and declaration order.
pub fn plan_editor(
    links: &[(LinkSpan, Decorations)],
    selection: Option<&SelectionLines>,
) -> Vec<EditorDecoration> {
    let mut planned: Vec<EditorDecoration> = links
        .iter()
        .flat_map(|(link, decorations)| plan_editor_link(link, decorations, selection))
        .collect();

    planned.sort_by_key(|d| (d.from, d.to));
    planned
}

/// Changes to apply to one rendered link element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPlan {
    /// Classes to add to the link element.
    pub link_classes: Vec<String>,
    /// Fragments to insert immediately before the link, left to right.
    pub insert_before: Vec<DecorationFragment>,
    /// Fragments to append after the link's existing decorations.
    pub insert_after: Vec<DecorationFragment>,
}

/// Plans one link of the reading surface.
///
/// `existing_ids` are the stable ids of decorations already beside the link;
/// those fragments, and repeats within this plan, are skipped. Returns `None`
/// when no rule matched.
pub fn plan_reading_link(
    decorations: &Decorations,
    existing_ids: &HashSet<String>,
) -> Option<ReadingPlan> {
    if decorations.is_empty() {
        return None;
    }

    let mut plan = ReadingPlan {
        link_classes: std::iter::once(classes::LINK_TEXT_RV)
            .chain(decorations.css_class.split_whitespace())
            .map(str::to_string)
            .collect(),
        ..ReadingPlan::default()
    };

    let mut seen: HashSet<&str> = existing_ids.iter().map(String::as_str).collect();
    for fragment in &decorations.fragments {
        if !seen.insert(fragment.stable_id.as_str()) {
            continue;
        }
        match fragment.position {
            Position::Before => plan.insert_before.push(fragment.clone()),
            Position::After => plan.insert_after.push(fragment.clone()),
        }
    }

    Some(plan)
}
