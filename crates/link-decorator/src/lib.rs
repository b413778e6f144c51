//! Link Decorator
//!
//! A rule engine that decorates links to other documents with icons, short
//! text and CSS classes derived from the linked document's metadata.
//!
//! Rules match on a tag, on a frontmatter property, or run a CEL script over
//! the whole metadata snapshot. Matches are merged, in rule declaration
//! order, into one class string and an ordered list of fragments that the
//! editor and reading surfaces render. Evaluation is a pure function of
//! (rules, snapshot); expression failures mean "no match", never an error.

pub mod context;
pub mod decoration;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod hash;
pub mod matcher;
pub mod parser;
pub mod render;
pub mod script;
pub mod settings;
pub mod surface;
pub mod types;
pub mod validate;
pub mod value;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use context::MetadataSnapshot;
pub use decoration::{
    resolve_decoration_style, DecorationFragment, DecorationStyle, Decorations, MatchedRule,
};
pub use error::{DecoratorError, EvaluationFailure, Result};
pub use evaluator::{find_matching_rules, DecorationEngine};
pub use expression::{evaluate, evaluate_template, FieldSource};
pub use settings::{DecoratorSettings, RuleBuilder};
pub use types::{DecorationRule, Position, Target};
pub use validate::{validate_source, SourceValidation};

/// Version of the decoration engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::context::MetadataSnapshot;
    pub use crate::decoration::{DecorationFragment, Decorations, MatchedRule};
    pub use crate::error::{DecoratorError, EvaluationFailure, Result};
    pub use crate::evaluator::DecorationEngine;
    pub use crate::settings::{DecoratorSettings, RuleBuilder};
    pub use crate::types::*;
}
