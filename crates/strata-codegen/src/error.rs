//! Tree-construction diagnostics.
//!
//! Everything that can go wrong in this crate is a programmer error in the
//! tree being built, so all checks happen at construction time and
//! emission itself is infallible.

use strata_types::Type;
use thiserror::Error;

/// A fatal error while building an operator tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("unknown relation: {name}")]
    UnknownRelation { name: String },

    #[error("relation {relation} has no attribute {name}")]
    UnknownAttribute { relation: String, name: String },

    #[error("no aggregate result named {name}")]
    UnknownAggregate { name: String },

    #[error("join key lists differ in length: {left} vs {right}")]
    KeyArityMismatch { left: usize, right: usize },

    #[error("join key {index} has mismatched types: {left:?} vs {right:?}")]
    KeyTypeMismatch {
        index: usize,
        left: Type,
        right: Type,
    },
}
