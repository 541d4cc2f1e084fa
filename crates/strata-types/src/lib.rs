//! Type system for the strata query compiler.
//!
//! This crate provides:
//! - The logical column types and their generated-code spellings (`types`)
//! - The dense Julian-day date value (`date`)
//! - Literal parsing errors (`error`)

pub mod date;
pub mod error;
pub mod types;

pub use date::Date;
pub use error::TypeError;
pub use types::Type;
