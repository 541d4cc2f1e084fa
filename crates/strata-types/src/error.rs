//! Literal parsing errors with miette integration.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::types::Type;

/// A literal parsing error.
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum TypeError {
    #[error("invalid date literal")]
    #[diagnostic(code(types::invalid_date))]
    InvalidDate {
        #[source_code]
        src: String,
        #[label("expected YYYY-MM-DD")]
        span: SourceSpan,
    },

    #[error("date field out of range")]
    #[diagnostic(code(types::date_out_of_range))]
    DateOutOfRange {
        #[source_code]
        src: String,
        #[label("needs 1 <= month <= 12, 1 <= day <= 31, year <= 9999")]
        span: SourceSpan,
    },

    #[error("cannot parse {text:?} as {ty:?}")]
    #[diagnostic(code(types::invalid_field))]
    InvalidField { ty: Type, text: String },
}

impl TypeError {
    pub fn invalid_date(src: &str, at: usize) -> Self {
        let at = at.min(src.len());
        let len = if at < src.len() { 1 } else { 0 };
        TypeError::InvalidDate {
            src: src.to_string(),
            span: (at, len).into(),
        }
    }

    pub fn date_out_of_range(src: &str, start: usize, len: usize) -> Self {
        TypeError::DateOutOfRange {
            src: src.to_string(),
            span: (start, len).into(),
        }
    }

    pub fn invalid_field(ty: Type, text: &str) -> Self {
        TypeError::InvalidField {
            ty,
            text: text.to_string(),
        }
    }
}
