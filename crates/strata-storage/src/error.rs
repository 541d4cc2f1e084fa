//! Storage and ingestion errors.

use strata_types::TypeError;
use thiserror::Error;

/// An import or column-file error.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{relation} row {row} is missing a value for {attribute}")]
    ShortRecord {
        relation: String,
        attribute: String,
        row: u64,
    },

    #[error("bad value for {relation}.{attribute} in row {row}: {source}")]
    BadField {
        relation: String,
        attribute: String,
        row: u64,
        #[source]
        source: TypeError,
    },
}
