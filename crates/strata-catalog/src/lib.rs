//! The fixed TPC-H catalog.

pub mod schema;

pub use schema::{Catalog, Relation};
