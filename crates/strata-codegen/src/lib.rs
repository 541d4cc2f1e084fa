//! Push-based code generation for relational operator trees.
//!
//! An operator tree is compiled by asking the root to `produce` a required
//! set of IUs with a terminal `consume` callback. Each operator emits its
//! surrounding control flow (loops, hash tables, gates) and recursively
//! drives its children; rows never materialize inside the compiler, only in
//! the generated program.

pub mod agg;
pub mod error;
pub mod expr;
pub mod gen;
pub mod iu;
pub mod op;

pub use agg::{Aggregate, CountAgg, MaxAgg, MinAgg, SumAgg};
pub use error::CodegenError;
pub use expr::{Expr, Literal};
pub use gen::Codegen;
pub use iu::{format_types, format_varnames, Iu, IuRef, IuSet};
pub use op::{
    produce_and_print, Consumer, GroupBy, HashJoin, Map, Operator, Scan, Selection, Sort,
};
