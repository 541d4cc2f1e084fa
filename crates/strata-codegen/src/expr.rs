//! The expression language.

use strata_types::Date;

use crate::iu::{IuRef, IuSet};

/// A scalar expression over IUs.
///
/// Expressions own their arguments exclusively; compiling one is pure text
/// production and never touches the emission context.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Reference to an IU bound by an enclosing scope.
    Column(IuRef),
    /// A typed constant.
    Literal(Literal),
    /// `name(arg,...)`; `name` may be any callable spelling of the target
    /// language, e.g. `std::less<date>()`.
    Call { name: String, args: Vec<Expr> },
}

/// A typed constant value.
#[derive(Debug, Clone)]
pub enum Literal {
    Int(i32),
    BigInt(i64),
    Double(f64),
    Char(char),
    Str(String),
    Bool(bool),
    Date(Date),
}

impl Expr {
    pub fn column(iu: &IuRef) -> Self {
        Expr::Column(iu.clone())
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    /// Compile to target-language text.
    pub fn compile(&self) -> String {
        match self {
            Expr::Column(iu) => iu.varname.clone(),
            Expr::Literal(lit) => lit.compile(),
            Expr::Call { name, args } => {
                let compiled: Vec<String> = args.iter().map(|a| a.compile()).collect();
                format!("{}({})", name, compiled.join(","))
            }
        }
    }

    /// All IUs referenced anywhere in this tree.
    pub fn ius_used(&self) -> IuSet {
        match self {
            Expr::Column(iu) => IuSet::one(iu),
            Expr::Literal(_) => IuSet::new(),
            Expr::Call { args, .. } => {
                let mut used = IuSet::new();
                for arg in args {
                    for iu in arg.ius_used().iter() {
                        used.add(iu);
                    }
                }
                used
            }
        }
    }
}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}

impl Literal {
    fn compile(&self) -> String {
        match self {
            Literal::Int(x) => x.to_string(),
            Literal::BigInt(x) => x.to_string(),
            Literal::Double(x) => x.to_string(),
            Literal::Char(c) => format!("'{c}'"),
            Literal::Str(s) => format!("\"{s}\""),
            Literal::Bool(b) => b.to_string(),
            // The integer encoding, so date comparisons resolve to integer
            // comparisons in the emitted program.
            Literal::Date(d) => d.0.to_string(),
        }
    }
}
