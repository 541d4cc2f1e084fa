//! Derived-value operator.

use strata_types::Type;

use crate::expr::Expr;
use crate::gen::Codegen;
use crate::iu::{IuRef, IuSet};
use crate::op::{Consumer, Operator};

/// Computes one named value per row.
#[derive(Debug)]
pub struct Map {
    input: Box<Operator>,
    exp: Expr,
    iu: IuRef,
}

impl Map {
    /// Derive `name` of type `ty` from `exp` over `input`.
    pub fn new(gen: &mut Codegen, input: Operator, exp: Expr, name: &str, ty: Type) -> Self {
        Map {
            input: Box::new(input),
            exp,
            iu: gen.new_iu(name, ty),
        }
    }

    /// The derived value's handle.
    pub fn result_iu(&self) -> IuRef {
        self.iu.clone()
    }

    pub(crate) fn available_ius(&self) -> IuSet {
        &self.input.available_ius() | &IuSet::one(&self.iu)
    }

    pub(crate) fn produce(&self, gen: &mut Codegen, required: &IuSet, consume: Consumer) {
        let needed = &(required | &self.exp.ius_used()) - &IuSet::one(&self.iu);
        self.input.produce(gen, &needed, &mut |g| {
            // anonymous block keeps the binding from leaking into sibling
            // scopes when maps nest
            g.block("", |g| {
                g.provide(&self.iu, self.exp.compile());
                consume(g);
            });
        });
    }
}
