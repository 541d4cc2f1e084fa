//! Predicate gate.

use crate::expr::Expr;
use crate::gen::Codegen;
use crate::iu::IuSet;
use crate::op::{Consumer, Operator};

/// Passes rows for which the predicate holds.
#[derive(Debug)]
pub struct Selection {
    input: Box<Operator>,
    pred: Expr,
}

impl Selection {
    pub fn new(input: Operator, pred: Expr) -> Self {
        Selection {
            input: Box::new(input),
            pred,
        }
    }

    pub(crate) fn available_ius(&self) -> IuSet {
        self.input.available_ius()
    }

    pub(crate) fn produce(&self, gen: &mut Codegen, required: &IuSet, consume: Consumer) {
        let needed = required | &self.pred.ius_used();
        self.input.produce(gen, &needed, &mut |g| {
            g.block(&format!("if ({})", self.pred.compile()), |g| consume(g));
        });
    }
}
