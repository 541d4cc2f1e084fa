//! Materializing sort.

use strata_types::Type;

use crate::gen::Codegen;
use crate::iu::{format_types, format_varnames, IuRef, IuSet};
use crate::op::{Consumer, Operator};

/// Collects rows into a tuple buffer, sorts lexicographically, and
/// re-iterates.
///
/// Key IUs come first in the tuple, so the default tuple ordering sorts by
/// the keys with ties falling through to the payload.
#[derive(Debug)]
pub struct Sort {
    input: Box<Operator>,
    key_ius: Vec<IuRef>,
    buf: IuRef,
}

impl Sort {
    pub fn new(gen: &mut Codegen, input: Operator, key_ius: Vec<IuRef>) -> Self {
        Sort {
            input: Box::new(input),
            key_ius,
            buf: gen.new_iu("sortBuf", Type::Undefined),
        }
    }

    pub(crate) fn available_ius(&self) -> IuSet {
        self.input.available_ius()
    }

    pub(crate) fn produce(&self, gen: &mut Codegen, required: &IuSet, consume: Consumer) {
        let rest = required - &IuSet::from_vec(self.key_ius.clone());
        let mut all_ius = self.key_ius.clone();
        all_ius.extend(rest.iter().cloned());

        // collect
        gen.emit(format!(
            "vector<tuple<{}>> {};",
            format_types(&all_ius),
            self.buf.varname
        ));
        self.input
            .produce(gen, &IuSet::from_vec(all_ius.clone()), &mut |g| {
                g.emit(format!(
                    "{}.push_back({{{}}});",
                    self.buf.varname,
                    format_varnames(&all_ius)
                ));
            });

        // sort
        gen.emit(format!(
            "sort({0}.begin(), {0}.end());",
            self.buf.varname
        ));

        // iterate
        gen.block(&format!("for (auto& t : {})", self.buf.varname), |g| {
            for (i, iu) in all_ius.iter().enumerate() {
                if required.contains(iu) {
                    g.provide(iu, format!("get<{i}>(t)"));
                }
            }
            consume(g);
        });
    }
}
