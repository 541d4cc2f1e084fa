//! Multimap equi-join.

use strata_types::Type;

use crate::error::CodegenError;
use crate::gen::Codegen;
use crate::iu::{format_types, format_varnames, IuRef, IuSet};
use crate::op::{Consumer, Operator};

/// Inner equi-join: builds a multimap over the left input, probes with the
/// right, multi-matching on the probe side.
#[derive(Debug)]
pub struct HashJoin {
    left: Box<Operator>,
    right: Box<Operator>,
    left_keys: Vec<IuRef>,
    right_keys: Vec<IuRef>,
    ht: IuRef,
}

impl HashJoin {
    /// Pair-wise equi-join; key lists must line up in length and type.
    pub fn new(
        gen: &mut Codegen,
        left: Operator,
        right: Operator,
        left_keys: Vec<IuRef>,
        right_keys: Vec<IuRef>,
    ) -> Result<Self, CodegenError> {
        if left_keys.len() != right_keys.len() {
            return Err(CodegenError::KeyArityMismatch {
                left: left_keys.len(),
                right: right_keys.len(),
            });
        }
        for (index, (l, r)) in left_keys.iter().zip(right_keys.iter()).enumerate() {
            if l.ty != r.ty {
                return Err(CodegenError::KeyTypeMismatch {
                    index,
                    left: l.ty,
                    right: r.ty,
                });
            }
        }
        Ok(HashJoin {
            left: Box::new(left),
            right: Box::new(right),
            left_keys,
            right_keys,
            ht: gen.new_iu("joinHT", Type::Undefined),
        })
    }

    pub(crate) fn available_ius(&self) -> IuSet {
        &self.left.available_ius() | &self.right.available_ius()
    }

    pub(crate) fn produce(&self, gen: &mut Codegen, required: &IuSet, consume: Consumer) {
        // figure out where required IUs come from
        let left_required =
            &(required & &self.left.available_ius()) | &IuSet::from_vec(self.left_keys.clone());
        let right_required =
            &(required & &self.right.available_ius()) | &IuSet::from_vec(self.right_keys.clone());
        // everything requested from the left that is not a key travels as
        // hash table payload
        let left_payload = &left_required - &IuSet::from_vec(self.left_keys.clone());

        // build
        gen.emit(format!(
            "unordered_multimap<tuple<{}>, tuple<{}>> {};",
            format_types(&self.left_keys),
            format_types(left_payload.as_slice()),
            self.ht.varname
        ));
        self.left.produce(gen, &left_required, &mut |g| {
            g.emit(format!(
                "{}.insert({{{{{}}}, {{{}}}}});",
                self.ht.varname,
                format_varnames(&self.left_keys),
                format_varnames(left_payload.as_slice())
            ));
        });

        // probe
        self.right.produce(gen, &right_required, &mut |g| {
            g.block(
                &format!(
                    "for (auto range = {0}.equal_range({{{1}}}); range.first != range.second; range.first++)",
                    self.ht.varname,
                    format_varnames(&self.right_keys)
                ),
                |g| {
                    for (i, iu) in left_payload.iter().enumerate() {
                        g.provide(iu, format!("get<{i}>(range.first->second)"));
                    }
                    for (i, iu) in self.left_keys.iter().enumerate() {
                        if required.contains(iu) {
                            g.provide(iu, format!("get<{i}>(range.first->first)"));
                        }
                    }
                    consume(g);
                },
            );
        });
    }
}
