//! Hash-grouped aggregation.

use strata_types::Type;

use crate::agg::{Aggregate, CountAgg, MaxAgg, MinAgg, SumAgg};
use crate::error::CodegenError;
use crate::gen::Codegen;
use crate::iu::{format_types, format_varnames, IuRef, IuSet};
use crate::op::{Consumer, Operator};

/// Groups rows by a key IU set and folds aggregates per group.
///
/// An empty key set yields a single global group.
#[derive(Debug)]
pub struct GroupBy {
    input: Box<Operator>,
    group_keys: IuSet,
    aggs: Vec<Box<dyn Aggregate>>,
    ht: IuRef,
}

impl GroupBy {
    pub fn new(gen: &mut Codegen, input: Operator, group_keys: IuSet) -> Self {
        GroupBy {
            input: Box::new(input),
            group_keys,
            aggs: Vec::new(),
            ht: gen.new_iu("aggHT", Type::Undefined),
        }
    }

    /// Append any aggregate strategy; returns its result handle.
    pub fn add_aggregate(&mut self, agg: Box<dyn Aggregate>) -> IuRef {
        let result = agg.result_iu().clone();
        self.aggs.push(agg);
        result
    }

    pub fn add_count(&mut self, gen: &mut Codegen, name: &str) -> IuRef {
        self.add_aggregate(Box::new(CountAgg::new(gen, name)))
    }

    pub fn add_sum(&mut self, gen: &mut Codegen, name: &str, input: &IuRef) -> IuRef {
        self.add_aggregate(Box::new(SumAgg::new(gen, name, input)))
    }

    pub fn add_min(&mut self, gen: &mut Codegen, name: &str, input: &IuRef) -> IuRef {
        self.add_aggregate(Box::new(MinAgg::new(gen, name, input)))
    }

    pub fn add_max(&mut self, gen: &mut Codegen, name: &str, input: &IuRef) -> IuRef {
        self.add_aggregate(Box::new(MaxAgg::new(gen, name, input)))
    }

    /// Result handle of the aggregate registered under `name`.
    pub fn result(&self, name: &str) -> Result<IuRef, CodegenError> {
        self.aggs
            .iter()
            .map(|agg| agg.result_iu())
            .find(|iu| iu.name == name)
            .cloned()
            .ok_or_else(|| CodegenError::UnknownAggregate {
                name: name.to_string(),
            })
    }

    fn result_ius(&self) -> Vec<IuRef> {
        self.aggs.iter().map(|agg| agg.result_iu().clone()).collect()
    }

    fn input_ius(&self) -> IuSet {
        let mut set = IuSet::new();
        for agg in &self.aggs {
            if let Some(iu) = agg.input_iu() {
                set.add(iu);
            }
        }
        set
    }

    pub(crate) fn available_ius(&self) -> IuSet {
        &self.group_keys | &IuSet::from_vec(self.result_ius())
    }

    pub(crate) fn produce(&self, gen: &mut Codegen, required: &IuSet, consume: Consumer) {
        let results = self.result_ius();

        // build
        gen.emit(format!(
            "unordered_map<tuple<{}>, tuple<{}>> {};",
            format_types(self.group_keys.as_slice()),
            format_types(&results),
            self.ht.varname
        ));
        let needed = &self.group_keys | &self.input_ius();
        self.input.produce(gen, &needed, &mut |g| {
            g.emit(format!(
                "auto it = {}.find({{{}}});",
                self.ht.varname,
                format_varnames(self.group_keys.as_slice())
            ));
            g.block(&format!("if (it == {}.end())", self.ht.varname), |g| {
                let init: Vec<String> = self.aggs.iter().map(|agg| agg.init()).collect();
                g.emit(format!(
                    "{}.insert({{{{{}}}, {{{}}}}});",
                    self.ht.varname,
                    format_varnames(self.group_keys.as_slice()),
                    init.join(",")
                ));
            });
            g.block("else", |g| {
                for (i, agg) in self.aggs.iter().enumerate() {
                    g.emit(agg.update(&format!("get<{i}>(it->second)")));
                }
            });
        });

        // emit groups
        gen.block(&format!("for (auto& it : {})", self.ht.varname), |g| {
            for (i, iu) in self.group_keys.iter().enumerate() {
                if required.contains(iu) {
                    g.provide(iu, format!("get<{i}>(it.first)"));
                }
            }
            for (i, agg) in self.aggs.iter().enumerate() {
                g.provide(agg.result_iu(), format!("get<{i}>(it.second)"));
            }
            consume(g);
        });
    }
}
