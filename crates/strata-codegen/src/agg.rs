//! Aggregate strategies for grouped aggregation.

use std::fmt;

use strata_types::Type;

use crate::gen::Codegen;
use crate::iu::IuRef;

/// One aggregate slot of a group: how to seed it from the first row of the
/// group and how to fold further rows in.
///
/// The set of strategies is open; implementing this trait is all it takes
/// to add one, the group operator iterates them polymorphically.
pub trait Aggregate: fmt::Debug {
    /// IU consumed per input row, if any.
    fn input_iu(&self) -> Option<&IuRef>;

    /// Handle of this aggregate's result.
    fn result_iu(&self) -> &IuRef;

    /// Expression text seeding the slot from the current row's bindings.
    fn init(&self) -> String;

    /// Statement text folding the current row into `slot`.
    fn update(&self, slot: &str) -> String;
}

/// Row count.
#[derive(Debug)]
pub struct CountAgg {
    result: IuRef,
}

impl CountAgg {
    pub fn new(gen: &mut Codegen, name: &str) -> Self {
        CountAgg {
            result: gen.new_iu(name, Type::Integer),
        }
    }
}

impl Aggregate for CountAgg {
    fn input_iu(&self) -> Option<&IuRef> {
        None
    }

    fn result_iu(&self) -> &IuRef {
        &self.result
    }

    fn init(&self) -> String {
        "1".to_string()
    }

    fn update(&self, slot: &str) -> String {
        format!("{slot}++;")
    }
}

/// Running sum of an input IU; result has the input's type.
#[derive(Debug)]
pub struct SumAgg {
    input: IuRef,
    result: IuRef,
}

impl SumAgg {
    pub fn new(gen: &mut Codegen, name: &str, input: &IuRef) -> Self {
        SumAgg {
            result: gen.new_iu(name, input.ty),
            input: input.clone(),
        }
    }
}

impl Aggregate for SumAgg {
    fn input_iu(&self) -> Option<&IuRef> {
        Some(&self.input)
    }

    fn result_iu(&self) -> &IuRef {
        &self.result
    }

    fn init(&self) -> String {
        self.input.varname.clone()
    }

    fn update(&self, slot: &str) -> String {
        format!("{slot} += {};", self.input.varname)
    }
}

/// Running minimum of an input IU.
#[derive(Debug)]
pub struct MinAgg {
    input: IuRef,
    result: IuRef,
}

impl MinAgg {
    pub fn new(gen: &mut Codegen, name: &str, input: &IuRef) -> Self {
        MinAgg {
            result: gen.new_iu(name, input.ty),
            input: input.clone(),
        }
    }
}

impl Aggregate for MinAgg {
    fn input_iu(&self) -> Option<&IuRef> {
        Some(&self.input)
    }

    fn result_iu(&self) -> &IuRef {
        &self.result
    }

    fn init(&self) -> String {
        self.input.varname.clone()
    }

    fn update(&self, slot: &str) -> String {
        format!("{slot} = std::min({slot}, {});", self.input.varname)
    }
}

/// Running maximum of an input IU.
#[derive(Debug)]
pub struct MaxAgg {
    input: IuRef,
    result: IuRef,
}

impl MaxAgg {
    pub fn new(gen: &mut Codegen, name: &str, input: &IuRef) -> Self {
        MaxAgg {
            result: gen.new_iu(name, input.ty),
            input: input.clone(),
        }
    }
}

impl Aggregate for MaxAgg {
    fn input_iu(&self) -> Option<&IuRef> {
        Some(&self.input)
    }

    fn result_iu(&self) -> &IuRef {
        &self.result
    }

    fn init(&self) -> String {
        self.input.varname.clone()
    }

    fn update(&self, slot: &str) -> String {
        format!("{slot} = std::max({slot}, {});", self.input.varname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_has_no_input_and_integer_result() {
        let mut gen = Codegen::new();
        let count = CountAgg::new(&mut gen, "cnt");
        assert!(count.input_iu().is_none());
        assert_eq!(count.result_iu().ty, Type::Integer);
        assert_eq!(count.init(), "1");
        assert_eq!(count.update("get<0>(it->second)"), "get<0>(it->second)++;");
    }

    #[test]
    fn test_sum_inherits_input_type() {
        let mut gen = Codegen::new();
        let price = gen.new_iu("o_totalprice", Type::Double);
        let sum = SumAgg::new(&mut gen, "sum", &price);
        assert_eq!(sum.result_iu().ty, Type::Double);
        assert_eq!(sum.init(), "o_totalprice1");
        assert_eq!(
            sum.update("get<1>(it->second)"),
            "get<1>(it->second) += o_totalprice1;"
        );
    }

    #[test]
    fn test_min_max_fold_through_std() {
        let mut gen = Codegen::new();
        let price = gen.new_iu("o_totalprice", Type::Double);
        let min = MinAgg::new(&mut gen, "min", &price);
        let max = MaxAgg::new(&mut gen, "max", &price);
        assert_eq!(
            min.update("v"),
            "v = std::min(v, o_totalprice1);"
        );
        assert_eq!(
            max.update("v"),
            "v = std::max(v, o_totalprice1);"
        );
    }
}
