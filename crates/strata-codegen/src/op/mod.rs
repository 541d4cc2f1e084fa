//! Relational operators and the produce/consume protocol.

mod group_by;
mod hash_join;
mod map;
mod scan;
mod selection;
mod sort;

pub use group_by::GroupBy;
pub use hash_join::HashJoin;
pub use map::Map;
pub use scan::Scan;
pub use selection::Selection;
pub use sort::Sort;

use crate::gen::Codegen;
use crate::iu::{IuRef, IuSet};

/// Emission-time row callback: invoked once per row position in the
/// generated program, from a scope where every promised IU is bound.
pub type Consumer<'a> = &'a mut dyn FnMut(&mut Codegen);

/// A relational operator tree.
///
/// Variants own their children exclusively; `produce` walks the tree in
/// depth-first, left-to-right order, each variant emitting its scaffolding
/// and driving its children through a fresh callback.
#[derive(Debug)]
pub enum Operator {
    Scan(Scan),
    Selection(Selection),
    Map(Map),
    Sort(Sort),
    HashJoin(HashJoin),
    GroupBy(GroupBy),
}

impl Operator {
    /// All IUs this operator can provide to its consumer.
    pub fn available_ius(&self) -> IuSet {
        match self {
            Operator::Scan(op) => op.available_ius(),
            Operator::Selection(op) => op.available_ius(),
            Operator::Map(op) => op.available_ius(),
            Operator::Sort(op) => op.available_ius(),
            Operator::HashJoin(op) => op.available_ius(),
            Operator::GroupBy(op) => op.available_ius(),
        }
    }

    /// Emit code binding every IU in `required` in a scope enclosing each
    /// `consume` call site.
    ///
    /// `required ⊆ available_ius()` is the caller's obligation.
    pub fn produce(&self, gen: &mut Codegen, required: &IuSet, consume: Consumer) {
        debug_assert!(
            required.iter().all(|iu| self.available_ius().contains(iu)),
            "required IUs must be available"
        );
        match self {
            Operator::Scan(op) => op.produce(gen, required, consume),
            Operator::Selection(op) => op.produce(gen, required, consume),
            Operator::Map(op) => op.produce(gen, required, consume),
            Operator::Sort(op) => op.produce(gen, required, consume),
            Operator::HashJoin(op) => op.produce(gen, required, consume),
            Operator::GroupBy(op) => op.produce(gen, required, consume),
        }
    }
}

impl From<Scan> for Operator {
    fn from(op: Scan) -> Self {
        Operator::Scan(op)
    }
}

impl From<Selection> for Operator {
    fn from(op: Selection) -> Self {
        Operator::Selection(op)
    }
}

impl From<Map> for Operator {
    fn from(op: Map) -> Self {
        Operator::Map(op)
    }
}

impl From<Sort> for Operator {
    fn from(op: Sort) -> Self {
        Operator::Sort(op)
    }
}

impl From<HashJoin> for Operator {
    fn from(op: HashJoin) -> Self {
        Operator::HashJoin(op)
    }
}

impl From<GroupBy> for Operator {
    fn from(op: GroupBy) -> Self {
        Operator::GroupBy(op)
    }
}

/// Run `root` and print every IU in `out` per row, wrapped in a repeat loop
/// so one program can execute the same query body `repeat` times.
pub fn produce_and_print(gen: &mut Codegen, root: &Operator, out: &[IuRef], repeat: u32) {
    let rep = gen.fresh("perfRepeat");
    gen.block(
        &format!("for (uint64_t {rep} = 0; {rep} != {repeat}; {rep}++)"),
        |g| {
            root.produce(g, &IuSet::from_vec(out.to_vec()), &mut |g| {
                for iu in out {
                    g.emit(format!("std::cout << {} << \" \";", iu.varname));
                }
                g.emit("std::cout << std::endl;");
            });
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Expr, Literal};
    use strata_catalog::Catalog;
    use strata_types::{Date, Type};

    /// Check that exactly one declaration of `varname` encloses `marker`:
    /// the declaration comes before it and the brace depth never drops
    /// below the declaration's depth in between. Materializing operators
    /// may re-bind an IU in later scopes, but the consume site must see
    /// precisely one binding.
    fn bound_once_enclosing(code: &str, varname: &str, marker: &str) -> bool {
        let decl = format!(" {varname} = ");
        let marker_pos = match code.find(marker) {
            Some(p) => p,
            None => return false,
        };
        let enclosing = code
            .match_indices(&decl)
            .filter(|&(decl_pos, _)| {
                if decl_pos > marker_pos {
                    return false;
                }
                let mut depth = 0i32;
                for c in code[decl_pos..marker_pos].chars() {
                    match c {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    if depth < 0 {
                        return false;
                    }
                }
                true
            })
            .count();
        enclosing == 1
    }

    #[test]
    fn test_scan_selection_pipeline_bindings() {
        let mut gen = Codegen::new();
        let catalog = Catalog::tpch();
        let scan = Scan::new(&mut gen, &catalog, "orders").unwrap();
        let date = scan.iu("o_orderdate").unwrap();
        let price = scan.iu("o_totalprice").unwrap();
        let tree: Operator = Selection::new(
            scan.into(),
            Expr::call(
                "std::less<date>()",
                vec![
                    Expr::column(&date),
                    Literal::Date(Date::from_ymd(1995, 3, 15)).into(),
                ],
            ),
        )
        .into();
        produce_and_print(&mut gen, &tree, &[date.clone(), price.clone()], 1);
        let code = gen.finish();
        let marker = format!("std::cout << {} << \" \";", date.varname);
        assert!(bound_once_enclosing(&code, &date.varname, &marker));
        assert!(bound_once_enclosing(&code, &price.varname, &marker));
        assert!(code.contains("for (uint64_t perfRepeat"));
        assert!(code.contains("std::cout << std::endl;"));
    }

    #[test]
    fn test_global_aggregate_pipeline() {
        let mut gen = Codegen::new();
        let catalog = Catalog::tpch();
        let scan = Scan::new(&mut gen, &catalog, "orders").unwrap();
        let date = scan.iu("o_orderdate").unwrap();
        let price = scan.iu("o_totalprice").unwrap();
        let sel = Selection::new(
            scan.into(),
            Expr::call(
                "std::less<date>()",
                vec![
                    Expr::column(&date),
                    Literal::Date(Date::from_ymd(1995, 3, 15)).into(),
                ],
            ),
        );
        let mut group = GroupBy::new(&mut gen, sel.into(), IuSet::new());
        let sum = group.add_sum(&mut gen, "sum", &price);
        let min = group.add_min(&mut gen, "min", &price);
        let tree: Operator = group.into();
        produce_and_print(&mut gen, &tree, &[sum.clone(), min.clone()], 1);
        let code = gen.finish();
        let marker = format!("std::cout << {} << \" \";", sum.varname);
        assert!(bound_once_enclosing(&code, &sum.varname, &marker));
        assert!(bound_once_enclosing(&code, &min.varname, &marker));
        assert!(code.contains("unordered_map<tuple<>, tuple<double,double>>"));
    }

    #[test]
    fn test_grouped_sorted_pipeline() {
        // orders filtered twice, grouped by status, ordered by count
        let mut gen = Codegen::new();
        let catalog = Catalog::tpch();
        let scan = Scan::new(&mut gen, &catalog, "orders").unwrap();
        let date = scan.iu("o_orderdate").unwrap();
        let prio = scan.iu("o_orderpriority").unwrap();
        let status = scan.iu("o_orderstatus").unwrap();
        let price = scan.iu("o_totalprice").unwrap();
        let by_date = Selection::new(
            scan.into(),
            Expr::call(
                "std::less<date>()",
                vec![
                    Expr::column(&date),
                    Literal::Date(Date::from_ymd(1995, 3, 15)).into(),
                ],
            ),
        );
        let by_prio = Selection::new(
            by_date.into(),
            Expr::call(
                "std::equal_to<std::string_view>()",
                vec![
                    Expr::column(&prio),
                    Literal::Str("1-URGENT".into()).into(),
                ],
            ),
        );
        let mut group = GroupBy::new(&mut gen, by_prio.into(), IuSet::one(&status));
        let count = group.add_count(&mut gen, "cnt");
        let min = group.add_min(&mut gen, "min", &price);
        let sum = group.add_sum(&mut gen, "sum", &price);
        let sort = Sort::new(&mut gen, group.into(), vec![count.clone()]);
        let tree: Operator = sort.into();
        let out = [status.clone(), count.clone(), min.clone(), sum.clone()];
        produce_and_print(&mut gen, &tree, &out, 1);
        let code = gen.finish();
        let marker = format!("std::cout << {} << \" \";", status.varname);
        for iu in &out {
            assert!(
                bound_once_enclosing(&code, &iu.varname, &marker),
                "{} not bound exactly once before output",
                iu.name
            );
        }
        // both gates survive in the scan loop
        assert!(code.contains("std::less<date>()"));
        assert!(code.contains("std::equal_to<std::string_view>()"));
        assert!(code.contains("sort("));
    }

    #[test]
    fn test_self_join_pipeline() {
        let mut gen = Codegen::new();
        let catalog = Catalog::tpch();
        let left = Scan::new(&mut gen, &catalog, "customer").unwrap();
        let ck = left.iu("c_custkey").unwrap();
        let cn = left.iu("c_name").unwrap();
        let sel = Selection::new(
            left.into(),
            Expr::call(
                "std::equal_to<int32_t>()",
                vec![Expr::column(&ck), Literal::Int(1).into()],
            ),
        );
        let right = Scan::new(&mut gen, &catalog, "customer").unwrap();
        let ck2 = right.iu("c_custkey").unwrap();
        let ca = right.iu("c_address").unwrap();
        let join = HashJoin::new(
            &mut gen,
            sel.into(),
            right.into(),
            vec![ck.clone()],
            vec![ck2.clone()],
        )
        .unwrap();
        let tree: Operator = join.into();
        let out = [ck.clone(), cn.clone(), ca.clone()];
        produce_and_print(&mut gen, &tree, &out, 1);
        let code = gen.finish();
        let marker = format!("std::cout << {} << \" \";", ca.varname);
        for iu in &out {
            assert!(bound_once_enclosing(&code, &iu.varname, &marker));
        }
        assert!(code.contains("unordered_multimap<tuple<int32_t>,"));
    }

    #[test]
    fn test_map_group_sort_pipeline() {
        let mut gen = Codegen::new();
        let catalog = Catalog::tpch();
        let scan = Scan::new(&mut gen, &catalog, "customer").unwrap();
        let ck = scan.iu("c_custkey").unwrap();
        let nation = scan.iu("c_nationkey").unwrap();
        let map = Map::new(
            &mut gen,
            scan.into(),
            Expr::call(
                "std::plus<int32_t>()",
                vec![Expr::column(&ck), Literal::Int(5).into()],
            ),
            "ck_new",
            Type::Integer,
        );
        let ck_new = map.result_iu();
        let mut group = GroupBy::new(
            &mut gen,
            map.into(),
            IuSet::from_vec(vec![ck.clone(), nation.clone()]),
        );
        let sum = group.add_sum(&mut gen, "sum", &ck_new);
        let count = group.add_count(&mut gen, "cnt");
        let sort = Sort::new(&mut gen, group.into(), vec![ck.clone(), sum.clone()]);
        let tree: Operator = sort.into();
        let out = [ck.clone(), nation.clone(), sum.clone(), count.clone()];
        produce_and_print(&mut gen, &tree, &out, 1);
        let code = gen.finish();
        let marker = format!("std::cout << {} << \" \";", ck.varname);
        for iu in &out {
            assert!(
                bound_once_enclosing(&code, &iu.varname, &marker),
                "{} not bound exactly once before output",
                iu.name
            );
        }
        // derived value flows through the aggregation
        assert!(code.contains("std::plus<int32_t>()"));
    }

    #[test]
    fn test_repeat_loop_bound() {
        let mut gen = Codegen::new();
        let catalog = Catalog::tpch();
        let scan = Scan::new(&mut gen, &catalog, "region").unwrap();
        let name = scan.iu("r_name").unwrap();
        let tree: Operator = scan.into();
        produce_and_print(&mut gen, &tree, &[name], 3);
        let code = gen.finish();
        assert!(code.contains("!= 3;"));
    }

    #[test]
    fn test_emitted_braces_balance() {
        let mut gen = Codegen::new();
        let catalog = Catalog::tpch();
        let scan = Scan::new(&mut gen, &catalog, "orders").unwrap();
        let status = scan.iu("o_orderstatus").unwrap();
        let price = scan.iu("o_totalprice").unwrap();
        let mut group = GroupBy::new(&mut gen, scan.into(), IuSet::one(&status));
        group.add_sum(&mut gen, "sum", &price);
        let sum = group.result("sum").unwrap();
        let sort = Sort::new(&mut gen, group.into(), vec![sum.clone()]);
        let tree: Operator = sort.into();
        produce_and_print(&mut gen, &tree, &[status, sum], 2);
        let code = gen.finish();
        let open = code.matches('{').count();
        let close = code.matches('}').count();
        assert_eq!(open, close);
    }
}
