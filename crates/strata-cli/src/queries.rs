//! Built-in query trees.
//!
//! Queries are composed bottom-up against the catalog and emitted through
//! the push-based protocol; each entry here produces one program body.

use strata_catalog::Catalog;
use strata_codegen::{
    produce_and_print, Codegen, CodegenError, Expr, GroupBy, HashJoin, IuRef, IuSet, Literal, Map,
    Operator, Scan, Selection, Sort,
};
use strata_types::{Date, Type};
use thiserror::Error;

/// Name and one-line description of every built-in query.
pub const QUERIES: &[(&str, &str)] = &[
    (
        "urgent-orders",
        "orders placed before 1995-03-15: date and price per row",
    ),
    (
        "price-stats",
        "global sum and min of o_totalprice over orders before 1995-03-15",
    ),
    (
        "status-breakdown",
        "count/min/sum of urgent orders per status, ordered by count",
    ),
    (
        "customer-self-join",
        "key, name and address of customer 1 through a self join",
    ),
    (
        "customer-rollup",
        "shifted custkey summed per customer and nation, ordered",
    ),
];

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("unknown query: {name} (try `strata queries`)")]
    Unknown { name: String },

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// Emit the body of the named query into `gen`.
pub fn emit(
    gen: &mut Codegen,
    catalog: &Catalog,
    name: &str,
    repeat: u32,
) -> Result<(), QueryError> {
    match name {
        "urgent-orders" => urgent_orders(gen, catalog, repeat),
        "price-stats" => price_stats(gen, catalog, repeat),
        "status-breakdown" => status_breakdown(gen, catalog, repeat),
        "customer-self-join" => customer_self_join(gen, catalog, repeat),
        "customer-rollup" => customer_rollup(gen, catalog, repeat),
        _ => {
            return Err(QueryError::Unknown {
                name: name.to_string(),
            })
        }
    }?;
    Ok(())
}

fn before(iu: &IuRef, cutoff: Date) -> Expr {
    Expr::call(
        "std::less<date>()",
        vec![Expr::column(iu), Literal::Date(cutoff).into()],
    )
}

fn urgent_orders(gen: &mut Codegen, catalog: &Catalog, repeat: u32) -> Result<(), CodegenError> {
    let scan = Scan::new(gen, catalog, "orders")?;
    let date = scan.iu("o_orderdate")?;
    let price = scan.iu("o_totalprice")?;
    let tree: Operator =
        Selection::new(scan.into(), before(&date, Date::from_ymd(1995, 3, 15))).into();
    produce_and_print(gen, &tree, &[date, price], repeat);
    Ok(())
}

fn price_stats(gen: &mut Codegen, catalog: &Catalog, repeat: u32) -> Result<(), CodegenError> {
    let scan = Scan::new(gen, catalog, "orders")?;
    let date = scan.iu("o_orderdate")?;
    let price = scan.iu("o_totalprice")?;
    let sel = Selection::new(scan.into(), before(&date, Date::from_ymd(1995, 3, 15)));
    let mut group = GroupBy::new(gen, sel.into(), IuSet::new());
    let sum = group.add_sum(gen, "sum", &price);
    let min = group.add_min(gen, "min", &price);
    let tree: Operator = group.into();
    produce_and_print(gen, &tree, &[sum, min], repeat);
    Ok(())
}

fn status_breakdown(gen: &mut Codegen, catalog: &Catalog, repeat: u32) -> Result<(), CodegenError> {
    let scan = Scan::new(gen, catalog, "orders")?;
    let date = scan.iu("o_orderdate")?;
    let prio = scan.iu("o_orderpriority")?;
    let status = scan.iu("o_orderstatus")?;
    let price = scan.iu("o_totalprice")?;
    let by_date = Selection::new(scan.into(), before(&date, Date::from_ymd(1995, 3, 15)));
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
    let mut group = GroupBy::new(gen, by_prio.into(), IuSet::one(&status));
    let count = group.add_count(gen, "cnt");
    let min = group.add_min(gen, "min", &price);
    let sum = group.add_sum(gen, "sum", &price);
    let sort = Sort::new(gen, group.into(), vec![count.clone()]);
    let tree: Operator = sort.into();
    produce_and_print(gen, &tree, &[status, count, min, sum], repeat);
    Ok(())
}

fn customer_self_join(
    gen: &mut Codegen,
    catalog: &Catalog,
    repeat: u32,
) -> Result<(), CodegenError> {
    let left = Scan::new(gen, catalog, "customer")?;
    let ck = left.iu("c_custkey")?;
    let cn = left.iu("c_name")?;
    let sel = Selection::new(
        left.into(),
        Expr::call(
            "std::equal_to<int32_t>()",
            vec![Expr::column(&ck), Literal::Int(1).into()],
        ),
    );
    let right = Scan::new(gen, catalog, "customer")?;
    let ck2 = right.iu("c_custkey")?;
    let ca = right.iu("c_address")?;
    let join = HashJoin::new(gen, sel.into(), right.into(), vec![ck.clone()], vec![ck2])?;
    let tree: Operator = join.into();
    produce_and_print(gen, &tree, &[ck, cn, ca], repeat);
    Ok(())
}

fn customer_rollup(gen: &mut Codegen, catalog: &Catalog, repeat: u32) -> Result<(), CodegenError> {
    let scan = Scan::new(gen, catalog, "customer")?;
    let ck = scan.iu("c_custkey")?;
    let nation = scan.iu("c_nationkey")?;
    let map = Map::new(
        gen,
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
        gen,
        map.into(),
        IuSet::from_vec(vec![ck.clone(), nation.clone()]),
    );
    let sum = group.add_sum(gen, "sum", &ck_new);
    let count = group.add_count(gen, "cnt");
    let sort = Sort::new(gen, group.into(), vec![ck.clone(), sum.clone()]);
    let tree: Operator = sort.into();
    produce_and_print(gen, &tree, &[ck, nation, sum, count], repeat);
    Ok(())
}
