//! Relation metadata for the eight TPC-H tables.

use std::collections::BTreeMap;

use strata_types::Type;

/// Schema of one relation: an ordered attribute list.
#[derive(Debug, Clone)]
pub struct Relation {
    pub name: String,
    pub attributes: Vec<(String, Type)>,
}

impl Relation {
    /// Type of the named attribute, if present.
    pub fn attribute_type(&self, name: &str) -> Option<Type> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }
}

/// A read-only mapping from relation name to schema.
///
/// The compiler consults this only while constructing scans; the import
/// pipeline drives column parsing from it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    relations: BTreeMap<String, Relation>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relation with its ordered attributes.
    pub fn define(&mut self, name: &str, attributes: &[(&str, Type)]) {
        self.relations.insert(
            name.to_string(),
            Relation {
                name: name.to_string(),
                attributes: attributes
                    .iter()
                    .map(|(n, ty)| (n.to_string(), *ty))
                    .collect(),
            },
        );
    }

    /// Look up a relation by name.
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    /// All relations in name order.
    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    /// The standard TPC-H schema.
    pub fn tpch() -> Self {
        use Type::*;

        let mut catalog = Catalog::new();
        catalog.define(
            "part",
            &[
                ("p_partkey", Integer),
                ("p_name", String),
                ("p_mfgr", String),
                ("p_brand", String),
                ("p_type", String),
                ("p_size", Integer),
                ("p_container", String),
                ("p_retailprice", Double),
                ("p_comment", String),
            ],
        );
        catalog.define(
            "supplier",
            &[
                ("s_suppkey", Integer),
                ("s_name", String),
                ("s_address", String),
                ("s_nationkey", Integer),
                ("s_phone", String),
                ("s_acctbal", Double),
                ("s_comment", String),
            ],
        );
        catalog.define(
            "partsupp",
            &[
                ("ps_partkey", Integer),
                ("ps_suppkey", Integer),
                ("ps_availqty", Integer),
                ("ps_supplycost", Double),
                ("ps_comment", String),
            ],
        );
        catalog.define(
            "customer",
            &[
                ("c_custkey", Integer),
                ("c_name", String),
                ("c_address", String),
                ("c_nationkey", Integer),
                ("c_phone", String),
                ("c_acctbal", Double),
                ("c_mktsegment", String),
                ("c_comment", String),
            ],
        );
        catalog.define(
            "orders",
            &[
                ("o_orderkey", BigInt),
                ("o_custkey", Integer),
                ("o_orderstatus", Char),
                ("o_totalprice", Double),
                ("o_orderdate", Date),
                ("o_orderpriority", String),
                ("o_clerk", String),
                ("o_shippriority", Integer),
                ("o_comment", String),
            ],
        );
        catalog.define(
            "lineitem",
            &[
                ("l_orderkey", BigInt),
                ("l_partkey", Integer),
                ("l_suppkey", Integer),
                ("l_linenumber", Integer),
                ("l_quantity", Double),
                ("l_extendedprice", Double),
                ("l_discount", Double),
                ("l_tax", Double),
                ("l_returnflag", Char),
                ("l_linestatus", Char),
                ("l_shipdate", Date),
                ("l_commitdate", Date),
                ("l_receiptdate", Date),
                ("l_shipinstruct", String),
                ("l_shipmode", String),
                ("l_comment", String),
            ],
        );
        catalog.define(
            "nation",
            &[
                ("n_nationkey", Integer),
                ("n_name", String),
                ("n_regionkey", Integer),
                ("n_comment", String),
            ],
        );
        catalog.define(
            "region",
            &[
                ("r_regionkey", Integer),
                ("r_name", String),
                ("r_comment", String),
            ],
        );
        catalog
    }
}
