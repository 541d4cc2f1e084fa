//! Table scan.

use strata_catalog::Catalog;

use crate::error::CodegenError;
use crate::gen::Codegen;
use crate::iu::{IuRef, IuSet};
use crate::op::Consumer;

/// Column-driven loop over one relation.
#[derive(Debug)]
pub struct Scan {
    rel_name: String,
    attributes: Vec<IuRef>,
}

impl Scan {
    /// Look up `rel_name` in the catalog and materialize one IU per
    /// attribute.
    pub fn new(gen: &mut Codegen, catalog: &Catalog, rel_name: &str) -> Result<Self, CodegenError> {
        let rel = catalog
            .relation(rel_name)
            .ok_or_else(|| CodegenError::UnknownRelation {
                name: rel_name.to_string(),
            })?;
        let attributes = rel
            .attributes
            .iter()
            .map(|(name, ty)| gen.new_iu(name, *ty))
            .collect();
        Ok(Scan {
            rel_name: rel_name.to_string(),
            attributes,
        })
    }

    /// Handle for the named attribute.
    pub fn iu(&self, name: &str) -> Result<IuRef, CodegenError> {
        self.attributes
            .iter()
            .find(|iu| iu.name == name)
            .cloned()
            .ok_or_else(|| CodegenError::UnknownAttribute {
                relation: self.rel_name.clone(),
                name: name.to_string(),
            })
    }

    /// Handles for several attributes at once.
    pub fn ius(&self, names: &[&str]) -> Result<Vec<IuRef>, CodegenError> {
        names.iter().map(|name| self.iu(name)).collect()
    }

    pub(crate) fn available_ius(&self) -> IuSet {
        IuSet::from_vec(self.attributes.clone())
    }

    pub(crate) fn produce(&self, gen: &mut Codegen, required: &IuSet, consume: Consumer) {
        gen.block(
            &format!(
                "for (uint64_t i = 0; i != db.{}.tupleCount; i++)",
                self.rel_name
            ),
            |g| {
                // only bind what the consumer asked for, dead columns are
                // never read
                for iu in required.iter() {
                    g.provide(iu, format!("db.{}.{}[i]", self.rel_name, iu.name));
                }
                consume(g);
            },
        );
    }
}
