//! TPC-H `.tbl` ingestion.
//!
//! Reads the `|`-delimited table dumps and writes one binary column file
//! per attribute at `<out_dir>/<relation>/<attribute>.bin`, ready for the
//! generated program to map.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use strata_catalog::{Catalog, Relation};
use tracing::info;

use crate::column::ColumnData;
use crate::error::StorageError;

/// Per-relation row counts of one import run.
#[derive(Debug, Default)]
pub struct ImportStats {
    pub rows: Vec<(String, u64)>,
}

impl ImportStats {
    pub fn total_rows(&self) -> u64 {
        self.rows.iter().map(|(_, n)| n).sum()
    }
}

/// Import every relation in the catalog from `<tbl_dir>/<relation>.tbl`.
pub fn import_all(
    catalog: &Catalog,
    tbl_dir: &Path,
    out_dir: &Path,
) -> Result<ImportStats, StorageError> {
    let mut stats = ImportStats::default();
    for rel in catalog.relations() {
        let tbl_path = tbl_dir.join(format!("{}.tbl", rel.name));
        let rows = import_relation(rel, &tbl_path, out_dir)?;
        info!(relation = %rel.name, rows, "imported");
        stats.rows.push((rel.name.clone(), rows));
    }
    Ok(stats)
}

/// Import one relation; returns the row count.
pub fn import_relation(
    rel: &Relation,
    tbl_path: &Path,
    out_dir: &Path,
) -> Result<u64, StorageError> {
    let mut columns: Vec<ColumnData> = rel
        .attributes
        .iter()
        .map(|(_, ty)| ColumnData::for_type(*ty))
        .collect();

    // TPC-H rows end with a trailing delimiter, so records carry one empty
    // field past the schema; `flexible` tolerates it and the comments can
    // contain quote characters, so quoting is off entirely.
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_path(tbl_path)?;

    let mut rows = 0u64;
    for record in reader.records() {
        let record = record?;
        for (i, (attribute, _)) in rel.attributes.iter().enumerate() {
            let field = record.get(i).ok_or_else(|| StorageError::ShortRecord {
                relation: rel.name.clone(),
                attribute: attribute.clone(),
                row: rows,
            })?;
            columns[i]
                .push_field(field)
                .map_err(|source| StorageError::BadField {
                    relation: rel.name.clone(),
                    attribute: attribute.clone(),
                    row: rows,
                    source,
                })?;
        }
        rows += 1;
    }

    let rel_dir = out_dir.join(&rel.name);
    fs::create_dir_all(&rel_dir)?;
    for ((attribute, _), column) in rel.attributes.iter().zip(columns.iter()) {
        column.write(&rel_dir.join(format!("{attribute}.bin")))?;
    }
    Ok(rows)
}
