//! Binary column files.
//!
//! Fixed-size columns are raw native-endian value arrays, one file per
//! column. String columns hold a `u64` count, then `count` slots of
//! `(u64 size, u64 offset)` with offsets measured from the start of the
//! file, then the string bytes. The generated program maps these files
//! read-only and indexes them directly.

use std::fs;
use std::path::Path;

use strata_types::{Date, Type, TypeError};

use crate::error::StorageError;

/// In-memory accumulator for one column, typed per the catalog.
#[derive(Debug)]
pub enum ColumnData {
    Integer(Vec<i32>),
    BigInt(Vec<i64>),
    Double(Vec<f64>),
    Char(Vec<u8>),
    String(Vec<String>),
    Bool(Vec<bool>),
    Date(Vec<Date>),
}

impl ColumnData {
    /// Empty accumulator for a catalog type.
    ///
    /// # Panics
    ///
    /// Panics for `Undefined`, which never appears in the catalog.
    pub fn for_type(ty: Type) -> Self {
        match ty {
            Type::Integer => ColumnData::Integer(Vec::new()),
            Type::BigInt => ColumnData::BigInt(Vec::new()),
            Type::Double => ColumnData::Double(Vec::new()),
            Type::Char => ColumnData::Char(Vec::new()),
            Type::String => ColumnData::String(Vec::new()),
            Type::Bool => ColumnData::Bool(Vec::new()),
            Type::Date => ColumnData::Date(Vec::new()),
            Type::Undefined => panic!("Undefined type cannot be stored"),
        }
    }

    /// Parse one text field and append it.
    pub fn push_field(&mut self, text: &str) -> Result<(), TypeError> {
        match self {
            ColumnData::Integer(v) => v.push(
                text.trim()
                    .parse()
                    .map_err(|_| TypeError::invalid_field(Type::Integer, text))?,
            ),
            ColumnData::BigInt(v) => v.push(
                text.trim()
                    .parse()
                    .map_err(|_| TypeError::invalid_field(Type::BigInt, text))?,
            ),
            ColumnData::Double(v) => v.push(
                text.trim()
                    .parse()
                    .map_err(|_| TypeError::invalid_field(Type::Double, text))?,
            ),
            ColumnData::Char(v) => {
                let bytes = text.as_bytes();
                if bytes.len() != 1 {
                    return Err(TypeError::invalid_field(Type::Char, text));
                }
                v.push(bytes[0]);
            }
            ColumnData::String(v) => v.push(text.to_string()),
            ColumnData::Bool(v) => v.push(
                text.trim()
                    .parse()
                    .map_err(|_| TypeError::invalid_field(Type::Bool, text))?,
            ),
            ColumnData::Date(v) => v.push(text.parse()?),
        }
        Ok(())
    }

    /// Number of accumulated values.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::BigInt(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::Char(v) => v.len(),
            ColumnData::String(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Date(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the column to `path` in the mapped-file layout.
    pub fn write(&self, path: &Path) -> Result<(), StorageError> {
        let bytes = match self {
            ColumnData::Integer(v) => fixed_bytes(v, |x| x.to_ne_bytes().to_vec()),
            ColumnData::BigInt(v) => fixed_bytes(v, |x| x.to_ne_bytes().to_vec()),
            ColumnData::Double(v) => fixed_bytes(v, |x| x.to_ne_bytes().to_vec()),
            ColumnData::Char(v) => v.clone(),
            ColumnData::Bool(v) => v.iter().map(|&b| b as u8).collect(),
            ColumnData::Date(v) => fixed_bytes(v, |d| d.0.to_ne_bytes().to_vec()),
            ColumnData::String(v) => string_bytes(v),
        };
        fs::write(path, bytes)?;
        Ok(())
    }
}

fn fixed_bytes<T, F: Fn(&T) -> Vec<u8>>(values: &[T], encode: F) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * std::mem::size_of::<T>());
    for value in values {
        out.extend_from_slice(&encode(value));
    }
    out
}

fn string_bytes(values: &[String]) -> Vec<u8> {
    let header = 8 + 16 * values.len();
    let total: usize = header + values.iter().map(|s| s.len()).sum::<usize>();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(values.len() as u64).to_ne_bytes());
    let mut offset = header as u64;
    for s in values {
        out.extend_from_slice(&(s.len() as u64).to_ne_bytes());
        out.extend_from_slice(&offset.to_ne_bytes());
        offset += s.len() as u64;
    }
    for s in values {
        out.extend_from_slice(s.as_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_parses_per_type() {
        let mut col = ColumnData::for_type(Type::Integer);
        col.push_field("42").unwrap();
        col.push_field(" -3 ").unwrap();
        assert!(matches!(&col, ColumnData::Integer(v) if v == &vec![42, -3]));

        let mut col = ColumnData::for_type(Type::Date);
        col.push_field("1995-03-15").unwrap();
        assert!(matches!(&col, ColumnData::Date(v) if v[0] == Date(2449792)));

        let mut col = ColumnData::for_type(Type::Char);
        col.push_field("F").unwrap();
        assert!(matches!(&col, ColumnData::Char(v) if v == b"F"));
    }

    #[test]
    fn test_push_rejects_malformed_fields() {
        let mut col = ColumnData::for_type(Type::Integer);
        assert!(col.push_field("abc").is_err());
        let mut col = ColumnData::for_type(Type::Char);
        assert!(col.push_field("FO").is_err());
        let mut col = ColumnData::for_type(Type::Date);
        assert!(col.push_field("1995-99-01").is_err());
    }

    #[test]
    fn test_fixed_layout_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("col.bin");
        let mut col = ColumnData::for_type(Type::Integer);
        for field in ["1", "2", "300"] {
            col.push_field(field).unwrap();
        }
        col.write(&path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 12);
        let decoded: Vec<i32> = bytes
            .chunks_exact(4)
            .map(|c| i32::from_ne_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(decoded, vec![1, 2, 300]);
    }

    #[test]
    fn test_string_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("col.bin");
        let mut col = ColumnData::for_type(Type::String);
        col.push_field("ab").unwrap();
        col.push_field("").unwrap();
        col.push_field("xyz").unwrap();
        col.write(&path).unwrap();
        let bytes = fs::read(&path).unwrap();

        let count = u64::from_ne_bytes(bytes[0..8].try_into().unwrap());
        assert_eq!(count, 3);
        let header = 8 + 16 * 3;
        assert_eq!(bytes.len(), header + 5);

        let slot = |i: usize| {
            let base = 8 + 16 * i;
            let size = u64::from_ne_bytes(bytes[base..base + 8].try_into().unwrap()) as usize;
            let offset =
                u64::from_ne_bytes(bytes[base + 8..base + 16].try_into().unwrap()) as usize;
            std::str::from_utf8(&bytes[offset..offset + size]).unwrap()
        };
        assert_eq!(slot(0), "ab");
        assert_eq!(slot(1), "");
        assert_eq!(slot(2), "xyz");
    }
}
