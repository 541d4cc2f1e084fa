//! Information units and IU sets.

use std::ops::{BitAnd, BitOr, Sub};
use std::rc::Rc;

use strata_types::Type;

/// A handle for one named, typed value in the generated program.
///
/// Identity is the handle, not the name: two scans of the same relation get
/// distinct IUs for the same attribute. The `id` is unique within one
/// compilation and gives IU sets a deterministic order.
#[derive(Debug)]
pub struct Iu {
    pub name: String,
    pub ty: Type,
    /// Globally unique identifier of this value in the generated program.
    pub varname: String,
    pub(crate) id: u32,
}

/// Shared IU handle. The operator that creates an IU owns the `Rc`;
/// everyone else borrows a clone.
pub type IuRef = Rc<Iu>;

/// An unordered set of IUs, stored sorted by handle id.
#[derive(Debug, Clone, Default)]
pub struct IuSet {
    v: Vec<IuRef>,
}

impl IuSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a vector of distinct IUs.
    ///
    /// # Panics
    ///
    /// Panics if the vector contains the same handle twice; that is a bug
    /// in the calling operator.
    pub fn from_vec(mut v: Vec<IuRef>) -> Self {
        v.sort_by_key(|iu| iu.id);
        assert!(
            v.windows(2).all(|w| w[0].id != w[1].id),
            "duplicate IU passed to IuSet"
        );
        IuSet { v }
    }

    /// Singleton set.
    pub fn one(iu: &IuRef) -> Self {
        IuSet {
            v: vec![iu.clone()],
        }
    }

    pub fn add(&mut self, iu: &IuRef) {
        if let Err(pos) = self.v.binary_search_by_key(&iu.id, |x| x.id) {
            self.v.insert(pos, iu.clone());
        }
    }

    pub fn contains(&self, iu: &IuRef) -> bool {
        self.v.binary_search_by_key(&iu.id, |x| x.id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    /// Iterate in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &IuRef> {
        self.v.iter()
    }

    pub fn as_slice(&self) -> &[IuRef] {
        &self.v
    }
}

impl PartialEq for IuSet {
    fn eq(&self, other: &Self) -> bool {
        self.v.len() == other.v.len()
            && self
                .v
                .iter()
                .zip(other.v.iter())
                .all(|(a, b)| a.id == b.id)
    }
}

impl Eq for IuSet {}

/// Set union.
impl BitOr for &IuSet {
    type Output = IuSet;

    fn bitor(self, rhs: &IuSet) -> IuSet {
        let mut out = Vec::with_capacity(self.v.len() + rhs.v.len());
        let (mut i, mut j) = (0, 0);
        while i < self.v.len() && j < rhs.v.len() {
            let (a, b) = (&self.v[i], &rhs.v[j]);
            match a.id.cmp(&b.id) {
                std::cmp::Ordering::Less => {
                    out.push(a.clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push(b.clone());
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push(a.clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend(self.v[i..].iter().cloned());
        out.extend(rhs.v[j..].iter().cloned());
        IuSet { v: out }
    }
}

/// Set intersection.
impl BitAnd for &IuSet {
    type Output = IuSet;

    fn bitand(self, rhs: &IuSet) -> IuSet {
        let out = self
            .v
            .iter()
            .filter(|iu| rhs.contains(iu))
            .cloned()
            .collect();
        IuSet { v: out }
    }
}

/// Set difference.
impl Sub for &IuSet {
    type Output = IuSet;

    fn sub(self, rhs: &IuSet) -> IuSet {
        let out = self
            .v
            .iter()
            .filter(|iu| !rhs.contains(iu))
            .cloned()
            .collect();
        IuSet { v: out }
    }
}

/// Comma-joined type names of `ius`, for tuple declarations.
pub fn format_types(ius: &[IuRef]) -> String {
    ius.iter()
        .map(|iu| iu.ty.cpp_name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Comma-joined varnames of `ius`.
pub fn format_varnames(ius: &[IuRef]) -> String {
    ius.iter()
        .map(|iu| iu.varname.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
