//! Oracle: the source of observable values
//!
//! The oracle is always passed explicitly into evaluation. It is treated as
//! a synchronous, side-effect-free function of `(id, time)`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Supplies the value of a named observable at a given time.
///
/// `None` means the oracle has no value; evaluation turns that into a
/// missing-observation error. There is no default or interpolation here.
pub trait Oracle<O, T, X> {
    fn observe(&self, id: &O, time: &T) -> Option<X>;
}

impl<O, T, X, F> Oracle<O, T, X> for F
where
    F: Fn(&O, &T) -> Option<X>,
{
    fn observe(&self, id: &O, time: &T) -> Option<X> {
        self(id, time)
    }
}

/// A single published value of an observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixing<O, T, X> {
    pub id: O,
    pub time: T,
    pub value: X,
}

/// In-memory oracle keyed by `(id, time)`.
///
/// Lookups are exact: a fixing recorded for one time says nothing about any
/// other time.
#[derive(Debug, Clone, PartialEq)]
pub struct FixingTable<O, T, X> {
    values: BTreeMap<(O, T), X>,
}

impl<O: Ord, T: Ord, X> FixingTable<O, T, X> {
    /// Creates an empty table
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Builds a table from a list of fixings. Later duplicates win.
    pub fn from_fixings(fixings: impl IntoIterator<Item = Fixing<O, T, X>>) -> Self {
        let mut table = Self::new();
        for fixing in fixings {
            table.insert(fixing.id, fixing.time, fixing.value);
        }
        table
    }

    /// Records a value, returning the one it replaced
    pub fn insert(&mut self, id: O, time: T, value: X) -> Option<X> {
        self.values.insert((id, time), value)
    }

    /// Builder-style insert
    pub fn with(mut self, id: O, time: T, value: X) -> Self {
        self.insert(id, time, value);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<O: Ord, T: Ord, X> Default for FixingTable<O, T, X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, T, X> Oracle<O, T, X> for FixingTable<O, T, X>
where
    O: Ord + Clone,
    T: Ord + Clone,
    X: Clone,
{
    fn observe(&self, id: &O, time: &T) -> Option<X> {
        self.values.get(&(id.clone(), time.clone())).cloned()
    }
}
