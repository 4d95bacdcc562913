//! Realized quantities and their consumed/produced split

use serde::{Deserialize, Serialize};

/// A realized obligation whose timing is fixed but whose settlement has not
/// been recorded yet.
///
/// `given` is the parity of `Give` nodes on the path to the `One` leaf:
/// `false` flows to the claim's owner, `true` flows out of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pending<T, X, A> {
    pub time: T,
    pub asset: A,
    pub amount: X,
    pub given: bool,
}

impl<T, X, A> Pending<T, X, A> {
    /// Flips holder and counterparty
    pub fn flip(mut self) -> Self {
        self.given = !self.given;
        self
    }

    /// Drops the timing, keeping what settles
    pub fn quantity(&self) -> Quantity<X, A>
    where
        X: Clone,
        A: Clone,
    {
        Quantity {
            asset: self.asset.clone(),
            amount: self.amount.clone(),
        }
    }
}

/// An amount of an asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quantity<X, A> {
    pub asset: A,
    pub amount: X,
}

/// Pending quantities partitioned from the elector's point of view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPending<X, A> {
    /// Flowing out of the elector's position
    pub consumed: Vec<Quantity<X, A>>,
    /// Flowing into the elector's position
    pub produced: Vec<Quantity<X, A>>,
}

impl<X, A> SplitPending<X, A> {
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty() && self.produced.is_empty()
    }
}

/// Partitions pending quantities into consumed and produced.
///
/// A quantity is consumed when its `Give` parity matches the elector's
/// side: a given leg leaves the owner, an un-given leg leaves the
/// counterparty. Order within each side is preserved.
pub fn split_pending<T, X: Clone, A: Clone>(
    pending: &[Pending<T, X, A>],
    elector_is_owner: bool,
) -> SplitPending<X, A> {
    let (consumed, produced): (Vec<_>, Vec<_>) = pending
        .iter()
        .partition(|p| p.given == elector_is_owner);
    SplitPending {
        consumed: consumed.into_iter().map(Pending::quantity).collect(),
        produced: produced.into_iter().map(Pending::quantity).collect(),
    }
}
