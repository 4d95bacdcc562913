//! Settlement effects

use serde::{Deserialize, Serialize};

use crate::lifecycle::{Quantity, SplitPending};

use super::version::VersionId;

/// What one lifecycle step means for settlement, per unit of instrument.
///
/// `consumed` leaves the perspective party, `produced` reaches it. The
/// holding of `target_version` is replaced by `produced_version`, or
/// archived when the instrument is fully discharged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect<T, X, A> {
    pub target_version: VersionId,
    pub produced_version: Option<VersionId>,
    pub consumed: Vec<Quantity<X, A>>,
    pub produced: Vec<Quantity<X, A>>,
    pub settlement_time: T,
}

impl<T, X, A> Effect<T, X, A> {
    pub fn new(
        target_version: VersionId,
        produced_version: Option<VersionId>,
        split: SplitPending<X, A>,
        settlement_time: T,
    ) -> Self {
        Self {
            target_version,
            produced_version,
            consumed: split.consumed,
            produced: split.produced,
            settlement_time,
        }
    }

    /// Returns true if the instrument has nothing left after this effect
    pub fn discharges(&self) -> bool {
        self.produced_version.is_none()
    }

    /// Returns true if no quantity moves
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty() && self.produced.is_empty()
    }
}
