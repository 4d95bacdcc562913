//! Instrument builder interface
//!
//! Builders turn market conventions (schedules, day counts, rate fixings)
//! into claim trees. They live outside this crate; the lifecycle only needs
//! the trees they return.

use serde::{Deserialize, Serialize};

use super::errors::ClaimResult;
use super::types::{Claim, Tag};

/// A claim tree labelled by the builder (e.g. "coupon", "redemption")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedClaim<T, X, A, O> {
    pub tag: Tag,
    pub claim: Claim<T, X, A, O>,
}

impl<T, X, A, O> TaggedClaim<T, X, A, O> {
    pub fn new(tag: impl Into<Tag>, claim: Claim<T, X, A, O>) -> Self {
        Self {
            tag: tag.into(),
            claim,
        }
    }

    /// Merges a builder's claims into the single tree that is lifecycled.
    pub fn merge(claims: impl IntoIterator<Item = Self>) -> Claim<T, X, A, O> {
        Claim::and_all(claims.into_iter().map(|tagged| tagged.claim))
    }
}

/// Produces an instrument's claims as of its acquisition time.
pub trait ClaimSource<T, X, A, O> {
    fn claims(&self, acquisition_time: &T) -> ClaimResult<Vec<TaggedClaim<T, X, A, O>>>;
}
