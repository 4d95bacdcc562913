//! Instrument versions
//!
//! A version is a content-addressed claim tree together with the history
//! that produced it from inception. Ids hash the canonical JSON encoding of
//! the tree, so two versions with equal trees share an id and any holder can
//! check a version by replaying its history.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::claim::{Claim, ClaimSource, TaggedClaim};
use crate::lifecycle::{lifecycle, LifecycleEvent};
use crate::observation::{Number, Oracle};

use super::errors::{EffectError, EffectResult};

/// `sha256:<hex>` of a claim tree's JSON encoding
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    /// Hashes the encoding of `claim`
    pub fn of<T, X, A, O>(claim: &Claim<T, X, A, O>) -> EffectResult<Self>
    where
        Claim<T, X, A, O>: Serialize,
    {
        let bytes = serde_json::to_vec(claim).map_err(EffectError::encoding_failed)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(Self(format!("sha256:{:x}", hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A claim tree at a point of its life
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentVersion<T, X, A, O> {
    pub id: VersionId,
    pub claim: Claim<T, X, A, O>,
    /// Events that changed the tree since inception, oldest first
    pub history: Vec<LifecycleEvent<T>>,
    /// Time of the latest applied event, or the acquisition time; `None`
    /// at inception
    pub last_event_time: Option<T>,
}

impl<T, X, A, O> InstrumentVersion<T, X, A, O>
where
    Claim<T, X, A, O>: Serialize,
{
    /// The first version of a tree, with empty history
    pub fn inception(claim: Claim<T, X, A, O>) -> EffectResult<Self> {
        Ok(Self {
            id: VersionId::of(&claim)?,
            claim,
            history: Vec::new(),
            last_event_time: None,
        })
    }

    /// Asks a builder for its claims as of `acquisition_time` and merges
    /// them into an inception version. Events before the acquisition time
    /// are rejected from then on.
    pub fn acquire<S>(source: &S, acquisition_time: T) -> EffectResult<Self>
    where
        S: ClaimSource<T, X, A, O> + ?Sized,
    {
        let claims = source.claims(&acquisition_time)?;
        let mut version = Self::inception(TaggedClaim::merge(claims))?;
        version.last_event_time = Some(acquisition_time);
        Ok(version)
    }

    /// Fast-forwards `inception` through `history`.
    ///
    /// Quantities realized on the way are discarded; they were settled by
    /// the effects that produced the intermediate versions.
    pub fn reconstruct<R>(
        inception: &Claim<T, X, A, O>,
        oracle: &R,
        history: &[LifecycleEvent<T>],
    ) -> EffectResult<Self>
    where
        T: Ord + Clone + fmt::Debug,
        X: Number,
        A: Clone + PartialEq,
        O: Clone + PartialEq + fmt::Debug,
        R: Oracle<O, T, X> + ?Sized,
    {
        let reduction = lifecycle(inception, oracle, history)?;
        let claim = reduction.remaining.unwrap_or(Claim::Zero);
        Ok(Self {
            id: VersionId::of(&claim)?,
            claim,
            history: history.to_vec(),
            last_event_time: history.last().map(|e| e.time.clone()),
        })
    }

    /// Next version after `event` reduced this one to `claim`
    pub fn advance(&self, claim: Claim<T, X, A, O>, event: LifecycleEvent<T>) -> EffectResult<Self>
    where
        T: Clone,
    {
        let mut history = self.history.clone();
        let last_event_time = Some(event.time.clone());
        history.push(event);
        Ok(Self {
            id: VersionId::of(&claim)?,
            claim,
            history,
            last_event_time,
        })
    }

    pub fn is_inception(&self) -> bool {
        self.history.is_empty() && self.last_event_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{ClaimResult, Electable};
    use crate::observation::{FixingTable, Inequality};

    type C = Claim<u32, f64, String, String>;

    fn callable() -> C {
        C::when(
            Inequality::at_or_after(5),
            C::or(
                Electable::new("CALLED", C::one("USD".into())),
                Electable::new("NOT CALLED", C::when(Inequality::at_or_after(10), C::one("USD".into()))),
            ),
        )
    }

    #[test]
    fn test_version_id_is_content_hash() {
        let a = VersionId::of(&callable()).unwrap();
        let b = VersionId::of(&callable()).unwrap();
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("sha256:"));
        assert_eq!(a.as_str().len(), "sha256:".len() + 64);
        assert_ne!(a, VersionId::of(&C::zero()).unwrap());
    }

    #[test]
    fn test_inception_has_no_history() {
        let v = InstrumentVersion::inception(callable()).unwrap();
        assert!(v.is_inception());
        assert_eq!(v.id, VersionId::of(&callable()).unwrap());
    }

    #[test]
    fn test_reconstruct_replays_history() {
        let oracle = FixingTable::<String, u32, f64>::new();
        let history = vec![
            LifecycleEvent::election(6, "NOT CALLED", false),
            LifecycleEvent::at(7),
        ];
        let v = InstrumentVersion::reconstruct(&callable(), &oracle, &history).unwrap();
        let expected = C::when(Inequality::at_or_after(10), C::one("USD".into()));
        assert_eq!(v.claim, expected);
        assert_eq!(v.id, VersionId::of(&expected).unwrap());
        assert_eq!(v.history, history);
        assert_eq!(v.last_event_time, Some(7));
    }

    #[test]
    fn test_advance_extends_history() {
        let oracle = FixingTable::<String, u32, f64>::new();
        let v0 = InstrumentVersion::inception(callable()).unwrap();
        let event = LifecycleEvent::election(6, "NOT CALLED", false);
        let remaining = lifecycle(&v0.claim, &oracle, &[event.clone()]).unwrap().remaining.unwrap();

        let v1 = v0.advance(remaining, event).unwrap();
        assert_eq!(v1.last_event_time, Some(6));
        assert_eq!(v1.history.len(), 1);
        assert_eq!(InstrumentVersion::reconstruct(&callable(), &oracle, &v1.history).unwrap(), v1);
    }

    #[test]
    fn test_reconstruct_without_events_is_inception() {
        let oracle = FixingTable::<String, u32, f64>::new();
        let v = InstrumentVersion::reconstruct(&callable(), &oracle, &[]).unwrap();
        assert_eq!(v, InstrumentVersion::inception(callable()).unwrap());
    }

    struct Coupons;

    impl ClaimSource<u32, f64, String, String> for Coupons {
        fn claims(&self, acquisition_time: &u32) -> ClaimResult<Vec<TaggedClaim<u32, f64, String, String>>> {
            Ok((1..=3)
                .map(|k| k * 10)
                .filter(|t| t > acquisition_time)
                .map(|t| {
                    TaggedClaim::new(
                        format!("coupon-{}", t),
                        C::when(Inequality::at_or_after(t), C::one("USD".into())),
                    )
                })
                .collect())
        }
    }

    #[test]
    fn test_acquire_skips_past_coupons() {
        let v = InstrumentVersion::acquire(&Coupons, 15).unwrap();
        assert_eq!(v.last_event_time, Some(15));
        assert_eq!(v.claim.node_count(), 5);
    }
}
