//! Election-driven lifecycle
//!
//! Wraps `lifecycle` with a cap on the number of elections a single call
//! may carry. Settlement workflows process one election at a time so that
//! each produces exactly one effect.

use std::fmt;
use std::num::NonZeroUsize;

use crate::claim::Claim;
use crate::config::{ConfigResult, EngineConfig};
use crate::observation::{Number, Oracle};

use super::engine::{lifecycle, Reduction};
use super::errors::{LifecycleError, LifecycleResult};
use super::event::LifecycleEvent;

/// Lifecycle engine that rejects event lists with too many elections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectionEngine {
    max_elections_per_call: NonZeroUsize,
}

impl ElectionEngine {
    pub fn new(max_elections_per_call: NonZeroUsize) -> Self {
        Self {
            max_elections_per_call,
        }
    }

    /// One election per call
    pub fn single() -> Self {
        Self::new(NonZeroUsize::MIN)
    }

    /// Fails on the same zero limit `EngineConfig::validate` rejects
    pub fn from_config(config: &EngineConfig) -> ConfigResult<Self> {
        Ok(Self::new(config.election_limit()?))
    }

    pub fn max_elections_per_call(&self) -> usize {
        self.max_elections_per_call.get()
    }

    /// Validates the election count, then runs `lifecycle`.
    pub fn apply<T, X, A, O, R>(
        &self,
        claim: &Claim<T, X, A, O>,
        oracle: &R,
        events: &[LifecycleEvent<T>],
    ) -> LifecycleResult<Reduction<T, X, A, O>>
    where
        T: Ord + Clone + fmt::Debug,
        X: Number,
        A: Clone + PartialEq,
        O: Clone + PartialEq + fmt::Debug,
        R: Oracle<O, T, X> + ?Sized,
    {
        let elections = events.iter().filter(|e| e.is_election()).count();
        let allowed = self.max_elections_per_call();
        if elections > allowed {
            return Err(LifecycleError::multiple_elections(elections, allowed));
        }
        lifecycle(claim, oracle, events)
    }
}

impl Default for ElectionEngine {
    fn default() -> Self {
        Self::single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Electable;
    use crate::lifecycle::errors::LifecycleErrorCode;
    use crate::observation::FixingTable;

    type C = Claim<u32, f64, String, String>;

    fn choice() -> C {
        C::and(
            C::or(Electable::new("A", C::one("USD".into())), Electable::new("B", C::zero())),
            C::or(Electable::new("C", C::one("EUR".into())), Electable::new("D", C::zero())),
        )
    }

    #[test]
    fn test_single_election_accepted() {
        let oracle = FixingTable::<String, u32, f64>::new();
        let r = ElectionEngine::single()
            .apply(&choice(), &oracle, &[LifecycleEvent::election(1, "A", true)])
            .unwrap();
        assert_eq!(r.pending.len(), 1);
        assert!(!r.is_discharged());
    }

    #[test]
    fn test_two_elections_rejected_by_default() {
        let oracle = FixingTable::<String, u32, f64>::new();
        let events = [
            LifecycleEvent::election(1, "A", true),
            LifecycleEvent::election(2, "C", true),
        ];
        let err = ElectionEngine::default()
            .apply(&choice(), &oracle, &events)
            .unwrap_err();
        assert_eq!(err.code(), LifecycleErrorCode::CtgMultipleElections);
    }

    #[test]
    fn test_raised_limit_allows_batches() {
        let oracle = FixingTable::<String, u32, f64>::new();
        let events = [
            LifecycleEvent::election(1, "A", true),
            LifecycleEvent::election(2, "C", true),
        ];
        let r = ElectionEngine::new(NonZeroUsize::new(2).unwrap())
            .apply(&choice(), &oracle, &events)
            .unwrap();
        assert!(r.is_discharged());
        assert_eq!(r.pending.len(), 2);
    }

    #[test]
    fn test_zero_limit_in_config_rejected() {
        let config = EngineConfig {
            max_elections_per_call: 0,
            ..EngineConfig::default()
        };
        let err = ElectionEngine::from_config(&config).unwrap_err();
        assert_eq!(err.code(), crate::config::ConfigErrorCode::CtgConfigInvalid);
        assert_eq!(ElectionEngine::default().max_elections_per_call(), 1);
    }

    #[test]
    fn test_time_events_not_counted() {
        let oracle = FixingTable::<String, u32, f64>::new();
        let events = [
            LifecycleEvent::at(1),
            LifecycleEvent::election(2, "A", true),
            LifecycleEvent::at(3),
        ];
        assert!(ElectionEngine::single().apply(&choice(), &oracle, &events).is_ok());
    }
}
