//! Effect assembly
//!
//! Turns an election request or a time event against the current version of
//! an instrument into an `Effect` and, unless the instrument is discharged,
//! its next version.
//!
//! Election flow:
//! 1. Validate the request (positive amount, not before the last event)
//! 2. Replay from inception and check the version id (if enabled)
//! 3. Apply the election through the `ElectionEngine`
//! 4. Split realized quantities from the elector's perspective
//! 5. Mint the next version

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::claim::{Claim, Tag};
use crate::config::{ConfigResult, EngineConfig};
use crate::lifecycle::{
    lifecycle, split_pending, ElectionEngine, LifecycleError, LifecycleEvent, Reduction,
};
use crate::observability::{log_event_with_fields, Event};
use crate::observation::{Number, Oracle};

use super::effect::Effect;
use super::errors::{EffectError, EffectResult};
use super::version::InstrumentVersion;

pub type Party = String;

/// A party's request to exercise a choice of an instrument it holds
/// `amount` units of
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionRequest<T, X> {
    pub elector: Party,
    pub counterparty: Party,
    pub elector_is_owner: bool,
    pub tag: Tag,
    pub amount: X,
    pub time: T,
}

/// Result of an applied election
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionOutcome<T, X, A, O> {
    pub effect: Effect<T, X, A>,
    /// `None` once the instrument is discharged
    pub version: Option<InstrumentVersion<T, X, A, O>>,
    pub elector: Party,
    pub counterparty: Party,
    /// Units of the instrument the effect applies to
    pub amount: X,
}

/// Result of a time event that changed the instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOutcome<T, X, A, O> {
    pub effect: Effect<T, X, A>,
    pub version: Option<InstrumentVersion<T, X, A, O>>,
}

#[derive(Debug, Clone, Default)]
pub struct EffectProcessor {
    config: EngineConfig,
    engine: ElectionEngine,
}

impl EffectProcessor {
    pub fn new(config: EngineConfig) -> ConfigResult<Self> {
        Ok(Self {
            engine: ElectionEngine::from_config(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies one election to `current`.
    ///
    /// `inception` is the tree `current` descends from; it is only read
    /// when replay verification is enabled.
    pub fn process_election<T, X, A, O, R>(
        &self,
        inception: &Claim<T, X, A, O>,
        current: &InstrumentVersion<T, X, A, O>,
        oracle: &R,
        request: &ElectionRequest<T, X>,
    ) -> EffectResult<ElectionOutcome<T, X, A, O>>
    where
        T: Ord + Clone + fmt::Debug + Serialize,
        X: Number + Serialize,
        A: Clone + PartialEq + Serialize,
        O: Clone + PartialEq + fmt::Debug + Serialize,
        R: Oracle<O, T, X> + ?Sized,
    {
        let time = format!("{:?}", request.time);
        self.log(
            Event::ElectionReceived,
            &[
                ("elector", request.elector.as_str()),
                ("tag", request.tag.as_str()),
                ("time", time.as_str()),
                ("version", current.id.as_str()),
            ],
        );

        self.validate_request(current, request)
            .and_then(|()| self.verify_replay(inception, current, oracle))
            .map_err(|e| self.rejected(&request.tag, e))?;

        let event = LifecycleEvent::election(
            request.time.clone(),
            request.tag.clone(),
            request.elector_is_owner,
        );
        let reduction = self
            .engine
            .apply(&current.claim, oracle, std::slice::from_ref(&event))
            .map_err(|e| self.rejected(&request.tag, e.into()))?;

        let (effect, version) =
            self.assemble(current, reduction, event, request.elector_is_owner)?;

        self.log(
            Event::ElectionApplied,
            &[
                ("elector", request.elector.as_str()),
                ("tag", request.tag.as_str()),
                ("time", time.as_str()),
                ("version", current.id.as_str()),
            ],
        );

        Ok(ElectionOutcome {
            effect,
            version,
            elector: request.elector.clone(),
            counterparty: request.counterparty.clone(),
            amount: request.amount.clone(),
        })
    }

    /// Applies the passage of time to `current`, from the holder's
    /// perspective.
    ///
    /// Returns `None` when the event changes nothing, such as a payment
    /// date that has not been reached.
    pub fn process_time<T, X, A, O, R>(
        &self,
        current: &InstrumentVersion<T, X, A, O>,
        oracle: &R,
        time: T,
    ) -> EffectResult<Option<TimeOutcome<T, X, A, O>>>
    where
        T: Ord + Clone + fmt::Debug + Serialize,
        X: Number + Serialize,
        A: Clone + PartialEq + Serialize,
        O: Clone + PartialEq + fmt::Debug + Serialize,
        R: Oracle<O, T, X> + ?Sized,
    {
        let rendered = format!("{:?}", time);
        check_not_before_last(current, &time)?;

        let reduction = lifecycle(&current.claim, oracle, &[LifecycleEvent::at(time.clone())])?;
        let unchanged =
            reduction.pending.is_empty() && reduction.remaining.as_ref() == Some(&current.claim);
        if unchanged {
            self.log(
                Event::LifecycleNoop,
                &[("time", rendered.as_str()), ("version", current.id.as_str())],
            );
            return Ok(None);
        }

        let (effect, version) = self.assemble(current, reduction, LifecycleEvent::at(time), true)?;
        self.log(
            Event::TimeEventApplied,
            &[("time", rendered.as_str()), ("version", current.id.as_str())],
        );

        Ok(Some(TimeOutcome { effect, version }))
    }

    fn validate_request<T, X, A, O>(
        &self,
        current: &InstrumentVersion<T, X, A, O>,
        request: &ElectionRequest<T, X>,
    ) -> EffectResult<()>
    where
        T: Ord + fmt::Debug,
        X: Number,
    {
        match request.amount.partial_cmp(&X::zero()) {
            Some(Ordering::Greater) => check_not_before_last(current, &request.time),
            _ => Err(EffectError::invalid_election(format!(
                "election amount must be positive, got {}",
                request.amount
            ))),
        }
    }

    fn verify_replay<T, X, A, O, R>(
        &self,
        inception: &Claim<T, X, A, O>,
        current: &InstrumentVersion<T, X, A, O>,
        oracle: &R,
    ) -> EffectResult<()>
    where
        T: Ord + Clone + fmt::Debug + Serialize,
        X: Number + Serialize,
        A: Clone + PartialEq + Serialize,
        O: Clone + PartialEq + fmt::Debug + Serialize,
        R: Oracle<O, T, X> + ?Sized,
    {
        if !self.config.verify_replay {
            return Ok(());
        }

        let events = current.history.len().to_string();
        self.log(
            Event::ReplayStart,
            &[("events", events.as_str()), ("version", current.id.as_str())],
        );

        let replayed = InstrumentVersion::reconstruct(inception, oracle, &current.history)?;
        if replayed.id != current.id {
            self.log(
                Event::ReplayMismatch,
                &[
                    ("replayed", replayed.id.as_str()),
                    ("version", current.id.as_str()),
                ],
            );
            return Err(EffectError::version_mismatch(&current.id, &replayed.id));
        }

        self.log(Event::ReplayComplete, &[("version", current.id.as_str())]);
        Ok(())
    }

    fn assemble<T, X, A, O>(
        &self,
        current: &InstrumentVersion<T, X, A, O>,
        reduction: Reduction<T, X, A, O>,
        event: LifecycleEvent<T>,
        elector_is_owner: bool,
    ) -> EffectResult<(Effect<T, X, A>, Option<InstrumentVersion<T, X, A, O>>)>
    where
        T: Clone,
        X: Clone,
        A: Clone,
        Claim<T, X, A, O>: Serialize,
    {
        let split = split_pending(&reduction.pending, elector_is_owner);
        let time = event.time.clone();

        let version = match reduction.remaining {
            Some(claim) => {
                let version = current.advance(claim, event)?;
                self.log(
                    Event::VersionMinted,
                    &[
                        ("previous", current.id.as_str()),
                        ("version", version.id.as_str()),
                    ],
                );
                Some(version)
            }
            None => {
                self.log(Event::InstrumentDischarged, &[("version", current.id.as_str())]);
                None
            }
        };

        let effect = Effect::new(
            current.id.clone(),
            version.as_ref().map(|v| v.id.clone()),
            split,
            time,
        );
        Ok((effect, version))
    }

    fn rejected(&self, tag: &str, err: EffectError) -> EffectError {
        self.log(
            Event::ElectionRejected,
            &[("code", err.code().code()), ("reason", err.message()), ("tag", tag)],
        );
        err
    }

    fn log(&self, event: Event, fields: &[(&str, &str)]) {
        if self.config.log_lifecycle {
            log_event_with_fields(event, fields);
        }
    }
}

fn check_not_before_last<T, X, A, O>(current: &InstrumentVersion<T, X, A, O>, time: &T) -> EffectResult<()>
where
    T: Ord + fmt::Debug,
{
    match &current.last_event_time {
        Some(last) if time < last => Err(LifecycleError::precedes_last_event(time, last).into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Electable;
    use crate::effect::errors::EffectErrorCode;
    use crate::lifecycle::{LifecycleErrorCode, Quantity};
    use crate::effect::VersionId;
    use crate::observation::{FixingTable, Inequality, Observation};

    type C = Claim<u32, f64, String, String>;
    type Table = FixingTable<String, u32, f64>;

    fn usd() -> C {
        C::one("USD".into())
    }

    /// Pays 1 USD at 10 and 100 USD at 20 unless the issuer calls at 15
    fn callable() -> C {
        C::and(
            C::when(Inequality::at_or_after(10), usd()),
            C::when(
                Inequality::at_or_after(15),
                C::or(
                    Electable::new("CALLED", C::scale(Observation::constant(100.0), usd())),
                    Electable::new(
                        "NOT CALLED",
                        C::when(
                            Inequality::at_or_after(20),
                            C::scale(Observation::constant(100.0), usd()),
                        ),
                    ),
                ),
            ),
        )
    }

    fn processor() -> EffectProcessor {
        EffectProcessor::new(EngineConfig::quiet()).unwrap()
    }

    fn request(tag: &str, amount: f64, time: u32) -> ElectionRequest<u32, f64> {
        ElectionRequest {
            elector: "issuer".into(),
            counterparty: "holder".into(),
            elector_is_owner: false,
            tag: tag.into(),
            amount,
            time,
        }
    }

    #[test]
    fn test_premature_time_event_is_noop() {
        let v = InstrumentVersion::inception(callable()).unwrap();
        assert!(processor().process_time(&v, &Table::new(), 5).unwrap().is_none());
    }

    #[test]
    fn test_time_event_pays_coupon() {
        let v = InstrumentVersion::inception(callable()).unwrap();
        let outcome = processor().process_time(&v, &Table::new(), 10).unwrap().unwrap();
        assert_eq!(
            outcome.effect.produced,
            vec![Quantity { asset: "USD".to_string(), amount: 1.0 }]
        );
        assert!(outcome.effect.consumed.is_empty());
        let next = outcome.version.unwrap();
        assert_eq!(outcome.effect.produced_version, Some(next.id.clone()));
        assert_eq!(next.last_event_time, Some(10));
        assert_eq!(next.history, vec![LifecycleEvent::at(10)]);
    }

    #[test]
    fn test_election_after_time_events_through_cond() {
        let inception = C::and_all(vec![
            C::cond(
                Inequality::at_or_before(5),
                C::when(Inequality::at_or_after(3), usd()),
                C::when(Inequality::at_or_after(30), C::one("EUR".into())),
            ),
            C::when(Inequality::at_or_after(12), C::one("GBP".into())),
            C::when(
                Inequality::at_or_after(20),
                C::or(Electable::new("A", usd()), Electable::new("B", C::zero())),
            ),
        ]);
        let table = Table::new();
        let v0 = InstrumentVersion::inception(inception.clone()).unwrap();

        let v1 = processor().process_time(&v0, &table, 4).unwrap().unwrap().version.unwrap();
        let v2 = processor().process_time(&v1, &table, 12).unwrap().unwrap().version.unwrap();
        assert_eq!(v2.history, vec![LifecycleEvent::at(4), LifecycleEvent::at(12)]);

        let mut elect = request("A", 1.0, 20);
        elect.elector_is_owner = true;
        let outcome = processor()
            .process_election(&inception, &v2, &table, &elect)
            .unwrap();
        assert_eq!(
            outcome.effect.produced,
            vec![Quantity { asset: "USD".to_string(), amount: 1.0 }]
        );
        assert!(outcome.effect.discharges());
    }

    #[test]
    fn test_call_election_from_issuer_side() {
        let inception = callable();
        let v = InstrumentVersion::inception(inception.clone()).unwrap();
        let after_coupon = processor()
            .process_time(&v, &Table::new(), 10)
            .unwrap()
            .unwrap()
            .version
            .unwrap();

        let outcome = processor()
            .process_election(&inception, &after_coupon, &Table::new(), &request("CALLED", 1000.0, 15))
            .unwrap();
        // The issuer is the counterparty: the redemption leaves it
        assert_eq!(
            outcome.effect.consumed,
            vec![Quantity { asset: "USD".to_string(), amount: 100.0 }]
        );
        assert!(outcome.effect.discharges());
        assert!(outcome.version.is_none());
        assert_eq!(outcome.amount, 1000.0);
        assert_eq!(outcome.effect.target_version, after_coupon.id);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let v = InstrumentVersion::inception(callable()).unwrap();
        let err = processor()
            .process_election(&callable(), &v, &Table::new(), &request("CALLED", 0.0, 15))
            .unwrap_err();
        assert_eq!(err.code(), EffectErrorCode::CtgInvalidElection);
    }

    #[test]
    fn test_election_before_last_event_rejected() {
        let mut v = InstrumentVersion::inception(callable()).unwrap();
        v.last_event_time = Some(16);
        let err = processor()
            .process_election(&callable(), &v, &Table::new(), &request("CALLED", 1.0, 15))
            .unwrap_err();
        assert_eq!(err.lifecycle_code(), Some(LifecycleErrorCode::CtgEventsUnordered));
    }

    #[test]
    fn test_tampered_version_fails_replay() {
        let mut v = InstrumentVersion::inception(callable()).unwrap();
        v.claim = usd();
        v.id = VersionId::of(&v.claim).unwrap();
        let err = processor()
            .process_election(&callable(), &v, &Table::new(), &request("CALLED", 1.0, 15))
            .unwrap_err();
        assert_eq!(err.code(), EffectErrorCode::CtgVersionMismatch);
    }

    #[test]
    fn test_replay_check_can_be_disabled() {
        let config = EngineConfig {
            verify_replay: false,
            ..EngineConfig::quiet()
        };
        let v = InstrumentVersion::inception(callable()).unwrap();
        // The inception passed in is unrelated, so only a disabled check lets this through
        let outcome = EffectProcessor::new(config)
            .unwrap()
            .process_election(&usd(), &v, &Table::new(), &request("NOT CALLED", 1.0, 15))
            .unwrap();
        assert!(outcome.version.is_some());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let v = InstrumentVersion::inception(callable()).unwrap();
        let err = processor()
            .process_election(&callable(), &v, &Table::new(), &request("PUT", 1.0, 15))
            .unwrap_err();
        assert_eq!(err.lifecycle_code(), Some(LifecycleErrorCode::CtgUnmatchedElectionTag));
    }
}
