//! Lifecycle reduction
//!
//! `lifecycle` folds a step function over an ordered event list, threading
//! each step's remaining tree into the next. The engine caches nothing
//! between calls, so a tree produced by N prior events can always be
//! rebuilt from the original tree and those events:
//!
//! `lifecycle(t, e1 ++ e2) == lifecycle(lifecycle(t, e1).remaining, e2)`
//!
//! Per step, for a single event at time `now`:
//! - `Zero` is discharged; `One` is realized at the acquisition time
//! - `Give` flips every quantity realized beneath it
//! - `And` reduces every child independently, order preserved
//! - `Or` descends into the elected alternative only, dropping the rest
//! - `Cond` descends into the branch selected at `now`
//! - `Scale` multiplies each quantity by the observation at its own time
//! - `When` stays deferred until its predicate holds, then fires for good
//! - `Anytime` descends when its tag is elected while the predicate holds
//! - `Until` is knocked out once its predicate holds

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::observation::{Inequality, Number, ObservationError, Oracle};

use super::errors::{LifecycleError, LifecycleResult};
use super::event::{Election, LifecycleEvent};
use super::pending::Pending;

/// Output of a lifecycle call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reduction<T, X, A, O> {
    /// Not-yet-realized tree; `None` once fully discharged
    pub remaining: Option<Claim<T, X, A, O>>,
    /// Quantities realized by the applied events, in tree order
    pub pending: Vec<Pending<T, X, A>>,
}

impl<T, X, A, O> Reduction<T, X, A, O> {
    /// Returns true if nothing is left to lifecycle
    pub fn is_discharged(&self) -> bool {
        self.remaining.is_none()
    }
}

/// Applies `events` to `claim` in order.
///
/// Events must be in non-decreasing time order. An event carrying an
/// election that no live `Or`/`Anytime` accepts is a fatal error, as is any
/// oracle miss; in every failure case nothing is returned.
pub fn lifecycle<T, X, A, O, R>(
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
    if let Some(index) = events.windows(2).position(|w| w[1].time < w[0].time) {
        return Err(LifecycleError::events_unordered(index + 1));
    }

    let mut current = claim.clone();
    let mut pending = Vec::new();

    for event in events {
        let reducer = Reducer {
            oracle,
            now: &event.time,
        };
        let scope = Scope {
            acquired: None,
            election: event.election.as_ref(),
        };
        let step = reducer.reduce(&current, &scope)?;

        if let Some(election) = &event.election {
            if !step.elected {
                return Err(LifecycleError::unmatched_election(&election.tag, &event.time));
            }
        }

        current = step.remaining.unwrap_or(Claim::Zero);
        pending.extend(step.pending);
    }

    let remaining = if current.is_zero() { None } else { Some(current) };
    Ok(Reduction { remaining, pending })
}

/// What the enclosing nodes have fixed for a subtree
struct Scope<'e, T> {
    /// When the subtree was acquired; `None` means at the event time
    acquired: Option<T>,
    /// Election not yet consumed by an ancestor
    election: Option<&'e Election>,
}

/// Result of reducing one node for one event
struct Step<T, X, A, O> {
    remaining: Option<Claim<T, X, A, O>>,
    pending: Vec<Pending<T, X, A>>,
    /// Whether the event's election was consumed somewhere below
    elected: bool,
}

impl<T, X, A, O> Step<T, X, A, O> {
    fn unchanged(claim: &Claim<T, X, A, O>) -> Self
    where
        Claim<T, X, A, O>: Clone,
    {
        Self {
            remaining: Some(claim.clone()),
            pending: Vec::new(),
            elected: false,
        }
    }

    fn discharged() -> Self {
        Self {
            remaining: None,
            pending: Vec::new(),
            elected: false,
        }
    }

    fn map_remaining(mut self, f: impl FnOnce(Claim<T, X, A, O>) -> Claim<T, X, A, O>) -> Self {
        self.remaining = self.remaining.map(f);
        self
    }
}

struct Reducer<'a, T, R: ?Sized> {
    oracle: &'a R,
    now: &'a T,
}

impl<'a, T, R: ?Sized> Reducer<'a, T, R>
where
    T: Ord + Clone + fmt::Debug,
{
    fn reduce<X, A, O>(&self, claim: &Claim<T, X, A, O>, scope: &Scope<'_, T>) -> LifecycleResult<Step<T, X, A, O>>
    where
        X: Number,
        A: Clone + PartialEq,
        O: Clone + PartialEq + fmt::Debug,
        R: Oracle<O, T, X>,
    {
        let mut step = match claim {
            Claim::Zero => Step::discharged(),

            Claim::One(asset) => Step {
                remaining: None,
                pending: vec![Pending {
                    time: self.acquisition_time(scope),
                    asset: asset.clone(),
                    amount: X::one(),
                    given: false,
                }],
                elected: false,
            },

            Claim::Give(inner) => {
                let mut step = self.reduce(inner, scope)?;
                step.pending = step.pending.into_iter().map(Pending::flip).collect();
                step.map_remaining(Claim::give)
            }

            Claim::And(children) => {
                let mut remaining = Vec::with_capacity(children.len());
                let mut pending = Vec::new();
                let mut elected = false;
                for child in children {
                    let step = self.reduce(child, scope)?;
                    elected |= step.elected;
                    pending.extend(step.pending);
                    remaining.extend(step.remaining);
                }
                Step {
                    remaining: if remaining.is_empty() {
                        None
                    } else {
                        Some(Claim::and_all(remaining))
                    },
                    pending,
                    elected,
                }
            }

            Claim::Or(alternatives) => {
                let chosen = scope.election.and_then(|election| {
                    alternatives.iter().find(|alt| alt.tag == election.tag)
                });
                match chosen {
                    Some(alternative) => {
                        let mut step = self.reduce(&alternative.claim, &self.elected_scope())?;
                        step.elected = true;
                        step
                    }
                    None => Step::unchanged(claim),
                }
            }

            Claim::Cond(predicate, then, otherwise) => {
                let branch = if self.holds(predicate)? { then } else { otherwise };
                let step = self.reduce(branch, scope)?;
                let progressed = step.elected
                    || !step.pending.is_empty()
                    || step.remaining.as_ref() != Some(&**branch);
                if progressed {
                    step
                } else {
                    Step::unchanged(claim)
                }
            }

            Claim::Scale(factor, inner) => {
                let mut step = self.reduce(inner, scope)?;
                for p in &mut step.pending {
                    let k = factor.eval(self.oracle, &p.time)?;
                    p.amount = p
                        .amount
                        .checked_mul(&k)
                        .ok_or_else(|| ObservationError::arithmetic("*", &p.amount, &k))?;
                }
                step.map_remaining(|c| Claim::scale(factor.clone(), c))
            }

            Claim::When(predicate, inner) => {
                if !self.holds(predicate)? {
                    Step::unchanged(claim)
                } else {
                    let fired = Scope {
                        acquired: self.fired_at(predicate, scope),
                        election: scope.election,
                    };
                    self.reduce(inner, &fired)?
                }
            }

            Claim::Anytime(predicate, tag, inner) => {
                let tag_elected = scope.election.map_or(false, |e| e.tag == *tag);
                if tag_elected && self.holds(predicate)? {
                    let mut step = self.reduce(inner, &self.elected_scope())?;
                    step.elected = true;
                    step
                } else {
                    Step::unchanged(claim)
                }
            }

            Claim::Until(predicate, inner) => {
                if self.holds(predicate)? {
                    Step::discharged()
                } else {
                    self.reduce(inner, scope)?
                        .map_remaining(|c| Claim::until(predicate.clone(), c))
                }
            }
        };

        if step.remaining.as_ref().map_or(false, Claim::is_zero) {
            step.remaining = None;
        }
        Ok(step)
    }

    fn holds<X, O>(&self, predicate: &Inequality<T, X, O>) -> LifecycleResult<bool>
    where
        X: Number,
        O: fmt::Debug,
        R: Oracle<O, T, X>,
    {
        Ok(predicate.compare(self.oracle, self.now)?)
    }

    fn acquisition_time(&self, scope: &Scope<'_, T>) -> T {
        scope.acquired.clone().unwrap_or_else(|| self.now.clone())
    }

    /// Acquisition time of a `When` body once its predicate has fired.
    ///
    /// A time threshold is crossed at the threshold itself, never before
    /// the enclosing acquisition. Observation predicates are only known to
    /// hold now.
    fn fired_at<X, O>(&self, predicate: &Inequality<T, X, O>, scope: &Scope<'_, T>) -> Option<T> {
        match predicate {
            Inequality::TimeGte(threshold) => Some(match &scope.acquired {
                Some(acquired) if acquired > threshold => acquired.clone(),
                _ => threshold.clone(),
            }),
            Inequality::TimeLte(_) => scope.acquired.clone(),
            Inequality::Lte(..) => Some(self.now.clone()),
        }
    }

    /// Scope of an alternative chosen at this event: acquired now, with the
    /// election consumed.
    fn elected_scope(&self) -> Scope<'static, T> {
        Scope {
            acquired: Some(self.now.clone()),
            election: None,
        }
    }
}
