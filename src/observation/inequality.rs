//! Boolean time-predicates
//!
//! Resolved at a query time through an oracle. For well-formed instruments
//! every predicate is monotonic in time: once true it stays true.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::ObservationResult;
use super::expr::Observation;
use super::number::Number;
use super::oracle::Oracle;

/// A boolean predicate over time and/or observations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inequality<T, X, O> {
    /// `lhs <= rhs`, both evaluated at the query time
    Lte(Observation<X, O>, Observation<X, O>),
    /// Query time is at or after the given time
    TimeGte(T),
    /// Query time is at or before the given time
    TimeLte(T),
}

impl<T, X, O> Inequality<T, X, O> {
    /// True from `time` onwards
    pub fn at_or_after(time: T) -> Self {
        Inequality::TimeGte(time)
    }

    /// True up to and including `time`
    pub fn at_or_before(time: T) -> Self {
        Inequality::TimeLte(time)
    }

    /// `lhs <= rhs`
    pub fn lte(lhs: Observation<X, O>, rhs: Observation<X, O>) -> Self {
        Inequality::Lte(lhs, rhs)
    }

    /// Rewrites times, values and observable ids; shape is unchanged.
    pub fn map_params<T2, X2, O2>(
        self,
        time: &impl Fn(T) -> T2,
        value: &impl Fn(X) -> X2,
        observable: &impl Fn(O) -> O2,
    ) -> Inequality<T2, X2, O2> {
        match self {
            Inequality::Lte(a, b) => Inequality::Lte(
                a.map_params(value, observable),
                b.map_params(value, observable),
            ),
            Inequality::TimeGte(t) => Inequality::TimeGte(time(t)),
            Inequality::TimeLte(t) => Inequality::TimeLte(time(t)),
        }
    }
}

impl<T, X, O> Inequality<T, X, O>
where
    T: Ord + fmt::Debug,
    X: Number,
    O: fmt::Debug,
{
    /// Resolves the predicate at `time`.
    pub fn compare<R>(&self, oracle: &R, time: &T) -> ObservationResult<bool>
    where
        R: Oracle<O, T, X> + ?Sized,
    {
        match self {
            Inequality::Lte(lhs, rhs) => {
                let lhs = lhs.eval(oracle, time)?;
                let rhs = rhs.eval(oracle, time)?;
                Ok(lhs <= rhs)
            }
            Inequality::TimeGte(s) => Ok(time >= s),
            Inequality::TimeLte(s) => Ok(s >= time),
        }
    }
}

impl<T: fmt::Display, X: fmt::Display, O: fmt::Display> fmt::Display for Inequality<T, X, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inequality::Lte(a, b) => write!(f, "{} <= {}", a, b),
            Inequality::TimeGte(t) => write!(f, "time >= {}", t),
            Inequality::TimeLte(t) => write!(f, "time <= {}", t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::errors::ObservationErrorCode;
    use crate::observation::oracle::FixingTable;

    type Ineq = Inequality<u32, f64, String>;

    fn no_fixings() -> FixingTable<String, u32, f64> {
        FixingTable::new()
    }

    #[test]
    fn test_time_gte_matches_ordering() {
        let oracle = no_fixings();
        for s in 0..5u32 {
            for t in 0..5u32 {
                assert_eq!(Ineq::at_or_after(s).compare(&oracle, &t).unwrap(), t >= s);
                assert_eq!(Ineq::at_or_before(s).compare(&oracle, &t).unwrap(), s >= t);
            }
        }
    }

    #[test]
    fn test_lte_evaluates_both_sides() {
        let oracle = FixingTable::new().with("SPOT".to_string(), 3u32, 48.78);
        let itm_put = Ineq::lte(Observation::observe("SPOT".into()), Observation::constant(50.0));
        assert!(itm_put.compare(&oracle, &3).unwrap());

        let itm_call = Ineq::lte(Observation::constant(50.0), Observation::observe("SPOT".into()));
        assert!(!itm_call.compare(&oracle, &3).unwrap());
    }

    #[test]
    fn test_lte_missing_observation() {
        let pred = Ineq::lte(Observation::observe("SPOT".into()), Observation::constant(1.0));
        let err = pred.compare(&no_fixings(), &1).unwrap_err();
        assert_eq!(err.code(), ObservationErrorCode::CtgMissingObservation);
    }

    #[test]
    fn test_time_predicates_never_touch_oracle() {
        // An oracle that has nothing still resolves pure time predicates
        assert!(Ineq::at_or_after(1).compare(&no_fixings(), &1).unwrap());
    }

    #[test]
    fn test_map_params_shifts_times() {
        let shifted = Ineq::at_or_after(10).map_params(&|t| t + 5, &|x| x, &|o| o);
        assert_eq!(shifted, Ineq::at_or_after(15));
    }
}
