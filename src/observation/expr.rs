//! Observation expressions
//!
//! A small arithmetic tree over time-varying named values. An observation
//! carries no time of its own: it is evaluated at a query time supplied by
//! the caller, against an explicitly supplied oracle.

use std::fmt;
use std::ops;

use serde::{Deserialize, Serialize};

use super::errors::{ObservationError, ObservationResult};
use super::number::Number;
use super::oracle::Oracle;

/// Arithmetic expression over observables
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation<X, O> {
    /// A constant value
    Const(X),
    /// The oracle's value for an observable at the query time
    Observe(O),
    Add(Box<Observation<X, O>>, Box<Observation<X, O>>),
    Sub(Box<Observation<X, O>>, Box<Observation<X, O>>),
    Mul(Box<Observation<X, O>>, Box<Observation<X, O>>),
    Div(Box<Observation<X, O>>, Box<Observation<X, O>>),
}

impl<X, O> Observation<X, O> {
    /// Create a constant observation
    pub fn constant(value: X) -> Self {
        Observation::Const(value)
    }

    /// Create an observation of a named observable
    pub fn observe(id: O) -> Self {
        Observation::Observe(id)
    }

    /// Rewrites every leaf parameter, keeping the expression shape.
    pub fn map_params<X2, O2>(
        self,
        value: &impl Fn(X) -> X2,
        observable: &impl Fn(O) -> O2,
    ) -> Observation<X2, O2> {
        let both = |a: Box<Self>, b: Box<Self>| {
            (
                Box::new(a.map_params(value, observable)),
                Box::new(b.map_params(value, observable)),
            )
        };
        match self {
            Observation::Const(x) => Observation::Const(value(x)),
            Observation::Observe(o) => Observation::Observe(observable(o)),
            Observation::Add(a, b) => {
                let (a, b) = both(a, b);
                Observation::Add(a, b)
            }
            Observation::Sub(a, b) => {
                let (a, b) = both(a, b);
                Observation::Sub(a, b)
            }
            Observation::Mul(a, b) => {
                let (a, b) = both(a, b);
                Observation::Mul(a, b)
            }
            Observation::Div(a, b) => {
                let (a, b) = both(a, b);
                Observation::Div(a, b)
            }
        }
    }

    /// Observable ids referenced by this expression, in left-to-right order
    pub fn observables(&self) -> Vec<&O> {
        let mut out = Vec::new();
        self.collect_observables(&mut out);
        out
    }

    fn collect_observables<'a>(&'a self, out: &mut Vec<&'a O>) {
        match self {
            Observation::Const(_) => {}
            Observation::Observe(o) => out.push(o),
            Observation::Add(a, b)
            | Observation::Sub(a, b)
            | Observation::Mul(a, b)
            | Observation::Div(a, b) => {
                a.collect_observables(out);
                b.collect_observables(out);
            }
        }
    }
}

impl<X: Number, O: fmt::Debug> Observation<X, O> {
    /// Evaluates the expression at `time`.
    ///
    /// `Const` returns immediately; `Observe` asks the oracle and fails
    /// with a missing-observation error if it has no value.
    pub fn eval<T, R>(&self, oracle: &R, time: &T) -> ObservationResult<X>
    where
        T: fmt::Debug,
        R: Oracle<O, T, X> + ?Sized,
    {
        match self {
            Observation::Const(x) => Ok(x.clone()),
            Observation::Observe(id) => oracle
                .observe(id, time)
                .ok_or_else(|| ObservationError::missing_observation(id, time)),
            Observation::Add(a, b) => {
                let (a, b) = (a.eval(oracle, time)?, b.eval(oracle, time)?);
                a.checked_add(&b)
                    .ok_or_else(|| ObservationError::arithmetic("+", &a, &b))
            }
            Observation::Sub(a, b) => {
                let (a, b) = (a.eval(oracle, time)?, b.eval(oracle, time)?);
                a.checked_sub(&b)
                    .ok_or_else(|| ObservationError::arithmetic("-", &a, &b))
            }
            Observation::Mul(a, b) => {
                let (a, b) = (a.eval(oracle, time)?, b.eval(oracle, time)?);
                a.checked_mul(&b)
                    .ok_or_else(|| ObservationError::arithmetic("*", &a, &b))
            }
            Observation::Div(a, b) => {
                let (a, b) = (a.eval(oracle, time)?, b.eval(oracle, time)?);
                a.checked_div(&b)
                    .ok_or_else(|| ObservationError::arithmetic("/", &a, &b))
            }
        }
    }
}

impl<X: fmt::Display, O: fmt::Display> fmt::Display for Observation<X, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::Const(x) => write!(f, "{}", x),
            Observation::Observe(o) => write!(f, "obs({})", o),
            Observation::Add(a, b) => write!(f, "({} + {})", a, b),
            Observation::Sub(a, b) => write!(f, "({} - {})", a, b),
            Observation::Mul(a, b) => write!(f, "({} * {})", a, b),
            Observation::Div(a, b) => write!(f, "({} / {})", a, b),
        }
    }
}

macro_rules! observation_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl<X, O> ops::$trait for Observation<X, O> {
            type Output = Observation<X, O>;

            fn $method(self, rhs: Self) -> Self::Output {
                Observation::$variant(Box::new(self), Box::new(rhs))
            }
        }
    };
}

observation_op!(Add, add, Add);
observation_op!(Sub, sub, Sub);
observation_op!(Mul, mul, Mul);
observation_op!(Div, div, Div);
