//! Numeric field used for quantities and observations
//!
//! Arithmetic is checked: overflow and division by zero return `None`
//! instead of panicking, so evaluation can fail loudly with an error.

use std::fmt;

use rust_decimal::Decimal;

/// A numeric type the engine can scale quantities with.
pub trait Number: Clone + PartialEq + PartialOrd + fmt::Debug + fmt::Display {
    /// Multiplicative identity, the notional of a `One` leaf
    fn one() -> Self;

    /// Additive identity
    fn zero() -> Self;

    fn checked_add(&self, rhs: &Self) -> Option<Self>;

    fn checked_sub(&self, rhs: &Self) -> Option<Self>;

    fn checked_mul(&self, rhs: &Self) -> Option<Self>;

    fn checked_div(&self, rhs: &Self) -> Option<Self>;
}

impl Number for Decimal {
    fn one() -> Self {
        Decimal::ONE
    }

    fn zero() -> Self {
        Decimal::ZERO
    }

    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Decimal::checked_add(*self, *rhs)
    }

    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        Decimal::checked_sub(*self, *rhs)
    }

    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        Decimal::checked_mul(*self, *rhs)
    }

    fn checked_div(&self, rhs: &Self) -> Option<Self> {
        Decimal::checked_div(*self, *rhs)
    }
}

/// Finite-only float arithmetic.
fn finite(v: f64) -> Option<f64> {
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

impl Number for f64 {
    fn one() -> Self {
        1.0
    }

    fn zero() -> Self {
        0.0
    }

    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        finite(self + rhs)
    }

    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        finite(self - rhs)
    }

    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        finite(self * rhs)
    }

    fn checked_div(&self, rhs: &Self) -> Option<Self> {
        if *rhs == 0.0 {
            return None;
        }
        finite(self / rhs)
    }
}
