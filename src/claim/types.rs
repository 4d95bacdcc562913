//! The claim tree
//!
//! A claim is an immutable recursive value. Every transformation
//! (normalization, re-parameterization, lifecycle reduction) produces a new
//! tree; nothing here mutates in place.
//!
//! Type parameters:
//! - `T`: time
//! - `X`: numeric field
//! - `A`: asset / party tag
//! - `O`: observable identifier

use serde::{Deserialize, Serialize};

use crate::observation::{Inequality, Observation};

/// Election tag naming one alternative of a choice
pub type Tag = String;

/// A contingent claim
///
/// The smart constructors in this module keep `And` and `Or` normalized:
/// both always hold at least two children and never directly nest a node
/// of the same kind. The variants stay public so trees can be pattern
/// matched and deserialized; use `Claim::normalize` on trees assembled by
/// hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Claim<T, X, A, O> {
    /// No obligation
    Zero,
    /// Unconditional obligation of one unit of the asset
    One(A),
    /// Flips holder and counterparty
    Give(Box<Claim<T, X, A, O>>),
    /// All children apply simultaneously
    And(Vec<Claim<T, X, A, O>>),
    /// Exactly one tagged alternative must be elected
    Or(Vec<Electable<T, X, A, O>>),
    /// Branch on the predicate's current truth value
    Cond(
        Inequality<T, X, O>,
        Box<Claim<T, X, A, O>>,
        Box<Claim<T, X, A, O>>,
    ),
    /// Multiplies the notional by a time-varying value
    Scale(Observation<X, O>, Box<Claim<T, X, A, O>>),
    /// Becomes active the first time the predicate holds
    When(Inequality<T, X, O>, Box<Claim<T, X, A, O>>),
    /// Standing option, electable under the tag while the predicate holds
    Anytime(Inequality<T, X, O>, Tag, Box<Claim<T, X, A, O>>),
    /// Knocked out once the predicate holds
    Until(Inequality<T, X, O>, Box<Claim<T, X, A, O>>),
}

/// One tagged alternative of an `Or`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Electable<T, X, A, O> {
    pub tag: Tag,
    pub claim: Claim<T, X, A, O>,
}

impl<T, X, A, O> Electable<T, X, A, O> {
    pub fn new(tag: impl Into<Tag>, claim: Claim<T, X, A, O>) -> Self {
        Self {
            tag: tag.into(),
            claim,
        }
    }
}

impl<T, X, A, O> Claim<T, X, A, O> {
    /// Returns true for `Zero`
    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Claim::Zero)
    }

    /// Name of the outermost combinator
    pub fn kind(&self) -> &'static str {
        match self {
            Claim::Zero => "zero",
            Claim::One(_) => "one",
            Claim::Give(_) => "give",
            Claim::And(_) => "and",
            Claim::Or(_) => "or",
            Claim::Cond(..) => "cond",
            Claim::Scale(..) => "scale",
            Claim::When(..) => "when",
            Claim::Anytime(..) => "anytime",
            Claim::Until(..) => "until",
        }
    }
}

impl<T, X, A, O> Default for Claim<T, X, A, O> {
    fn default() -> Self {
        Claim::Zero
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type C = Claim<u32, f64, String, String>;

    #[test]
    fn test_default_is_zero() {
        assert!(C::default().is_zero());
    }

    #[test]
    fn test_structural_equality() {
        let a = C::Give(Box::new(C::One("USD".into())));
        let b = C::Give(Box::new(C::One("USD".into())));
        assert_eq!(a, b);
        assert_ne!(a, C::One("USD".into()));
    }

    #[test]
    fn test_json_shape() {
        let c = C::When(
            Inequality::TimeGte(5),
            Box::new(C::One("USD".into())),
        );
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["when"][0]["time_gte"], 5);
        assert_eq!(json["when"][1]["one"], "USD");

        let back: C = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(C::Zero.kind(), "zero");
        assert_eq!(C::And(vec![]).kind(), "and");
    }
}
