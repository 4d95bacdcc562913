//! Normalizing smart constructors
//!
//! `and` and `or` are O(n) in the number of immediate children: they splice
//! the children of an operand of the same kind instead of nesting it, and
//! never recurse further. Insertion order is preserved; it decides which
//! alternative wins when tags collide and keeps rendered trees readable.

use crate::observation::{Inequality, Observation};

use super::errors::{ClaimError, ClaimResult};
use super::types::{Claim, Electable, Tag};

impl<T, X, A, O> Claim<T, X, A, O> {
    pub fn zero() -> Self {
        Claim::Zero
    }

    pub fn one(asset: A) -> Self {
        Claim::One(asset)
    }

    pub fn give(claim: Self) -> Self {
        Claim::Give(Box::new(claim))
    }

    /// Conjunction of two claims. `Zero` is the identity.
    pub fn and(lhs: Self, rhs: Self) -> Self {
        let mut children = Vec::with_capacity(lhs.width() + rhs.width());
        push_conjunct(&mut children, lhs);
        push_conjunct(&mut children, rhs);
        from_conjuncts(children)
    }

    /// Bulk conjunction built as one flat list.
    ///
    /// Equivalent to folding `and` pairwise, without the quadratic cost.
    pub fn and_all(claims: impl IntoIterator<Item = Self>) -> Self {
        let mut children = Vec::new();
        for claim in claims {
            push_conjunct(&mut children, claim);
        }
        from_conjuncts(children)
    }

    /// Choice between two alternatives. There is no identity element.
    pub fn or(lhs: Electable<T, X, A, O>, rhs: Electable<T, X, A, O>) -> Self {
        let mut choices = Vec::with_capacity(2);
        push_choice(&mut choices, lhs);
        push_choice(&mut choices, rhs);
        Claim::Or(choices)
    }

    /// Choice between many alternatives.
    ///
    /// Fails with a construction error when given fewer than two.
    pub fn or_all(alternatives: impl IntoIterator<Item = Electable<T, X, A, O>>) -> ClaimResult<Self> {
        let mut choices = Vec::new();
        let mut given = 0;
        for alternative in alternatives {
            given += 1;
            push_choice(&mut choices, alternative);
        }
        if given < 2 {
            return Err(ClaimError::too_few_choices(given));
        }
        Ok(Claim::Or(choices))
    }

    pub fn cond(predicate: Inequality<T, X, O>, then: Self, otherwise: Self) -> Self {
        Claim::Cond(predicate, Box::new(then), Box::new(otherwise))
    }

    pub fn scale(factor: Observation<X, O>, claim: Self) -> Self {
        Claim::Scale(factor, Box::new(claim))
    }

    pub fn when(predicate: Inequality<T, X, O>, claim: Self) -> Self {
        Claim::When(predicate, Box::new(claim))
    }

    pub fn anytime(predicate: Inequality<T, X, O>, tag: impl Into<Tag>, claim: Self) -> Self {
        Claim::Anytime(predicate, tag.into(), Box::new(claim))
    }

    pub fn until(predicate: Inequality<T, X, O>, claim: Self) -> Self {
        Claim::Until(predicate, Box::new(claim))
    }

    /// Number of conjuncts this claim contributes to an `And`
    fn width(&self) -> usize {
        match self {
            Claim::Zero => 0,
            Claim::And(children) => children.len(),
            _ => 1,
        }
    }
}

impl<T, X, A, O> FromIterator<Claim<T, X, A, O>> for Claim<T, X, A, O> {
    fn from_iter<I: IntoIterator<Item = Claim<T, X, A, O>>>(iter: I) -> Self {
        Claim::and_all(iter)
    }
}

/// Appends one operand's conjuncts: nothing for `Zero`, the children of an
/// `And`, otherwise the claim itself.
fn push_conjunct<T, X, A, O>(out: &mut Vec<Claim<T, X, A, O>>, claim: Claim<T, X, A, O>) {
    match claim {
        Claim::Zero => {}
        Claim::And(children) => out.extend(children.into_iter().filter(|c| !c.is_zero())),
        other => out.push(other),
    }
}

fn from_conjuncts<T, X, A, O>(mut children: Vec<Claim<T, X, A, O>>) -> Claim<T, X, A, O> {
    if children.len() > 1 {
        Claim::And(children)
    } else {
        children.pop().unwrap_or(Claim::Zero)
    }
}

/// Appends one alternative, splicing in the choices of a nested `Or`.
fn push_choice<T, X, A, O>(out: &mut Vec<Electable<T, X, A, O>>, choice: Electable<T, X, A, O>) {
    match choice.claim {
        Claim::Or(nested) => out.extend(nested),
        claim => out.push(Electable {
            tag: choice.tag,
            claim,
        }),
    }
}
