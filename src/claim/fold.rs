//! Recursion scheme over claims
//!
//! `ClaimF` is one layer of a claim with its children abstracted into `R`.
//! Every whole-tree traversal (re-parameterization, normalization,
//! rendering, collection) is a `fold` with an algebra over one layer, so a
//! new combinator only has to be taught to `project`, `embed` and
//! `ClaimF::map_children`.

use std::fmt;

use crate::observation::{Inequality, Observation};

use super::errors::ClaimResult;
use super::types::{Claim, Electable, Tag};

/// One layer of a claim tree
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimF<T, X, A, O, R> {
    Zero,
    One(A),
    Give(R),
    And(Vec<R>),
    Or(Vec<(Tag, R)>),
    Cond(Inequality<T, X, O>, R, R),
    Scale(Observation<X, O>, R),
    When(Inequality<T, X, O>, R),
    Anytime(Inequality<T, X, O>, Tag, R),
    Until(Inequality<T, X, O>, R),
}

impl<T, X, A, O, R> ClaimF<T, X, A, O, R> {
    /// Applies `f` to every child, in tree order.
    pub fn map_children<S>(self, mut f: impl FnMut(R) -> S) -> ClaimF<T, X, A, O, S> {
        match self {
            ClaimF::Zero => ClaimF::Zero,
            ClaimF::One(a) => ClaimF::One(a),
            ClaimF::Give(c) => ClaimF::Give(f(c)),
            ClaimF::And(cs) => ClaimF::And(cs.into_iter().map(f).collect()),
            ClaimF::Or(alts) => ClaimF::Or(alts.into_iter().map(|(tag, c)| (tag, f(c))).collect()),
            ClaimF::Cond(p, t, e) => {
                let t = f(t);
                let e = f(e);
                ClaimF::Cond(p, t, e)
            }
            ClaimF::Scale(obs, c) => ClaimF::Scale(obs, f(c)),
            ClaimF::When(p, c) => ClaimF::When(p, f(c)),
            ClaimF::Anytime(p, tag, c) => ClaimF::Anytime(p, tag, f(c)),
            ClaimF::Until(p, c) => ClaimF::Until(p, f(c)),
        }
    }

    /// Like `map_children`, stopping at the first error.
    pub fn try_map_children<S, E>(
        self,
        mut f: impl FnMut(R) -> Result<S, E>,
    ) -> Result<ClaimF<T, X, A, O, S>, E> {
        Ok(match self {
            ClaimF::Zero => ClaimF::Zero,
            ClaimF::One(a) => ClaimF::One(a),
            ClaimF::Give(c) => ClaimF::Give(f(c)?),
            ClaimF::And(cs) => ClaimF::And(cs.into_iter().map(f).collect::<Result<_, _>>()?),
            ClaimF::Or(alts) => ClaimF::Or(
                alts.into_iter()
                    .map(|(tag, c)| f(c).map(|c| (tag, c)))
                    .collect::<Result<_, _>>()?,
            ),
            ClaimF::Cond(p, t, e) => {
                let t = f(t)?;
                let e = f(e)?;
                ClaimF::Cond(p, t, e)
            }
            ClaimF::Scale(obs, c) => ClaimF::Scale(obs, f(c)?),
            ClaimF::When(p, c) => ClaimF::When(p, f(c)?),
            ClaimF::Anytime(p, tag, c) => ClaimF::Anytime(p, tag, f(c)?),
            ClaimF::Until(p, c) => ClaimF::Until(p, f(c)?),
        })
    }

    /// Rewrites the leaf parameters of this layer only.
    pub fn map_params<T2, X2, A2, O2>(
        self,
        time: &impl Fn(T) -> T2,
        value: &impl Fn(X) -> X2,
        asset: &impl Fn(A) -> A2,
        observable: &impl Fn(O) -> O2,
    ) -> ClaimF<T2, X2, A2, O2, R> {
        let pred = |p: Inequality<T, X, O>| p.map_params(time, value, observable);
        match self {
            ClaimF::Zero => ClaimF::Zero,
            ClaimF::One(a) => ClaimF::One(asset(a)),
            ClaimF::Give(c) => ClaimF::Give(c),
            ClaimF::And(cs) => ClaimF::And(cs),
            ClaimF::Or(alts) => ClaimF::Or(alts),
            ClaimF::Cond(p, t, e) => ClaimF::Cond(pred(p), t, e),
            ClaimF::Scale(obs, c) => ClaimF::Scale(obs.map_params(value, observable), c),
            ClaimF::When(p, c) => ClaimF::When(pred(p), c),
            ClaimF::Anytime(p, tag, c) => ClaimF::Anytime(pred(p), tag, c),
            ClaimF::Until(p, c) => ClaimF::Until(pred(p), c),
        }
    }
}

impl<T, X, A, O> Claim<T, X, A, O> {
    /// Peels off the outermost layer.
    pub fn project(self) -> ClaimF<T, X, A, O, Claim<T, X, A, O>> {
        match self {
            Claim::Zero => ClaimF::Zero,
            Claim::One(a) => ClaimF::One(a),
            Claim::Give(c) => ClaimF::Give(*c),
            Claim::And(cs) => ClaimF::And(cs),
            Claim::Or(alts) => ClaimF::Or(alts.into_iter().map(|e| (e.tag, e.claim)).collect()),
            Claim::Cond(p, t, e) => ClaimF::Cond(p, *t, *e),
            Claim::Scale(obs, c) => ClaimF::Scale(obs, *c),
            Claim::When(p, c) => ClaimF::When(p, *c),
            Claim::Anytime(p, tag, c) => ClaimF::Anytime(p, tag, *c),
            Claim::Until(p, c) => ClaimF::Until(p, *c),
        }
    }

    /// Rebuilds a claim from one layer verbatim, without normalizing.
    pub fn embed(layer: ClaimF<T, X, A, O, Claim<T, X, A, O>>) -> Self {
        match layer {
            ClaimF::Zero => Claim::Zero,
            ClaimF::One(a) => Claim::One(a),
            ClaimF::Give(c) => Claim::Give(Box::new(c)),
            ClaimF::And(cs) => Claim::And(cs),
            ClaimF::Or(alts) => Claim::Or(
                alts.into_iter()
                    .map(|(tag, claim)| Electable { tag, claim })
                    .collect(),
            ),
            ClaimF::Cond(p, t, e) => Claim::Cond(p, Box::new(t), Box::new(e)),
            ClaimF::Scale(obs, c) => Claim::Scale(obs, Box::new(c)),
            ClaimF::When(p, c) => Claim::When(p, Box::new(c)),
            ClaimF::Anytime(p, tag, c) => Claim::Anytime(p, tag, Box::new(c)),
            ClaimF::Until(p, c) => Claim::Until(p, Box::new(c)),
        }
    }

    /// Bottom-up fold (catamorphism): children are folded before the
    /// algebra sees their parent's layer.
    pub fn fold<R, F>(self, algebra: &mut F) -> R
    where
        F: FnMut(ClaimF<T, X, A, O, R>) -> R,
    {
        let layer = self.project().map_children(|child| child.fold(&mut *algebra));
        algebra(layer)
    }

    /// Fallible fold; the first error aborts the traversal.
    pub fn try_fold<R, E, F>(self, algebra: &mut F) -> Result<R, E>
    where
        F: FnMut(ClaimF<T, X, A, O, R>) -> Result<R, E>,
    {
        let layer = self
            .project()
            .try_map_children(|child| child.try_fold(&mut *algebra))?;
        algebra(layer)
    }

    /// Structure-preserving re-parameterization.
    ///
    /// Returns an isomorphic tree with every time, value, asset and
    /// observable id rewritten; no node is added, removed or reordered.
    pub fn map_params<T2, X2, A2, O2>(
        self,
        time: impl Fn(T) -> T2,
        value: impl Fn(X) -> X2,
        asset: impl Fn(A) -> A2,
        observable: impl Fn(O) -> O2,
    ) -> Claim<T2, X2, A2, O2> {
        self.fold(&mut |layer: ClaimF<T, X, A, O, Claim<T2, X2, A2, O2>>| {
            Claim::embed(layer.map_params(&time, &value, &asset, &observable))
        })
    }

    /// Rebuilds the tree through the smart constructors.
    ///
    /// Flattens nested `And`/`Or`, drops `Zero` conjuncts and rejects an
    /// `Or` with fewer than two alternatives.
    pub fn normalize(self) -> ClaimResult<Self> {
        self.try_fold(&mut |layer: ClaimF<T, X, A, O, Self>| match layer {
            ClaimF::And(cs) => Ok(Claim::and_all(cs)),
            ClaimF::Or(alts) => Claim::or_all(
                alts.into_iter()
                    .map(|(tag, claim)| Electable { tag, claim }),
            ),
            other => Ok(Claim::embed(other)),
        })
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize
    where
        Self: Clone,
    {
        self.clone().fold(&mut |layer: ClaimF<T, X, A, O, usize>| match layer {
            ClaimF::Zero | ClaimF::One(_) => 1,
            ClaimF::Give(n)
            | ClaimF::Scale(_, n)
            | ClaimF::When(_, n)
            | ClaimF::Anytime(_, _, n)
            | ClaimF::Until(_, n) => 1 + n,
            ClaimF::Cond(_, t, e) => 1 + t + e,
            ClaimF::And(ns) => 1 + ns.iter().sum::<usize>(),
            ClaimF::Or(alts) => 1 + alts.iter().map(|(_, n)| n).sum::<usize>(),
        })
    }

    /// Assets referenced by `One` leaves, in tree order
    pub fn assets(&self) -> Vec<A>
    where
        Self: Clone,
    {
        self.clone().fold(&mut |layer: ClaimF<T, X, A, O, Vec<A>>| match layer {
            ClaimF::Zero => Vec::new(),
            ClaimF::One(a) => vec![a],
            ClaimF::Give(v)
            | ClaimF::Scale(_, v)
            | ClaimF::When(_, v)
            | ClaimF::Anytime(_, _, v)
            | ClaimF::Until(_, v) => v,
            ClaimF::Cond(_, mut t, e) => {
                t.extend(e);
                t
            }
            ClaimF::And(vs) => vs.into_iter().flatten().collect(),
            ClaimF::Or(alts) => alts.into_iter().flat_map(|(_, v)| v).collect(),
        })
    }

    /// Election tags offered anywhere in the tree, in tree order
    pub fn election_tags(&self) -> Vec<Tag>
    where
        Self: Clone,
    {
        self.clone().fold(&mut |layer: ClaimF<T, X, A, O, Vec<Tag>>| match layer {
            ClaimF::Zero | ClaimF::One(_) => Vec::new(),
            ClaimF::Give(v) | ClaimF::Scale(_, v) | ClaimF::When(_, v) | ClaimF::Until(_, v) => v,
            ClaimF::Anytime(_, tag, v) => {
                let mut tags = vec![tag];
                tags.extend(v);
                tags
            }
            ClaimF::Cond(_, mut t, e) => {
                t.extend(e);
                t
            }
            ClaimF::And(vs) => vs.into_iter().flatten().collect(),
            ClaimF::Or(alts) => {
                let mut tags = Vec::new();
                for (tag, v) in alts {
                    tags.push(tag);
                    tags.extend(v);
                }
                tags
            }
        })
    }
}

impl<T, X, A, O> fmt::Display for Claim<T, X, A, O>
where
    Self: Clone,
    T: fmt::Display,
    X: fmt::Display,
    A: fmt::Display,
    O: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.clone().fold(&mut |layer: ClaimF<T, X, A, O, String>| match layer {
            ClaimF::Zero => "zero".to_string(),
            ClaimF::One(a) => format!("one({})", a),
            ClaimF::Give(c) => format!("give({})", c),
            ClaimF::And(cs) => format!("and[{}]", cs.join(", ")),
            ClaimF::Or(alts) => {
                let alts: Vec<String> = alts
                    .into_iter()
                    .map(|(tag, c)| format!("{:?}: {}", tag, c))
                    .collect();
                format!("or[{}]", alts.join(", "))
            }
            ClaimF::Cond(p, t, e) => format!("cond({}, {}, {})", p, t, e),
            ClaimF::Scale(obs, c) => format!("scale({}, {})", obs, c),
            ClaimF::When(p, c) => format!("when({}, {})", p, c),
            ClaimF::Anytime(p, tag, c) => format!("anytime({}, {:?}, {})", p, tag, c),
            ClaimF::Until(p, c) => format!("until({}, {})", p, c),
        });
        f.write_str(&rendered)
    }
}
