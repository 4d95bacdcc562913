//! Claim algebra
//!
//! The recursive contract tree, its normalizing smart constructors and a
//! generic fold that every whole-tree traversal is written in terms of.
//!
//! # Rules
//!
//! - Claims are immutable; transformations return new trees
//! - `And` and `Or` hold at least two children after normalization
//! - `Zero` is the identity of `and`; `or` has no identity
//! - Content equality is structural equality

mod constructors;
mod errors;
mod fold;
mod source;
mod types;

pub use errors::{ClaimError, ClaimErrorCode, ClaimResult};
pub use fold::ClaimF;
pub use source::{ClaimSource, TaggedClaim};
pub use types::{Claim, Electable, Tag};
