//! Lifecycle engine
//!
//! Advances a claim tree through time and elections, separating what has
//! been realized (pending quantities) from what remains.
//!
//! # Rules
//!
//! - Pure: same tree, oracle and events give the same reduction
//! - No hidden state between calls; replay from inception reproduces
//!   any later tree exactly
//! - Events are applied in non-decreasing time order
//! - Any failure aborts the whole call; no partial tree is returned
//! - A `When` that has fired never reverts

mod elections;
mod engine;
mod errors;
mod event;
mod pending;

pub use elections::ElectionEngine;
pub use engine::{lifecycle, Reduction};
pub use errors::{LifecycleError, LifecycleErrorCode, LifecycleResult};
pub use event::{Election, LifecycleEvent};
pub use pending::{split_pending, Pending, Quantity, SplitPending};
