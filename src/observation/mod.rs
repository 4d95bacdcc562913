//! Observation and predicate evaluation
//!
//! Observations are arithmetic expressions over named, time-varying values;
//! inequalities are boolean predicates built from observations or absolute
//! times. Both are evaluated against an oracle passed in by the caller.
//!
//! # Rules
//!
//! - No defaults and no interpolation: a missing value is an error
//! - Arithmetic is checked; overflow and division by zero are errors
//! - Evaluation is pure and deterministic

mod errors;
mod expr;
mod inequality;
mod number;
mod oracle;

pub use errors::{ObservationError, ObservationErrorCode, ObservationResult, Severity};
pub use expr::Observation;
pub use inequality::Inequality;
pub use number::Number;
pub use oracle::{Fixing, FixingTable, Oracle};
