//! Lifecycle error types
//!
//! Error codes:
//! - CTG_MISSING_OBSERVATION (ERROR)
//! - CTG_ARITHMETIC (ERROR)
//! - CTG_UNMATCHED_ELECTION_TAG (FATAL)
//! - CTG_MULTIPLE_ELECTIONS (FATAL)
//! - CTG_EVENTS_UNORDERED (FATAL)
//!
//! Every error aborts the whole reduction; no partial tree is returned.

use std::fmt;

use crate::observation::{ObservationError, ObservationErrorCode, Severity};

/// Lifecycle-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleErrorCode {
    /// Oracle has no value for a required (id, time)
    CtgMissingObservation,
    /// Overflow or division by zero while scaling or comparing
    CtgArithmetic,
    /// Election tag matched no live choice
    CtgUnmatchedElectionTag,
    /// More elections than the engine accepts per call
    CtgMultipleElections,
    /// Events not in non-decreasing time order
    CtgEventsUnordered,
}

impl LifecycleErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LifecycleErrorCode::CtgMissingObservation => "CTG_MISSING_OBSERVATION",
            LifecycleErrorCode::CtgArithmetic => "CTG_ARITHMETIC",
            LifecycleErrorCode::CtgUnmatchedElectionTag => "CTG_UNMATCHED_ELECTION_TAG",
            LifecycleErrorCode::CtgMultipleElections => "CTG_MULTIPLE_ELECTIONS",
            LifecycleErrorCode::CtgEventsUnordered => "CTG_EVENTS_UNORDERED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            LifecycleErrorCode::CtgMissingObservation | LifecycleErrorCode::CtgArithmetic => {
                Severity::Error
            }
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for LifecycleErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Lifecycle error with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleError {
    code: LifecycleErrorCode,
    message: String,
}

impl LifecycleError {
    /// Create an unmatched election tag error
    pub fn unmatched_election(tag: &str, time: impl fmt::Debug) -> Self {
        Self {
            code: LifecycleErrorCode::CtgUnmatchedElectionTag,
            message: format!(
                "claim structure invariant violated: election '{}' at {:?} matches no live choice",
                tag, time
            ),
        }
    }

    /// Create a multiple elections error
    pub fn multiple_elections(found: usize, allowed: usize) -> Self {
        Self {
            code: LifecycleErrorCode::CtgMultipleElections,
            message: format!(
                "{} elections supplied, at most {} supported per call",
                found, allowed
            ),
        }
    }

    /// Create an unordered events error
    pub fn events_unordered(index: usize) -> Self {
        Self {
            code: LifecycleErrorCode::CtgEventsUnordered,
            message: format!("event {} is earlier than the event before it", index),
        }
    }

    /// Create an error for an event earlier than one already applied
    pub fn precedes_last_event(time: impl fmt::Debug, last: impl fmt::Debug) -> Self {
        Self {
            code: LifecycleErrorCode::CtgEventsUnordered,
            message: format!("event at {:?} precedes last applied event at {:?}", time, last),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> LifecycleErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<ObservationError> for LifecycleError {
    fn from(err: ObservationError) -> Self {
        let code = match err.code() {
            ObservationErrorCode::CtgMissingObservation => LifecycleErrorCode::CtgMissingObservation,
            ObservationErrorCode::CtgArithmetic => LifecycleErrorCode::CtgArithmetic,
        };
        Self {
            code,
            message: err.message().to_string(),
        }
    }
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for LifecycleError {}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
