//! Observation error types
//!
//! Error codes:
//! - CTG_MISSING_OBSERVATION (ERROR)
//! - CTG_ARITHMETIC (ERROR)

use std::fmt;

/// Severity levels shared by every subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The call failed; a retry with corrected input may succeed
    Error,
    /// Structural violation; the input itself must change
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Observation-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationErrorCode {
    /// Oracle has no value for a required (id, time)
    CtgMissingObservation,
    /// Overflow or division by zero while evaluating
    CtgArithmetic,
}

impl ObservationErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ObservationErrorCode::CtgMissingObservation => "CTG_MISSING_OBSERVATION",
            ObservationErrorCode::CtgArithmetic => "CTG_ARITHMETIC",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for ObservationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Observation error with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationError {
    code: ObservationErrorCode,
    message: String,
}

impl ObservationError {
    /// Create a missing observation error
    pub fn missing_observation(id: impl fmt::Debug, time: impl fmt::Debug) -> Self {
        Self {
            code: ObservationErrorCode::CtgMissingObservation,
            message: format!("No observation for {:?} at {:?}", id, time),
        }
    }

    /// Create an arithmetic error
    pub fn arithmetic(op: &str, lhs: impl fmt::Display, rhs: impl fmt::Display) -> Self {
        Self {
            code: ObservationErrorCode::CtgArithmetic,
            message: format!("Arithmetic failure evaluating {} {} {}", lhs, op, rhs),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ObservationErrorCode {
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

    /// A missing observation may succeed against a more complete oracle
    pub fn is_retryable(&self) -> bool {
        self.code == ObservationErrorCode::CtgMissingObservation
    }
}

impl fmt::Display for ObservationError {
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

impl std::error::Error for ObservationError {}

/// Result type for observation operations
pub type ObservationResult<T> = Result<T, ObservationError>;
