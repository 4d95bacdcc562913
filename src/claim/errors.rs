//! Claim construction error types
//!
//! Error codes:
//! - CTG_CONSTRUCTION_INVALID (FATAL)

use std::fmt;

use crate::observation::Severity;

/// Claim-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimErrorCode {
    /// Malformed tree at build time
    CtgConstructionInvalid,
}

impl ClaimErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ClaimErrorCode::CtgConstructionInvalid => "CTG_CONSTRUCTION_INVALID",
        }
    }

    /// Construction errors are never retried
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for ClaimErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Claim error with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimError {
    code: ClaimErrorCode,
    message: String,
}

impl ClaimError {
    /// An `Or` needs at least two real alternatives
    pub fn too_few_choices(found: usize) -> Self {
        Self {
            code: ClaimErrorCode::CtgConstructionInvalid,
            message: format!("at least 2 choices required, found {}", found),
        }
    }

    /// Generic construction failure
    pub fn construction_invalid(reason: impl Into<String>) -> Self {
        Self {
            code: ClaimErrorCode::CtgConstructionInvalid,
            message: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ClaimErrorCode {
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

impl fmt::Display for ClaimError {
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

impl std::error::Error for ClaimError {}

/// Result type for claim construction
pub type ClaimResult<T> = Result<T, ClaimError>;
