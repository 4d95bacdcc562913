//! Effect assembly error types
//!
//! Error codes:
//! - CTG_LIFECYCLE_FAILED (severity of the underlying lifecycle error)
//! - CTG_VERSION_MISMATCH (FATAL)
//! - CTG_INVALID_ELECTION (ERROR)
//! - CTG_ENCODING_FAILED (FATAL)
//! - CTG_CONSTRUCTION_INVALID (FATAL)

use std::fmt;

use crate::claim::ClaimError;
use crate::lifecycle::{LifecycleError, LifecycleErrorCode};
use crate::observation::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectErrorCode {
    /// Lifecycle of the current version failed
    CtgLifecycleFailed,
    /// Replay from inception does not reproduce the current version
    CtgVersionMismatch,
    /// Election request rejected before lifecycle
    CtgInvalidElection,
    /// Claim tree could not be encoded for hashing
    CtgEncodingFailed,
    /// Instrument builder returned an invalid tree
    CtgConstructionInvalid,
}

impl EffectErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            EffectErrorCode::CtgLifecycleFailed => "CTG_LIFECYCLE_FAILED",
            EffectErrorCode::CtgVersionMismatch => "CTG_VERSION_MISMATCH",
            EffectErrorCode::CtgInvalidElection => "CTG_INVALID_ELECTION",
            EffectErrorCode::CtgEncodingFailed => "CTG_ENCODING_FAILED",
            EffectErrorCode::CtgConstructionInvalid => "CTG_CONSTRUCTION_INVALID",
        }
    }
}

impl fmt::Display for EffectErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectError {
    code: EffectErrorCode,
    severity: Severity,
    lifecycle_code: Option<LifecycleErrorCode>,
    message: String,
}

impl EffectError {
    fn new(code: EffectErrorCode, severity: Severity, message: String) -> Self {
        Self {
            code,
            severity,
            lifecycle_code: None,
            message,
        }
    }

    pub fn version_mismatch(expected: impl fmt::Display, replayed: impl fmt::Display) -> Self {
        Self::new(
            EffectErrorCode::CtgVersionMismatch,
            Severity::Fatal,
            format!("replay produced {} but current version is {}", replayed, expected),
        )
    }

    pub fn invalid_election(reason: impl Into<String>) -> Self {
        Self::new(EffectErrorCode::CtgInvalidElection, Severity::Error, reason.into())
    }

    pub fn encoding_failed(reason: impl fmt::Display) -> Self {
        Self::new(
            EffectErrorCode::CtgEncodingFailed,
            Severity::Fatal,
            format!("failed to encode claim: {}", reason),
        )
    }

    pub fn code(&self) -> EffectErrorCode {
        self.code
    }

    /// Code of the lifecycle failure, for CTG_LIFECYCLE_FAILED
    pub fn lifecycle_code(&self) -> Option<LifecycleErrorCode> {
        self.lifecycle_code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl From<LifecycleError> for EffectError {
    fn from(err: LifecycleError) -> Self {
        Self {
            code: EffectErrorCode::CtgLifecycleFailed,
            severity: err.severity(),
            lifecycle_code: Some(err.code()),
            message: err.message().to_string(),
        }
    }
}

impl From<ClaimError> for EffectError {
    fn from(err: ClaimError) -> Self {
        Self::new(
            EffectErrorCode::CtgConstructionInvalid,
            err.severity(),
            err.message().to_string(),
        )
    }
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lifecycle_code {
            Some(inner) => write!(
                f,
                "[{}] {}: {}: {}",
                self.severity, self.code, inner, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.severity, self.code, self.message),
        }
    }
}

impl std::error::Error for EffectError {}

pub type EffectResult<T> = Result<T, EffectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_failure_keeps_inner_code() {
        let err: EffectError = LifecycleError::unmatched_election("CALLED", 7).into();
        assert_eq!(err.code(), EffectErrorCode::CtgLifecycleFailed);
        assert_eq!(err.lifecycle_code(), Some(LifecycleErrorCode::CtgUnmatchedElectionTag));
        assert!(err.is_fatal());

        let display = err.to_string();
        assert!(display.starts_with("[FATAL] CTG_LIFECYCLE_FAILED: CTG_UNMATCHED_ELECTION_TAG"));
    }

    #[test]
    fn test_missing_observation_not_fatal() {
        let err: EffectError = LifecycleError::from(
            crate::observation::ObservationError::missing_observation("SPOT", 3),
        )
        .into();
        assert!(!err.is_fatal());
        assert_eq!(err.lifecycle_code(), Some(LifecycleErrorCode::CtgMissingObservation));
    }

    #[test]
    fn test_severities() {
        assert!(EffectError::version_mismatch("sha256:a", "sha256:b").is_fatal());
        assert!(!EffectError::invalid_election("amount must be positive").is_fatal());
        assert!(EffectError::encoding_failed("bad key").is_fatal());
    }
}
