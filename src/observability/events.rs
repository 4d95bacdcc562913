//! Observable events of the settlement workflow
//!
//! Events are explicit and typed. The algebra and the lifecycle engine
//! never log; only effect assembly and the CLI do.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Engine configuration loaded
    ConfigLoaded,

    // Replay
    /// Reconstruction from inception begins
    ReplayStart,
    /// Reconstruction reproduced the expected version
    ReplayComplete,
    /// Reconstructed tree does not hash to the expected version (FATAL)
    ReplayMismatch,

    // Elections
    /// Election request received
    ElectionReceived,
    /// Election applied and effect assembled
    ElectionApplied,
    /// Election rejected before or during lifecycle
    ElectionRejected,

    // Time
    /// Time event realized quantities or changed the tree
    TimeEventApplied,
    /// Event changed nothing
    LifecycleNoop,

    // Versions
    /// New instrument version created
    VersionMinted,
    /// Nothing remains to lifecycle
    InstrumentDischarged,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ReplayStart => "REPLAY_START",
            Event::ReplayComplete => "REPLAY_COMPLETE",
            Event::ReplayMismatch => "REPLAY_MISMATCH",
            Event::ElectionReceived => "ELECTION_RECEIVED",
            Event::ElectionApplied => "ELECTION_APPLIED",
            Event::ElectionRejected => "ELECTION_REJECTED",
            Event::TimeEventApplied => "TIME_EVENT_APPLIED",
            Event::LifecycleNoop => "LIFECYCLE_NOOP",
            Event::VersionMinted => "VERSION_MINTED",
            Event::InstrumentDischarged => "INSTRUMENT_DISCHARGED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ReplayMismatch)
    }

    /// Recoverable failures worth surfacing above INFO
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::ElectionRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_strings() {
        assert_eq!(Event::ReplayStart.as_str(), "REPLAY_START");
        assert_eq!(Event::VersionMinted.to_string(), "VERSION_MINTED");
        assert_eq!(Event::InstrumentDischarged.as_str(), "INSTRUMENT_DISCHARGED");
    }

    #[test]
    fn test_only_mismatch_is_fatal() {
        assert!(Event::ReplayMismatch.is_fatal());
        assert!(!Event::ElectionRejected.is_fatal());
        assert!(Event::ElectionRejected.is_warning());
        assert!(!Event::ElectionApplied.is_warning());
    }
}
