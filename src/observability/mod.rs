//! Observability
//!
//! Structured JSON logging for the settlement workflow.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on lifecycle results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use contingent::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::VersionMinted, &[("version", id.as_str())]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Severity an event is logged at
pub fn event_severity(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a workflow event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}
