//! Observability subsystem for docview
//!
//! Provides:
//! - Structured logging (JSON lines)
//! - Typed events
//! - Observation scopes around query execution
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No async or background threads
//!
//! # Usage
//!
//! ```ignore
//! use docview::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! log_event_with_fields(Event::ViewLoaded, &[("rows", "42")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Severity an event is logged at
pub fn event_severity(event: Event) -> Severity {
    if event.is_stage() {
        Severity::Trace
    } else if event.is_rejection() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log an event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}
