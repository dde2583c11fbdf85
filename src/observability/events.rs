//! Observable events for docview
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// View rows loaded and sorted
    ViewLoaded,
    /// Document store loaded
    DocumentsLoaded,

    // Design documents
    /// Design document accepted
    DesignDocAccepted,
    /// Design document rejected
    DesignDocRejected,

    // Query stages
    /// Key range applied
    RangeSelected,
    /// Documents attached to rows
    DocumentsInlined,
    /// Reduce phase complete
    ReduceComplete,
    /// Query rejected before any stage ran
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ViewLoaded => "VIEW_LOADED",
            Event::DocumentsLoaded => "DOCUMENTS_LOADED",
            Event::DesignDocAccepted => "DESIGN_DOC_ACCEPTED",
            Event::DesignDocRejected => "DESIGN_DOC_REJECTED",
            Event::RangeSelected => "VIEW_RANGE_SELECTED",
            Event::DocumentsInlined => "VIEW_DOCS_INLINED",
            Event::ReduceComplete => "VIEW_REDUCE_COMPLETE",
            Event::QueryRejected => "VIEW_QUERY_REJECTED",
        }
    }

    /// Returns true for per-stage events logged at TRACE
    pub fn is_stage(&self) -> bool {
        matches!(
            self,
            Event::RangeSelected | Event::DocumentsInlined | Event::ReduceComplete
        )
    }

    /// Returns true for events that report a rejection
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::DesignDocRejected | Event::QueryRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
