//! ObservationScope for begin/complete logging around an operation
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` or `{name}_FAILED` when closed
//! - Logs `{name}_INCOMPLETE` if dropped without being closed

use std::cell::Cell;
use std::time::Instant;

use super::logger::Logger;

/// A scope that logs the lifecycle of one operation
///
/// ```ignore
/// let scope = ObservationScope::with_fields("VIEW_QUERY", &[("rows_in", "12")]);
/// // ... do work ...
/// scope.complete_with_fields(&[("total_rows", "3")]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    /// Create a new observation scope
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a new observation scope whose fields are repeated on every line
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);

        Self {
            name,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as completed, adding `elapsed_ms` and extra fields
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let elapsed = self.timer.elapsed_ms();

        let mut all_fields = self.field_refs();
        all_fields.push(("elapsed_ms", elapsed.as_str()));
        all_fields.extend(extra_fields.iter().copied());

        Logger::info(&format!("{}_COMPLETE", self.name), &all_fields);
    }

    /// Mark the scope as failed with an error code and reason
    pub fn fail(self, code: &str, reason: &str) {
        self.completed.set(true);

        let mut all_fields = self.field_refs();
        all_fields.push(("code", code));
        all_fields.push(("reason", reason));

        Logger::error(&format!("{}_FAILED", self.name), &all_fields);
    }

    /// Check if the scope has been completed
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
