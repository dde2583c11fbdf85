//! Key range selection over sorted rows
//!
//! Boundaries are found by binary search with the view collator, so rows
//! must already be in collation order. Stages are applied in a fixed
//! order: start bound, then limit, then end bound. The limit therefore
//! counts rows from the start bound regardless of where the end bound
//! falls.

use std::ops::Range;

use serde_json::Value;

use crate::collation::collate;
use crate::view::ViewRow;

use super::options::ViewQueryOptions;

/// Start/end key bounds of a query
#[derive(Debug, Clone, Copy)]
pub struct KeyRange<'a> {
    start: Option<&'a Value>,
    end: Option<&'a Value>,
    inclusive_end: bool,
}

impl<'a> KeyRange<'a> {
    /// Creates a key range
    pub fn new(start: Option<&'a Value>, end: Option<&'a Value>, inclusive_end: bool) -> Self {
        Self {
            start,
            end,
            inclusive_end,
        }
    }

    /// Creates an unbounded key range
    pub fn all() -> Self {
        Self::new(None, None, true)
    }

    /// Returns true if `key` lies before the start bound
    fn before_start(&self, key: &Value) -> bool {
        self.start.is_some_and(|start| collate(key, start).is_lt())
    }

    /// Returns true if `key` does not pass the end bound
    fn within_end(&self, key: &Value) -> bool {
        match self.end {
            None => true,
            Some(end) if self.inclusive_end => collate(key, end).is_le(),
            Some(end) => collate(key, end).is_lt(),
        }
    }
}

/// Selects the contiguous sub-range of sorted rows a query returns
#[derive(Debug, Clone, Copy)]
pub struct RangeSelector<'a> {
    range: KeyRange<'a>,
    limit: Option<usize>,
}

impl<'a> RangeSelector<'a> {
    /// Creates a selector from bounds and an optional limit
    pub fn new(range: KeyRange<'a>, limit: Option<usize>) -> Self {
        Self { range, limit }
    }

    /// Creates a selector from query options
    pub fn from_options(options: &'a ViewQueryOptions) -> Self {
        Self::new(
            KeyRange::new(
                options.start_key.as_ref(),
                options.end_key.as_ref(),
                options.inclusive_end,
            ),
            options.limit,
        )
    }

    /// Returns the index range of rows to keep.
    ///
    /// A limit of 0 is unlimited. Does not touch `rows`; callers slice or
    /// truncate with the result.
    pub fn select(&self, rows: &[ViewRow]) -> Range<usize> {
        let start = rows.partition_point(|row| self.range.before_start(&row.key));

        let mut end = rows.len();
        if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
            end = end.min(start.saturating_add(limit));
        }

        let end = start + rows[start..end].partition_point(|row| self.range.within_end(&row.key));
        start..end
    }
}
