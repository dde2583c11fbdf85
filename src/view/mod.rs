//! View result model for docview
//!
//! A view result is the sorted output of a view's map phase: rows of
//! (key, value, document ID), optionally carrying the full document once
//! `include_docs` has been applied.
//!
//! # Invariants
//!
//! - Rows handed to the query pipeline are sorted ascending by key under
//!   view collation. The pipeline relies on this and does not re-check it.
//! - `total_rows` equals `rows.len()` after every completed query.

mod errors;
mod result;
mod row;

pub use errors::{QueryResult, ViewError};
pub use result::ViewResult;
pub use row::ViewRow;
