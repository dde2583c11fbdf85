//! docview - query-time processing for precomputed document views
//!
//! A view is a list of rows emitted by a map function, kept sorted by key
//! under a fixed JSON collation. Queries select a key range, optionally
//! attach the emitting documents, and optionally reduce the selected rows
//! into one row or one row per key group.
//!
//! - `collation`: total order over JSON values
//! - `view`: rows, results and errors
//! - `query`: options, range selection, inlining, the processor
//! - `reduce`: built-in reducers and grouping
//! - `design`: design document validation
//! - `storage`: document lookup seam and an in-memory store
//! - `observability`: structured logging
//! - `cli`: the `docview` command

pub mod cli;
pub mod collation;
pub mod design;
pub mod observability;
pub mod query;
pub mod reduce;
pub mod storage;
pub mod view;
