//! View query subsystem for docview
//!
//! Turns a sorted view result plus query parameters into the rows a caller
//! sees.
//!
//! # Pipeline (strict order)
//!
//! 1. Parse and validate parameters
//! 2. Reject reverse iteration
//! 3. Resolve the reduce function
//! 4. Apply start key, limit, end key
//! 5. Inline documents (`include_docs`)
//! 6. Reduce, optionally grouped
//! 7. Recompute `total_rows`

mod inline;
mod options;
mod processor;
mod range;

pub use inline::DocumentInliner;
pub use options::{QueryParams, ViewQueryOptions};
pub use processor::ViewQueryProcessor;
pub use range::{KeyRange, RangeSelector};
