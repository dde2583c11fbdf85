//! Design documents for docview
//!
//! A design document names a set of views, each a map function source and
//! an optional reduce function identifier. Validation is a boundary check:
//! the document must decode and may only declare the `javascript`
//! language.

mod ddoc;

pub use ddoc::{check_design_doc, DesignDoc, DesignDocOptions, ViewDef, DEFAULT_LANGUAGE};
