//! Document storage collaborator for docview
//!
//! The query pipeline never owns documents. When `include_docs` is
//! requested it asks a [`DocumentSource`] for each row's raw bytes and
//! decodes them itself.
//!
//! [`MemoryDocumentStore`] is the in-process implementation used by the
//! CLI and by tests.

mod errors;
mod memory;
mod source;

pub use errors::{DocumentSourceError, SourceResult};
pub use memory::MemoryDocumentStore;
pub use source::{DocumentSource, RawDocument};
