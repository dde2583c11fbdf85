//! Document source trait

use super::errors::SourceResult;

/// Raw document bytes plus the metadata stored alongside them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Encoded JSON body
    pub body: Vec<u8>,
    /// Compare-and-swap token of the stored revision
    pub cas: u64,
}

impl RawDocument {
    /// Creates a raw document
    pub fn new(body: impl Into<Vec<u8>>, cas: u64) -> Self {
        Self {
            body: body.into(),
            cas,
        }
    }
}

/// Trait for fetching documents by ID.
///
/// Fetches are blocking. Implementations decide their own concurrency
/// guarantees; the query pipeline issues fetches sequentially.
pub trait DocumentSource {
    /// Fetch the raw stored bytes of a document
    fn get_raw(&self, id: &str) -> SourceResult<RawDocument>;
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn get_raw(&self, id: &str) -> SourceResult<RawDocument> {
        (**self).get_raw(id)
    }
}
