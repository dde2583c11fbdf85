//! Document inlining for `include_docs`

use serde_json::Value;

use crate::storage::DocumentSource;
use crate::view::{QueryResult, ViewError, ViewRow};

/// Attaches full documents to view rows
pub struct DocumentInliner<'a, S: DocumentSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: DocumentSource + ?Sized> DocumentInliner<'a, S> {
    /// Creates an inliner reading from the given source
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Returns copies of `rows` with `doc` set from the source.
    ///
    /// Fails on the first fetch or decode error, and returns nothing
    /// partially inlined. Rows sharing a document ID fetch it once each.
    pub fn inline(&self, rows: &[ViewRow]) -> QueryResult<Vec<ViewRow>> {
        rows.iter()
            .map(|row| {
                let doc = self.fetch(&row.id)?;
                Ok(row.clone().with_doc(doc))
            })
            .collect()
    }

    fn fetch(&self, id: &str) -> QueryResult<Value> {
        let raw = self
            .source
            .get_raw(id)
            .map_err(|source| ViewError::DocumentFetchFailed {
                id: id.to_string(),
                source,
            })?;

        serde_json::from_slice(&raw.body).map_err(|source| ViewError::DocumentDecodeFailed {
            id: id.to_string(),
            source,
        })
    }
}
