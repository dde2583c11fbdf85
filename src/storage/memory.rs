//! In-memory document store

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::errors::{DocumentSourceError, SourceResult};
use super::source::{DocumentSource, RawDocument};

/// HashMap-backed document store.
///
/// Every write bumps a store-wide CAS counter so that each stored revision
/// carries a distinct token.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: HashMap<String, RawDocument>,
    last_cas: u64,
}

impl MemoryDocumentStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a JSON object mapping document ID to body
    pub fn from_json_map(docs: &Map<String, Value>) -> Self {
        let mut store = Self::new();
        for (id, body) in docs {
            store.insert_json(id, body);
        }
        store
    }

    /// Stores raw bytes under an ID, returning the new CAS
    pub fn insert_raw(&mut self, id: impl Into<String>, body: impl Into<Vec<u8>>) -> u64 {
        self.last_cas += 1;
        self.docs
            .insert(id.into(), RawDocument::new(body, self.last_cas));
        self.last_cas
    }

    /// Stores a JSON document under an ID, returning the new CAS
    pub fn insert_json(&mut self, id: impl Into<String>, body: &Value) -> u64 {
        // Serializing a Value cannot fail: map keys are always strings
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        self.insert_raw(id, bytes)
    }

    /// Removes a document
    pub fn remove(&mut self, id: &str) -> Option<RawDocument> {
        self.docs.remove(id)
    }

    /// Returns the number of stored documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true if the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentSource for MemoryDocumentStore {
    fn get_raw(&self, id: &str) -> SourceResult<RawDocument> {
        self.docs
            .get(id)
            .cloned()
            .ok_or_else(|| DocumentSourceError::NotFound(id.to_string()))
    }
}
