//! View row

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single emitted row of a view.
///
/// `key` and `value` are arbitrary JSON. Reduced rows have an empty `id`,
/// and the single row of an ungrouped reduce has a `null` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    /// Emitted key
    #[serde(default)]
    pub key: Value,
    /// Emitted value
    #[serde(default)]
    pub value: Value,
    /// ID of the document that emitted this row
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Full document body, set when documents are inlined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Value>,
}

impl ViewRow {
    /// Creates a row emitted by a document
    pub fn new(key: Value, value: Value, id: impl Into<String>) -> Self {
        Self {
            key,
            value,
            id: id.into(),
            doc: None,
        }
    }

    /// Creates a reduced row carrying only a value
    pub fn reduced(value: Value) -> Self {
        Self {
            key: Value::Null,
            value,
            id: String::new(),
            doc: None,
        }
    }

    /// Returns this row with the given document attached
    pub fn with_doc(mut self, doc: Value) -> Self {
        self.doc = Some(doc);
        self
    }
}
