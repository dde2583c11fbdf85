//! Design document model and validation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::{log_event_with_fields, Event};
use crate::view::{QueryResult, ViewError};

/// The only language design documents may declare
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// A single view definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDef {
    /// Map function source
    pub map: String,
    /// Reduce function identifier or source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce: Option<String>,
}

/// Indexing options of a design document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDocOptions {
    /// Include local sequence numbers in emitted rows
    #[serde(default)]
    pub local_seq: bool,
    /// Index design documents as well as regular ones
    #[serde(default)]
    pub include_design: bool,
}

/// A decoded design document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDoc {
    /// Declared language; absent means javascript
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Views by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub views: BTreeMap<String, ViewDef>,
    /// Indexing options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<DesignDocOptions>,
}

impl DesignDoc {
    /// Returns the effective language
    pub fn language(&self) -> &str {
        match self.language.as_deref() {
            None | Some("") => DEFAULT_LANGUAGE,
            Some(language) => language,
        }
    }

    /// Returns a view definition by name
    pub fn view(&self, name: &str) -> Option<&ViewDef> {
        self.views.get(name)
    }

    /// Returns the reduce function of a view, if it has a non-empty one
    pub fn reduce_function(&self, view: &str) -> Option<&str> {
        self.view(view)
            .and_then(|def| def.reduce.as_deref())
            .filter(|reduce| !reduce.is_empty())
    }
}

/// Validates an arbitrary value as a design document.
///
/// Fails with `InvalidDesignDocument` if the value does not decode, and
/// with `UnsupportedLanguage` if it declares anything but javascript.
pub fn check_design_doc(value: &Value) -> QueryResult<DesignDoc> {
    let design: DesignDoc = serde_json::from_value(value.clone()).map_err(|e| {
        let err = ViewError::InvalidDesignDocument(e.to_string());
        log_event_with_fields(Event::DesignDocRejected, &[("code", err.code())]);
        err
    })?;

    let language = design.language();
    if language != DEFAULT_LANGUAGE {
        log_event_with_fields(Event::DesignDocRejected, &[("language", language)]);
        return Err(ViewError::UnsupportedLanguage(language.to_string()));
    }

    let views = design.views.len().to_string();
    log_event_with_fields(Event::DesignDocAccepted, &[("views", views.as_str())]);
    Ok(design)
}
