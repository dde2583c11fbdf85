//! Query options parsed from view query parameters
//!
//! Parameters arrive as an unordered JSON mapping. Every recognized key is
//! type-checked here, once, so later stages work with validated fields.
//! Unrecognized keys are ignored.

use serde_json::{Map, Value};

use crate::reduce::GroupLevel;
use crate::view::{QueryResult, ViewError};

/// View query parameters as an unordered JSON mapping
pub type QueryParams = Map<String, Value>;

/// Validated view query options
#[derive(Debug, Clone, PartialEq)]
pub struct ViewQueryOptions {
    /// Lowest key to return
    pub start_key: Option<Value>,
    /// Highest key to return
    pub end_key: Option<Value>,
    /// Whether rows equal to `end_key` are returned
    pub inclusive_end: bool,
    /// Maximum rows kept after the start bound; `None` or `Some(0)` is unlimited
    pub limit: Option<usize>,
    /// Whether full documents are attached to rows
    pub include_docs: bool,
    /// Whether the reduce function runs
    pub reduce: bool,
    /// Grouping applied when reducing
    pub group_level: GroupLevel,
    /// Reverse iteration (rejected by the processor)
    pub reverse: bool,
}

impl Default for ViewQueryOptions {
    fn default() -> Self {
        Self {
            start_key: None,
            end_key: None,
            inclusive_end: true,
            limit: None,
            include_docs: false,
            reduce: true,
            group_level: GroupLevel::Ungrouped,
            reverse: false,
        }
    }
}

impl ViewQueryOptions {
    /// Creates options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses query parameters.
    ///
    /// - `startkey` falls back to `start_key`, `endkey` to `end_key`
    /// - `key` sets both bounds and forces an inclusive end
    /// - JSON `null` counts as absent
    /// - `limit=0` means unlimited
    pub fn from_params(params: &QueryParams) -> QueryResult<Self> {
        let mut options = Self::default();

        options.start_key = key_param(params, "startkey").or_else(|| key_param(params, "start_key"));
        options.end_key = key_param(params, "endkey").or_else(|| key_param(params, "end_key"));

        if let Some(inclusive_end) = bool_param(params, "inclusive_end")? {
            options.inclusive_end = inclusive_end;
        }
        if let Some(key) = key_param(params, "key") {
            options.start_key = Some(key.clone());
            options.end_key = Some(key);
            options.inclusive_end = true;
        }

        options.limit = match uint_param(params, "limit")? {
            None | Some(0) => None,
            Some(limit) => Some(usize::try_from(limit).unwrap_or(usize::MAX)),
        };
        options.include_docs = bool_param(params, "include_docs")?.unwrap_or(false);
        options.reduce = bool_param(params, "reduce")?.unwrap_or(true);
        options.reverse = bool_param(params, "reverse")?.unwrap_or(false);

        let group = bool_param(params, "group")?.unwrap_or(false);
        let group_level = uint_param(params, "group_level")?;
        options.group_level = GroupLevel::from_params(group, group_level);

        Ok(options)
    }

    /// Sets the start key
    pub fn with_start_key(mut self, key: Value) -> Self {
        self.start_key = Some(key);
        self
    }

    /// Sets the end key
    pub fn with_end_key(mut self, key: Value) -> Self {
        self.end_key = Some(key);
        self
    }

    /// Restricts the query to a single key
    pub fn with_key(mut self, key: Value) -> Self {
        self.start_key = Some(key.clone());
        self.end_key = Some(key);
        self.inclusive_end = true;
        self
    }

    /// Sets end inclusivity
    pub fn with_inclusive_end(mut self, inclusive_end: bool) -> Self {
        self.inclusive_end = inclusive_end;
        self
    }

    /// Sets the limit; 0 means unlimited
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Requests full documents
    pub fn with_include_docs(mut self, include_docs: bool) -> Self {
        self.include_docs = include_docs;
        self
    }

    /// Enables or disables the reduce phase
    pub fn with_reduce(mut self, reduce: bool) -> Self {
        self.reduce = reduce;
        self
    }

    /// Sets grouping
    pub fn with_group_level(mut self, group_level: GroupLevel) -> Self {
        self.group_level = group_level;
        self
    }

    /// Requests reverse iteration
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}

fn key_param(params: &QueryParams, name: &str) -> Option<Value> {
    params.get(name).filter(|v| !v.is_null()).cloned()
}

fn bool_param(params: &QueryParams, name: &str) -> QueryResult<Option<bool>> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(ViewError::invalid_parameter(name, "boolean", other)),
    }
}

fn uint_param(params: &QueryParams, name: &str) -> QueryResult<Option<u64>> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| ViewError::invalid_parameter(name, "non-negative integer", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> QueryParams {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = ViewQueryOptions::from_params(&QueryParams::new()).unwrap();
        assert_eq!(options, ViewQueryOptions::default());
        assert!(options.inclusive_end);
        assert!(options.reduce);
        assert_eq!(options.limit, None);
    }

    #[test]
    fn test_key_synonyms() {
        let options =
            ViewQueryOptions::from_params(&params(json!({"start_key": 1, "end_key": 9}))).unwrap();
        assert_eq!(options.start_key, Some(json!(1)));
        assert_eq!(options.end_key, Some(json!(9)));

        let options = ViewQueryOptions::from_params(&params(
            json!({"startkey": 2, "start_key": 1, "endkey": 8, "end_key": 9}),
        ))
        .unwrap();
        assert_eq!(options.start_key, Some(json!(2)));
        assert_eq!(options.end_key, Some(json!(8)));
    }

    #[test]
    fn test_key_overrides_bounds() {
        let options = ViewQueryOptions::from_params(&params(json!({
            "startkey": 1,
            "endkey": 9,
            "key": ["a", 3],
            "inclusive_end": false
        })))
        .unwrap();

        assert_eq!(options.start_key, Some(json!(["a", 3])));
        assert_eq!(options.end_key, Some(json!(["a", 3])));
        assert!(options.inclusive_end);
    }

    #[test]
    fn test_inclusive_end_checked_alongside_key() {
        let err = ViewQueryOptions::from_params(&params(json!({"key": 1, "inclusive_end": "no"})))
            .unwrap_err();
        match err {
            ViewError::InvalidParameter { name, .. } => assert_eq!(name, "inclusive_end"),
            other => panic!("expected InvalidParameter, got {}", other),
        }
    }

    #[test]
    fn test_null_key_is_absent() {
        let options =
            ViewQueryOptions::from_params(&params(json!({"startkey": null, "start_key": 4})))
                .unwrap();
        assert_eq!(options.start_key, Some(json!(4)));
    }

    #[test]
    fn test_limit_zero_is_unlimited() {
        let options = ViewQueryOptions::from_params(&params(json!({"limit": 0}))).unwrap();
        assert_eq!(options.limit, None);

        let options = ViewQueryOptions::from_params(&params(json!({"limit": 5}))).unwrap();
        assert_eq!(options.limit, Some(5));
    }

    #[test]
    fn test_grouping_params() {
        let options = ViewQueryOptions::from_params(&params(json!({"group_level": 2}))).unwrap();
        assert_eq!(options.group_level, GroupLevel::Prefix(2));

        let options =
            ViewQueryOptions::from_params(&params(json!({"group": true, "group_level": 2})))
                .unwrap();
        assert_eq!(options.group_level, GroupLevel::Exact);

        let options = ViewQueryOptions::from_params(&params(json!({"group": false}))).unwrap();
        assert_eq!(options.group_level, GroupLevel::Ungrouped);
    }

    #[test]
    fn test_rejects_non_boolean_flag() {
        let err = ViewQueryOptions::from_params(&params(json!({"include_docs": "true"})))
            .unwrap_err();
        match err {
            ViewError::InvalidParameter { name, expected, .. } => {
                assert_eq!(name, "include_docs");
                assert_eq!(expected, "boolean");
            }
            other => panic!("expected InvalidParameter, got {}", other),
        }
    }

    #[test]
    fn test_rejects_negative_limit() {
        let err = ViewQueryOptions::from_params(&params(json!({"limit": -1}))).unwrap_err();
        assert_eq!(err.code(), "VIEW_INVALID_PARAMETER");
    }

    #[test]
    fn test_rejects_fractional_group_level() {
        let err =
            ViewQueryOptions::from_params(&params(json!({"group_level": 1.5}))).unwrap_err();
        assert_eq!(err.code(), "VIEW_INVALID_PARAMETER");
    }

    #[test]
    fn test_ignores_unknown_params() {
        let options =
            ViewQueryOptions::from_params(&params(json!({"stale": "ok", "descending": 7})))
                .unwrap();
        assert_eq!(options, ViewQueryOptions::default());
    }

    #[test]
    fn test_builder() {
        let options = ViewQueryOptions::new()
            .with_start_key(json!(2))
            .with_end_key(json!(4))
            .with_inclusive_end(false)
            .with_limit(0)
            .with_reduce(false);

        assert_eq!(options.start_key, Some(json!(2)));
        assert_eq!(options.end_key, Some(json!(4)));
        assert!(!options.inclusive_end);
        assert_eq!(options.limit, None);
        assert!(!options.reduce);
    }
}
