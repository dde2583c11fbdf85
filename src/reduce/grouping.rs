//! Grouped reduction over sorted rows
//!
//! Rows arrive sorted by key, so every group is a contiguous run. The
//! engine walks the rows once, closing a group whenever the projected key
//! of the next row stops collating equal to the running group key.

use std::borrow::Cow;

use serde_json::Value;

use crate::collation::collate;
use crate::view::{QueryResult, ViewError, ViewRow};

use super::registry::Reducer;

/// How rows are partitioned before reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupLevel {
    /// Fold all rows into a single row with a null key
    #[default]
    Ungrouped,
    /// One group per distinct key; keys are treated as opaque
    Exact,
    /// One group per distinct prefix of the first N elements of array keys
    Prefix(usize),
}

impl GroupLevel {
    /// Interprets `group` / `group_level` query parameters.
    ///
    /// `group=true` wins over any level; a level of 0 means ungrouped.
    pub fn from_params(group: bool, group_level: Option<u64>) -> Self {
        if group {
            return GroupLevel::Exact;
        }
        match group_level {
            None | Some(0) => GroupLevel::Ungrouped,
            Some(level) => GroupLevel::Prefix(usize::try_from(level).unwrap_or(usize::MAX)),
        }
    }

    /// Returns true if rows are partitioned before reduction
    pub fn is_grouped(&self) -> bool {
        !matches!(self, GroupLevel::Ungrouped)
    }

    /// Projects a row key onto its group key.
    ///
    /// Prefix grouping requires array keys; arrays shorter than the level
    /// project to themselves.
    pub fn group_key<'k>(&self, key: &'k Value) -> QueryResult<Cow<'k, Value>> {
        match self {
            GroupLevel::Ungrouped | GroupLevel::Exact => Ok(Cow::Borrowed(key)),
            GroupLevel::Prefix(level) => match key {
                Value::Array(items) if items.len() <= *level => Ok(Cow::Borrowed(key)),
                Value::Array(items) => Ok(Cow::Owned(Value::Array(items[..*level].to_vec()))),
                other => Err(ViewError::GroupKeyNotArray {
                    level: *level,
                    key: other.clone(),
                }),
            },
        }
    }
}

/// Reduces sorted rows through a reducer at a given group level
pub struct GroupReducer<'a> {
    reducer: &'a dyn Reducer,
    level: GroupLevel,
}

impl<'a> GroupReducer<'a> {
    /// Creates a group reducer
    pub fn new(reducer: &'a dyn Reducer, level: GroupLevel) -> Self {
        Self { reducer, level }
    }

    /// Reduces rows into output rows.
    ///
    /// Ungrouped reduction always yields exactly one row. Grouped reduction
    /// yields one row per group in key order, and none for empty input.
    pub fn reduce(&self, rows: &[ViewRow]) -> QueryResult<Vec<ViewRow>> {
        if !self.level.is_grouped() {
            let mut out = self.reducer.reduce(rows)?;
            out.key = Value::Null;
            return Ok(vec![out]);
        }

        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        let mut group_key = self.level.group_key(&first.key)?;
        let mut group_start = 0;

        for (i, row) in rows.iter().enumerate().skip(1) {
            let key = self.level.group_key(&row.key)?;
            if collate(&key, &group_key).is_eq() {
                continue;
            }
            out.push(self.reduce_group(&rows[group_start..i], group_key)?);
            group_key = key;
            group_start = i;
        }

        // The last group is still open
        out.push(self.reduce_group(&rows[group_start..], group_key)?);
        Ok(out)
    }

    fn reduce_group(&self, rows: &[ViewRow], key: Cow<'_, Value>) -> QueryResult<ViewRow> {
        let mut out = self.reducer.reduce(rows)?;
        out.key = key.into_owned();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::{CountReducer, SumReducer};
    use serde_json::json;

    fn rows(pairs: &[(Value, Value)]) -> Vec<ViewRow> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (k, v))| ViewRow::new(k.clone(), v.clone(), format!("doc{}", i)))
            .collect()
    }

    #[test]
    fn test_group_level_from_params() {
        assert_eq!(GroupLevel::from_params(false, None), GroupLevel::Ungrouped);
        assert_eq!(GroupLevel::from_params(false, Some(0)), GroupLevel::Ungrouped);
        assert_eq!(GroupLevel::from_params(false, Some(2)), GroupLevel::Prefix(2));
        assert_eq!(GroupLevel::from_params(true, Some(2)), GroupLevel::Exact);
        assert_eq!(
            GroupLevel::from_params(false, Some(u64::MAX)),
            GroupLevel::Prefix(usize::try_from(u64::MAX).unwrap_or(usize::MAX))
        );
    }

    #[test]
    fn test_group_level_one_counts_per_prefix() {
        let input = rows(&[
            (json!(["a", 1]), json!(1)),
            (json!(["a", 2]), json!(1)),
            (json!(["b", 1]), json!(1)),
        ]);

        let out = GroupReducer::new(&CountReducer, GroupLevel::Prefix(1))
            .reduce(&input)
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].key, json!(["a"]));
        assert_eq!(out[0].value, json!(2));
        assert_eq!(out[1].key, json!(["b"]));
        assert_eq!(out[1].value, json!(1));
    }

    #[test]
    fn test_exact_grouping_uses_whole_key() {
        let input = rows(&[
            (json!("x"), json!(2)),
            (json!("x"), json!(3)),
            (json!("y"), json!(10)),
            (json!(4), json!(1)),
        ]);
        // Keys need not be arrays for exact grouping; sort order is the caller's concern
        let out = GroupReducer::new(&SumReducer, GroupLevel::Exact)
            .reduce(&input)
            .unwrap();

        let pairs: Vec<_> = out.iter().map(|r| (r.key.clone(), r.value.clone())).collect();
        assert_eq!(
            pairs,
            vec![
                (json!("x"), json!(5)),
                (json!("y"), json!(10)),
                (json!(4), json!(1)),
            ]
        );
    }

    #[test]
    fn test_exact_grouping_collates_numbers() {
        let input = rows(&[(json!([1, 2]), json!(1)), (json!([1.0, 2.0]), json!(1))]);
        let out = GroupReducer::new(&CountReducer, GroupLevel::Exact)
            .reduce(&input)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, json!(2));
    }

    #[test]
    fn test_ungrouped_folds_once() {
        let input = rows(&[(json!(1), json!(1)), (json!(2), json!(2)), (json!(3), json!(3))]);
        let out = GroupReducer::new(&SumReducer, GroupLevel::Ungrouped)
            .reduce(&input)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, Value::Null);
        assert_eq!(out[0].value, json!(6));
    }

    #[test]
    fn test_ungrouped_empty_input_still_emits_row() {
        let out = GroupReducer::new(&CountReducer, GroupLevel::Ungrouped)
            .reduce(&[])
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, json!(0));
    }

    #[test]
    fn test_grouped_empty_input_emits_nothing() {
        let out = GroupReducer::new(&CountReducer, GroupLevel::Prefix(1))
            .reduce(&[])
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_group() {
        let input = rows(&[(json!(["k", 1]), json!(1)), (json!(["k", 2]), json!(1))]);
        let out = GroupReducer::new(&CountReducer, GroupLevel::Prefix(1))
            .reduce(&input)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, json!(["k"]));
    }

    #[test]
    fn test_short_keys_project_to_themselves() {
        let input = rows(&[
            (json!(["a"]), json!(1)),
            (json!(["a", 1, 1]), json!(1)),
            (json!(["a", 1, 2]), json!(1)),
        ]);
        let out = GroupReducer::new(&CountReducer, GroupLevel::Prefix(2))
            .reduce(&input)
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].key, json!(["a"]));
        assert_eq!(out[1].key, json!(["a", 1]));
        assert_eq!(out[1].value, json!(2));
    }

    #[test]
    fn test_prefix_grouping_rejects_non_array_key() {
        let input = rows(&[(json!(["a", 1]), json!(1)), (json!("b"), json!(1))]);
        let err = GroupReducer::new(&CountReducer, GroupLevel::Prefix(1))
            .reduce(&input)
            .unwrap_err();

        match err {
            ViewError::GroupKeyNotArray { level, key } => {
                assert_eq!(level, 1);
                assert_eq!(key, json!("b"));
            }
            other => panic!("expected GroupKeyNotArray, got {}", other),
        }
    }

    #[test]
    fn test_reducer_failure_propagates() {
        let input = rows(&[(json!(["a"]), json!("not a number"))]);
        let err = GroupReducer::new(&SumReducer, GroupLevel::Prefix(1))
            .reduce(&input)
            .unwrap_err();
        assert_eq!(err.code(), "VIEW_REDUCE_FAILED");
    }

    #[test]
    fn test_reducer_sees_only_its_group() {
        let seen = std::sync::Mutex::new(Vec::new());
        let recorder = |rows: &[ViewRow]| -> QueryResult<ViewRow> {
            seen.lock().unwrap().push(rows.iter().map(|r| r.id.clone()).collect::<Vec<_>>());
            Ok(ViewRow::reduced(json!(rows.len())))
        };

        let input = rows(&[
            (json!(["a", 1]), json!(0)),
            (json!(["b", 1]), json!(0)),
            (json!(["b", 2]), json!(0)),
        ]);
        GroupReducer::new(&recorder, GroupLevel::Prefix(1))
            .reduce(&input)
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![vec!["doc0".to_string()], vec!["doc1".to_string(), "doc2".to_string()]]
        );
    }
}
