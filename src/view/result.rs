//! View result

use serde::{Deserialize, Serialize};

use crate::collation::collate;

use super::row::ViewRow;

/// Rows of a view plus the row count reported to callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewResult {
    /// Number of rows after all query stages have run
    #[serde(default)]
    pub total_rows: usize,
    /// Rows in collation order
    #[serde(default)]
    pub rows: Vec<ViewRow>,
}

impl ViewResult {
    /// Creates a result from rows that are already in collation order
    pub fn new(rows: Vec<ViewRow>) -> Self {
        Self {
            total_rows: rows.len(),
            rows,
        }
    }

    /// Creates a result from rows in arbitrary order, sorting them by key
    pub fn from_unsorted(rows: Vec<ViewRow>) -> Self {
        let mut result = Self::new(rows);
        result.sort();
        result
    }

    /// Sorts rows by key under view collation.
    ///
    /// The sort is stable, so rows with equal keys keep their emit order.
    pub fn sort(&mut self) {
        self.rows.sort_by(|a, b| collate(&a.key, &b.key));
    }

    /// Returns true if rows are in collation order
    pub fn is_sorted(&self) -> bool {
        self.rows
            .windows(2)
            .all(|pair| collate(&pair[0].key, &pair[1].key).is_le())
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &ViewRow> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_unsorted_sorts_by_collation() {
        let result = ViewResult::from_unsorted(vec![
            ViewRow::new(json!("b"), json!(1), "d1"),
            ViewRow::new(json!(null), json!(2), "d2"),
            ViewRow::new(json!([1]), json!(3), "d3"),
            ViewRow::new(json!(7), json!(4), "d4"),
        ]);

        let keys: Vec<_> = result.iter().map(|r| r.key.clone()).collect();
        assert_eq!(keys, vec![json!(null), json!(7), json!("b"), json!([1])]);
        assert!(result.is_sorted());
        assert_eq!(result.total_rows, 4);
    }

    #[test]
    fn test_sort_is_stable() {
        let result = ViewResult::from_unsorted(vec![
            ViewRow::new(json!(1), json!("first"), "a"),
            ViewRow::new(json!(0), json!("zero"), "z"),
            ViewRow::new(json!(1), json!("second"), "b"),
        ]);

        assert_eq!(result.rows[1].id, "a");
        assert_eq!(result.rows[2].id, "b");
    }

    #[test]
    fn test_serialized_shape() {
        let result = ViewResult::new(vec![ViewRow::new(json!(1), json!(2), "x")]);
        let encoded = serde_json::to_value(&result).unwrap();
        assert_eq!(
            encoded,
            json!({"total_rows": 1, "rows": [{"key": 1, "value": 2, "id": "x"}]})
        );
    }
}
