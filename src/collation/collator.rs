//! JSON value collator
//!
//! Pure, deterministic comparator over decoded JSON values.

use std::cmp::Ordering;

use serde_json::{Map, Value};

/// Comparator implementing view collation.
///
/// Stateless; exists so callers can hold a collator as a value and pass
/// `JsonCollator::compare` where a comparator function is expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCollator;

impl JsonCollator {
    /// Creates a collator
    pub fn new() -> Self {
        Self
    }

    /// Compares two values under view collation.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        collate(a, b)
    }

    /// Returns true if both values collate equal.
    pub fn equal(&self, a: &Value, b: &Value) -> bool {
        collate(a, b) == Ordering::Equal
    }
}

/// Compares two JSON values under view collation.
pub fn collate(a: &Value, b: &Value) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(_), Value::Number(_)) => compare_numbers(a, b),
        // UTF-8 byte order is code point order
        (Value::String(x), Value::String(y)) => x.as_str().cmp(y.as_str()),
        (Value::Array(x), Value::Array(y)) => compare_arrays(x, y),
        (Value::Object(x), Value::Object(y)) => compare_objects(x, y),
        _ => unreachable!("values of equal type rank have the same variant"),
    }
}

/// Extracts the numeric value used for collation.
///
/// Returns `None` for anything that is not a JSON number. The `_sum`
/// reducer uses the same extraction so that sums agree with ordering.
pub fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Type precedence: null, false, true, number, string, array, object.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(false) => 1,
        Value::Bool(true) => 2,
        Value::Number(_) => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Ordering {
    let x = number_value(a).unwrap_or(0.0);
    let y = number_value(b).unwrap_or(0.0);
    // JSON cannot encode NaN, so partial_cmp only fails on malformed input
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

fn compare_arrays(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ordering = collate(x, y);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_objects(a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
    let a_entries = sorted_entries(a);
    let b_entries = sorted_entries(b);

    for ((a_key, a_val), (b_key, b_val)) in a_entries.iter().zip(b_entries.iter()) {
        let ordering = a_key.as_str().cmp(b_key.as_str());
        if ordering != Ordering::Equal {
            return ordering;
        }
        let ordering = collate(a_val, b_val);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a_entries.len().cmp(&b_entries.len())
}

/// Entries in key order, independent of the map's own iteration order.
fn sorted_entries(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(x, _), (y, _)| x.as_str().cmp(y.as_str()));
    entries
}
