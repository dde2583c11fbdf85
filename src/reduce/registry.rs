//! Reduce function registry

use std::collections::HashMap;
use std::fmt;

use serde_json::{Number, Value};

use crate::collation::number_value;
use crate::view::{QueryResult, ViewError, ViewRow};

/// Name of the built-in counting reducer
pub const COUNT: &str = "_count";

/// Name of the built-in summing reducer
pub const SUM: &str = "_sum";

/// A fold over a set of view rows producing one summary row
pub trait Reducer: Send + Sync {
    /// Reduce rows to a single row. The caller assigns the output key.
    fn reduce(&self, rows: &[ViewRow]) -> QueryResult<ViewRow>;
}

impl<F> Reducer for F
where
    F: Fn(&[ViewRow]) -> QueryResult<ViewRow> + Send + Sync,
{
    fn reduce(&self, rows: &[ViewRow]) -> QueryResult<ViewRow> {
        self(rows)
    }
}

/// `_count`: number of input rows
#[derive(Debug, Clone, Copy, Default)]
pub struct CountReducer;

impl Reducer for CountReducer {
    fn reduce(&self, rows: &[ViewRow]) -> QueryResult<ViewRow> {
        Ok(ViewRow::reduced(Value::from(rows.len() as u64)))
    }
}

/// `_sum`: numeric sum of input row values.
///
/// Only JSON numbers contribute; any other value fails the fold. The sum
/// stays integral until a fractional addend or an i64 overflow forces a
/// float.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumReducer;

#[derive(Clone, Copy)]
enum Total {
    Int(i64),
    Float(f64),
}

impl Reducer for SumReducer {
    fn reduce(&self, rows: &[ViewRow]) -> QueryResult<ViewRow> {
        let mut total = Total::Int(0);

        for row in rows {
            let addend = number_value(&row.value).ok_or_else(|| {
                ViewError::reduce_failed(
                    SUM,
                    format!("row {:?} has non-numeric value {}", row.id, row.value),
                )
            })?;

            total = match (total, row.value.as_i64()) {
                (Total::Int(acc), Some(i)) => match acc.checked_add(i) {
                    Some(sum) => Total::Int(sum),
                    None => Total::Float(acc as f64 + addend),
                },
                (Total::Int(acc), None) => Total::Float(acc as f64 + addend),
                (Total::Float(acc), _) => Total::Float(acc + addend),
            };
        }

        let value = match total {
            Total::Int(sum) => Value::from(sum),
            Total::Float(sum) => Number::from_f64(sum)
                .map(Value::Number)
                .ok_or_else(|| ViewError::reduce_failed(SUM, "sum is not a finite number"))?,
        };
        Ok(ViewRow::reduced(value))
    }
}

/// Maps reduce function names to reducers.
///
/// Built once and then shared read-only, so one registry can serve
/// concurrent queries.
pub struct ReduceRegistry {
    reducers: HashMap<String, Box<dyn Reducer>>,
}

impl ReduceRegistry {
    /// Creates a registry with no reducers
    pub fn empty() -> Self {
        Self {
            reducers: HashMap::new(),
        }
    }

    /// Creates a registry holding `_count` and `_sum`
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(COUNT, CountReducer);
        registry.register(SUM, SumReducer);
        registry
    }

    /// Registers a reducer, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, reducer: impl Reducer + 'static) {
        self.reducers.insert(name.into(), Box::new(reducer));
    }

    /// Looks up a reducer by name
    pub fn resolve(&self, name: &str) -> QueryResult<&dyn Reducer> {
        self.reducers
            .get(name)
            .map(|reducer| reducer.as_ref())
            .ok_or_else(|| ViewError::UnsupportedReduceFunction(name.to_string()))
    }

    /// Returns true if a reducer is registered under the name
    pub fn contains(&self, name: &str) -> bool {
        self.reducers.contains_key(name)
    }

    /// Returns registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.reducers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ReduceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ReduceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReduceRegistry")
            .field("reducers", &self.names())
            .finish()
    }
}
