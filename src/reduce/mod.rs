//! Reduction subsystem for docview
//!
//! Folds sorted view rows through a named reduce function, either once
//! over the whole sequence or once per group of rows whose (projected)
//! keys collate equal.
//!
//! Only native reducers run here. `_count` and `_sum` are built in; hosts
//! may register further reducers by name. Reduce source code is never
//! interpreted.

mod grouping;
mod registry;

pub use grouping::{GroupLevel, GroupReducer};
pub use registry::{CountReducer, ReduceRegistry, Reducer, SumReducer, COUNT, SUM};
