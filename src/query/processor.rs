//! View query processor
//!
//! Runs the post-map pipeline over one view result. Stages run strictly in
//! order, and any failure stops the pipeline immediately:
//!
//! 1. Reject reverse iteration
//! 2. Resolve the reduce function (before any row is touched)
//! 3. Select the key range (start bound, limit, end bound)
//! 4. Inline documents, if requested
//! 5. Reduce, grouped or ungrouped, if requested
//! 6. Recompute `total_rows`

use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::reduce::{GroupReducer, ReduceRegistry, Reducer};
use crate::storage::DocumentSource;
use crate::view::{QueryResult, ViewError, ViewResult};

use super::inline::DocumentInliner;
use super::options::{QueryParams, ViewQueryOptions};
use super::range::RangeSelector;

/// Applies query options to view results
pub struct ViewQueryProcessor<'a, S: DocumentSource + ?Sized> {
    source: &'a S,
    registry: ReduceRegistry,
}

impl<'a, S: DocumentSource + ?Sized> ViewQueryProcessor<'a, S> {
    /// Creates a processor with the built-in reducers
    pub fn new(source: &'a S) -> Self {
        Self::with_registry(source, ReduceRegistry::builtin())
    }

    /// Creates a processor with a custom reduce registry
    pub fn with_registry(source: &'a S, registry: ReduceRegistry) -> Self {
        Self { source, registry }
    }

    /// Returns the reduce registry
    pub fn registry(&self) -> &ReduceRegistry {
        &self.registry
    }

    /// Parses raw query parameters, then processes the result.
    ///
    /// Parameter errors are reported before any row is touched.
    pub fn process_params(
        &self,
        result: &mut ViewResult,
        params: &QueryParams,
        reduce_function: &str,
    ) -> QueryResult<()> {
        let options = ViewQueryOptions::from_params(params).map_err(|err| {
            log_event_with_fields(Event::QueryRejected, &[("code", err.code())]);
            err
        })?;
        self.process(result, &options, reduce_function)
    }

    /// Applies options to `result` in place.
    ///
    /// An empty `reduce_function` skips the reduce phase. On error `result`
    /// holds whatever the completed stages produced and should not be
    /// treated as a consistent view.
    pub fn process(
        &self,
        result: &mut ViewResult,
        options: &ViewQueryOptions,
        reduce_function: &str,
    ) -> QueryResult<()> {
        let rows_in = result.rows.len().to_string();
        let scope = ObservationScope::with_fields("VIEW_QUERY", &[("rows_in", rows_in.as_str())]);

        match self.run(result, options, reduce_function) {
            Ok(()) => {
                let total_rows = result.total_rows.to_string();
                scope.complete_with_fields(&[("total_rows", total_rows.as_str())]);
                Ok(())
            }
            Err(err) => {
                scope.fail(err.code(), &err.to_string());
                Err(err)
            }
        }
    }

    fn run(
        &self,
        result: &mut ViewResult,
        options: &ViewQueryOptions,
        reduce_function: &str,
    ) -> QueryResult<()> {
        if options.reverse {
            return Err(ViewError::UnsupportedOperation(
                "reverse iteration is not supported".to_string(),
            ));
        }

        let reducer = self.resolve_reducer(options, reduce_function)?;

        let range = RangeSelector::from_options(options).select(&result.rows);
        result.rows.truncate(range.end);
        result.rows.drain(..range.start);
        let (start, end) = (range.start.to_string(), range.end.to_string());
        log_event_with_fields(
            Event::RangeSelected,
            &[("start", start.as_str()), ("end", end.as_str())],
        );

        if options.include_docs {
            result.rows = DocumentInliner::new(self.source).inline(&result.rows)?;
            let rows = result.rows.len().to_string();
            log_event_with_fields(Event::DocumentsInlined, &[("rows", rows.as_str())]);
        }

        if let Some(reducer) = reducer {
            result.rows = GroupReducer::new(reducer, options.group_level).reduce(&result.rows)?;
            let groups = result.rows.len().to_string();
            log_event_with_fields(
                Event::ReduceComplete,
                &[("function", reduce_function), ("groups", groups.as_str())],
            );
        }

        result.total_rows = result.rows.len();
        Ok(())
    }

    fn resolve_reducer(
        &self,
        options: &ViewQueryOptions,
        reduce_function: &str,
    ) -> QueryResult<Option<&dyn Reducer>> {
        if !options.reduce || reduce_function.is_empty() {
            return Ok(None);
        }
        self.registry.resolve(reduce_function).map(Some)
    }
}
