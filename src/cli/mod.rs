//! CLI module for docview
//!
//! Provides command-line interface for:
//! - query: One-shot view query execution
//! - check-ddoc: Design document validation

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check_ddoc, execute_query, load_design_doc, load_documents, load_view, query, query_with, run,
    run_command, Config, ViewRequest,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
