//! JSON I/O handling for the CLI
//!
//! - Input: one JSON request on stdin
//! - Output: one JSON response line on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    read_request_from(io::stdin().lock())
}

/// Read a JSON request from any reader.
///
/// The request may span several lines; empty input is rejected.
pub fn read_request_from<R: Read>(mut reader: R) -> CliResult<Value> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::invalid_request("Empty input"));
    }

    serde_json::from_str(&input)
        .map_err(|e| CliError::invalid_request(format!("Request is not valid JSON: {}", e)))
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_response_to(&mut io::stdout(), data)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_error_to(&mut io::stdout(), code, message)
}

/// Write a success response to any writer
pub fn write_response_to<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    write_line(writer, &json!({"status": "ok", "data": data}))
}

/// Write an error response to any writer
pub fn write_error_to<W: Write>(writer: &mut W, code: &str, message: &str) -> CliResult<()> {
    write_line(
        writer,
        &json!({"status": "error", "code": code, "message": message}),
    )
}

fn write_line<W: Write>(writer: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
