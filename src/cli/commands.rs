//! CLI command implementations
//!
//! - query: load a view, run one request from stdin, write one response
//! - check-ddoc: validate a design document

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::design::{check_design_doc, DesignDoc};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::query::{QueryParams, ViewQueryProcessor};
use crate::storage::MemoryDocumentStore;
use crate::view::{ViewResult, ViewRow};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request_from, write_error_to, write_response_to};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Precomputed view rows (required)
    pub view_file: String,

    /// Documents by ID, used by `include_docs`
    #[serde(default)]
    pub documents_file: Option<String>,

    /// Design document the view belongs to
    #[serde(default)]
    pub design_doc_file: Option<String>,

    /// View name inside the design document
    #[serde(default)]
    pub view: Option<String>,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory relative file names resolve against
    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.view_file.is_empty() {
            return Err(CliError::config_error("view_file must not be empty"));
        }

        self.severity()?;

        if self.view.is_some() && self.design_doc_file.is_none() {
            return Err(CliError::config_error(
                "view requires design_doc_file to be set",
            ));
        }

        Ok(())
    }

    /// Parsed log severity
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Resolves a configured file name against the config directory
    pub fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// On-disk view file: a bare row array or an object with `rows`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ViewFile {
    Rows(Vec<ViewRow>),
    Result { rows: Vec<ViewRow> },
}

/// A query request read from stdin
#[derive(Debug, Default, Deserialize)]
pub struct ViewRequest {
    /// Raw query parameters
    #[serde(default)]
    pub params: QueryParams,

    /// Reduce function; overrides the design document's
    #[serde(default)]
    pub reduce: Option<String>,
}

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query { config } => query(&config),
        Command::CheckDdoc { file } => check_ddoc(&file),
    }
}

/// Execute one view query
///
/// Reads a single JSON request from stdin and writes a single JSON
/// response to stdout. Failures, config errors included, are written as
/// error responses and also returned, so the process exits non-zero.
pub fn query(config_path: &Path) -> CliResult<()> {
    query_with(config_path, io::stdin().lock(), &mut io::stdout())
}

/// Execute one view query against the given input and output
pub fn query_with<R: Read, W: Write>(
    config_path: &Path,
    input: R,
    output: &mut W,
) -> CliResult<()> {
    match run_query(config_path, input) {
        Ok(result) => write_response_to(output, serde_json::to_value(&result)?),
        Err(e) => {
            write_error_to(output, e.code_str(), e.message())?;
            Err(e)
        }
    }
}

fn run_query<R: Read>(config_path: &Path, input: R) -> CliResult<ViewResult> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let path = config_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);

    let request = read_request_from(input)?;
    execute_query(&config, &request)
}

/// Runs a request against the configured view and documents
pub fn execute_query(config: &Config, request: &Value) -> CliResult<ViewResult> {
    let request: ViewRequest = serde_json::from_value(request.clone())
        .map_err(|e| CliError::invalid_request(format!("Invalid request: {}", e)))?;

    let mut result = load_view(&config.resolve(&config.view_file))?;
    let store = match &config.documents_file {
        Some(file) => load_documents(&config.resolve(file))?,
        None => MemoryDocumentStore::new(),
    };

    let reduce = match request.reduce {
        Some(reduce) => reduce,
        None => design_reduce(config)?.unwrap_or_default(),
    };

    ViewQueryProcessor::new(&store).process_params(&mut result, &request.params, &reduce)?;
    Ok(result)
}

/// Loads view rows and sorts them into collation order
pub fn load_view(path: &Path) -> CliResult<ViewResult> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read view file: {}", e)))?;

    let file: ViewFile = serde_json::from_str(&content)
        .map_err(|e| CliError::io_error(format!("Invalid view file: {}", e)))?;
    let rows = match file {
        ViewFile::Rows(rows) | ViewFile::Result { rows } => rows,
    };

    let result = ViewResult::from_unsorted(rows);
    let count = result.len().to_string();
    log_event_with_fields(Event::ViewLoaded, &[("rows", count.as_str())]);
    Ok(result)
}

/// Loads a JSON object of documents keyed by ID
pub fn load_documents(path: &Path) -> CliResult<MemoryDocumentStore> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read documents file: {}", e)))?;

    let docs: Map<String, Value> = serde_json::from_str(&content).map_err(|e| {
        CliError::io_error(format!("Documents file must be a JSON object: {}", e))
    })?;

    let store = MemoryDocumentStore::from_json_map(&docs);
    let count = store.len().to_string();
    log_event_with_fields(Event::DocumentsLoaded, &[("documents", count.as_str())]);
    Ok(store)
}

/// Loads and validates a design document file
pub fn load_design_doc(path: &Path) -> CliResult<DesignDoc> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read design document: {}", e)))?;
    let value: Value = serde_json::from_str(&content)?;
    Ok(check_design_doc(&value)?)
}

fn design_reduce(config: &Config) -> CliResult<Option<String>> {
    let Some(file) = &config.design_doc_file else {
        return Ok(None);
    };
    let design = load_design_doc(&config.resolve(file))?;

    match &config.view {
        None => Ok(None),
        Some(name) => {
            if design.view(name).is_none() {
                return Err(CliError::config_error(format!(
                    "view '{}' not found in design document",
                    name
                )));
            }
            Ok(design.reduce_function(name).map(str::to_string))
        }
    }
}

/// Validate a design document and print a summary
pub fn check_ddoc(path: &Path) -> CliResult<()> {
    let design = load_design_doc(path)?;

    println!("language: {}", design.language());
    for (name, view) in &design.views {
        match view.reduce.as_deref() {
            Some(reduce) if !reduce.is_empty() => println!("view: {} (reduce: {})", name, reduce),
            _ => println!("view: {}", name),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_json(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn setup(temp_dir: &TempDir, config: Value) -> Config {
        write_json(
            temp_dir,
            "view.json",
            &json!([
                {"key": ["b", 1], "value": 2, "id": "d2"},
                {"key": ["a", 1], "value": 1, "id": "d1"},
                {"key": ["a", 2], "value": 3, "id": "d3"}
            ]),
        );
        write_json(
            temp_dir,
            "docs.json",
            &json!({"d1": {"n": 1}, "d2": {"n": 2}, "d3": {"n": 3}}),
        );
        write_json(
            temp_dir,
            "ddoc.json",
            &json!({"views": {"by_pair": {"map": "function(doc) {}", "reduce": "_sum"}}}),
        );
        let path = write_json(temp_dir, "docview.json", &config);
        Config::load(&path).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup(&temp_dir, json!({"view_file": "view.json"}));

        assert_eq!(config.log_level, "info");
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert_eq!(config.resolve("view.json"), temp_dir.path().join("view.json"));
    }

    #[test]
    fn test_config_rejects_bad_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_json(
            &temp_dir,
            "docview.json",
            &json!({"view_file": "view.json", "log_level": "loud"}),
        );

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_config_view_requires_design_doc() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_json(
            &temp_dir,
            "docview.json",
            &json!({"view_file": "view.json", "view": "by_pair"}),
        );

        let err = Config::load(&path).unwrap_err();
        assert!(err.message().contains("design_doc_file"));
    }

    #[test]
    fn test_load_view_sorts_rows() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup(&temp_dir, json!({"view_file": "view.json"}));

        let result = load_view(&config.resolve("view.json")).unwrap();
        assert!(result.is_sorted());
        assert_eq!(result.rows[0].key, json!(["a", 1]));
        assert_eq!(result.total_rows, 3);
    }

    #[test]
    fn test_load_view_accepts_rows_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_json(
            &temp_dir,
            "wrapped.json",
            &json!({"total_rows": 1, "rows": [{"key": 1, "value": null, "id": "x"}]}),
        );

        let result = load_view(&path).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_execute_query_with_params() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup(
            &temp_dir,
            json!({"view_file": "view.json", "documents_file": "docs.json"}),
        );

        let request = json!({"params": {"startkey": ["a", 2], "include_docs": true}});
        let result = execute_query(&config, &request).unwrap();

        assert_eq!(result.total_rows, 2);
        assert_eq!(result.rows[0].doc, Some(json!({"n": 3})));
        assert_eq!(result.rows[1].key, json!(["b", 1]));
    }

    #[test]
    fn test_execute_query_uses_design_reduce() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup(
            &temp_dir,
            json!({
                "view_file": "view.json",
                "design_doc_file": "ddoc.json",
                "view": "by_pair"
            }),
        );

        let result = execute_query(&config, &json!({"params": {"group_level": 1}})).unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].key, json!(["a"]));
        assert_eq!(result.rows[0].value, json!(4));

        // An explicit reduce in the request wins
        let result = execute_query(&config, &json!({"reduce": "_count"})).unwrap();
        assert_eq!(result.rows[0].value, json!(3));
    }

    #[test]
    fn test_execute_query_unknown_view() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup(
            &temp_dir,
            json!({
                "view_file": "view.json",
                "design_doc_file": "ddoc.json",
                "view": "missing"
            }),
        );

        let err = execute_query(&config, &json!({})).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_execute_query_reports_view_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup(&temp_dir, json!({"view_file": "view.json"}));

        let err = execute_query(&config, &json!({"params": {"reverse": true}})).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::QueryFailed);
        assert!(err.message().contains("VIEW_UNSUPPORTED_OPERATION"));
    }

    #[test]
    fn test_execute_query_rejects_malformed_request() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup(&temp_dir, json!({"view_file": "view.json"}));

        let err = execute_query(&config, &json!({"params": [1, 2]})).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidRequest);
    }

    #[test]
    fn test_query_writes_ok_response() {
        let temp_dir = TempDir::new().unwrap();
        setup(&temp_dir, json!({"view_file": "view.json"}));
        let config_path = temp_dir.path().join("docview.json");

        let mut out = Vec::new();
        let input = r#"{"params": {"limit": 1}}"#;
        query_with(&config_path, input.as_bytes(), &mut out).unwrap();

        let response: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(response["status"], "ok");
        assert_eq!(response["data"]["total_rows"], 1);
    }

    #[test]
    fn test_query_writes_error_for_bad_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_json(
            &temp_dir,
            "docview.json",
            &json!({"view_file": "view.json", "log_level": "loud"}),
        );

        let mut out = Vec::new();
        let err = query_with(&config_path, "{}".as_bytes(), &mut out).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);

        let response: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(response["status"], "error");
        assert_eq!(response["code"], "VIEW_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_query_writes_error_for_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("absent.json");

        let mut out = Vec::new();
        assert!(query_with(&config_path, "{}".as_bytes(), &mut out).is_err());

        let response: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(response["status"], "error");
    }

    #[test]
    fn test_load_design_doc_rejects_language() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_json(
            &temp_dir,
            "ddoc.json",
            &json!({"language": "erlang", "views": {}}),
        );

        let err = load_design_doc(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidDesignDoc);
    }
}
