//! CLI command implementations.
//!
//! `serve` owns the tokio runtime; the query engine itself is synchronous
//! and the `query` command runs it directly on the calling thread.

use std::net::SocketAddr;
use std::path::Path;

use serde_json::Value;

use crate::observability::Logger;
use crate::query::{execute_advanced_query, parse_advanced_query};
use crate::registry::FieldRegistry;
use crate::rest_api::ApiServer;
use crate::store::JsonSnapshotStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_query, write_error, write_response};

/// Parses arguments and dispatches to the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let result = match cli.command {
        Command::Serve { snapshot, port } => serve(&snapshot, port),
        Command::Query { snapshot, query } => run_query(&snapshot, query),
    };

    if let Err(e) = &result {
        write_error(e);
    }
    result
}

/// Starts the HTTP server over a snapshot file.
fn serve(snapshot: &Path, port: u16) -> CliResult<()> {
    let store = JsonSnapshotStore::new(snapshot);
    let registry = FieldRegistry::with_default_aliases();
    let router = ApiServer::new(store, registry).router();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    Logger::info(
        "SERVER_STARTING",
        &[
            ("addr", &addr.to_string()),
            ("snapshot", &snapshot.display().to_string()),
        ],
    );

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Server(e.to_string()))?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;
        axum::serve(listener, router)
            .await
            .map_err(|e| CliError::Server(e.to_string()))
    })
}

/// Executes one query against a snapshot file and prints the response.
fn run_query(snapshot: &Path, inline: Option<String>) -> CliResult<()> {
    let raw: Value = match inline {
        Some(text) => serde_json::from_str(&text)?,
        None => read_query()?,
    };

    let registry = FieldRegistry::with_default_aliases();
    let plan = parse_advanced_query(&raw, &registry)?;

    let store = JsonSnapshotStore::new(snapshot);
    let response = execute_advanced_query(&plan, &store)?;

    write_response(&response)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn snapshot_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({"plants": [{"Plant ID": "1", "Plant Name": "Vinca"}]})
        )
        .unwrap();
        file
    }

    #[test]
    fn test_run_query_with_inline_query() {
        let file = snapshot_file();
        let inline = json!({"response_format": "ids_only"}).to_string();
        assert!(run_query(file.path(), Some(inline)).is_ok());
    }

    #[test]
    fn test_run_query_rejects_invalid_query() {
        let file = snapshot_file();
        let inline = json!({"limit": 0}).to_string();
        assert!(matches!(
            run_query(file.path(), Some(inline)),
            Err(CliError::Parse(_))
        ));
    }

    #[test]
    fn test_run_query_rejects_non_json_input() {
        let file = snapshot_file();
        assert!(matches!(
            run_query(file.path(), Some("not json".to_string())),
            Err(CliError::Io(_))
        ));
    }
}
