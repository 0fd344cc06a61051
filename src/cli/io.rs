//! JSON I/O handling for CLI
//!
//! - Input: a single JSON object via stdin (or --query)
//! - Output: a single JSON object via stdout
//! - Errors: JSON object via stderr, non-zero exit

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Reads a JSON query object from stdin.
pub fn read_query() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::Io("Empty input".to_string()));
    }

    let value: Value = serde_json::from_str(&input)?;
    Ok(value)
}

/// Writes a response object to stdout.
pub fn write_response(data: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, data)?;
    writeln!(stdout)?;
    Ok(())
}

/// Writes an error object to stderr.
pub fn write_error(error: &CliError) {
    let body = serde_json::json!({
        "status": "error",
        "error": error.to_string(),
    });
    eprintln!("{}", body);
}
