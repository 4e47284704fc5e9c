//! JSON I/O handling for CLI
//!
//! - Input: one JSON value from a file or one line of stdin
//! - Output: one JSON object per command on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON value from `file`, or from one line of stdin
pub fn read_input(file: Option<&Path>) -> CliResult<Value> {
    let text = match file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };

    if text.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input"));
    }

    Ok(serde_json::from_str(&text)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(error: &CliError) -> CliResult<()> {
    write_line(&error_envelope(error))
}

/// Error envelope; `messageId` is present only for errors that carry one
pub fn error_envelope(error: &CliError) -> Value {
    let mut envelope = serde_json::json!({
        "status": "error",
        "code": error.code_str(),
        "message": error.message()
    });
    if let Some(id) = error.message_id() {
        envelope["messageId"] = Value::from(id);
    }
    envelope
}

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
