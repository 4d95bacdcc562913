//! JSON I/O handling for CLI
//!
//! - Input: JSON files named on the command line
//! - Output: single JSON document via stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Read and decode a JSON file
pub fn read_json<V: DeserializeOwned>(path: &Path) -> CliResult<V> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Read an optional JSON file, falling back to the type's default
pub fn read_json_or_default<V: DeserializeOwned + Default>(path: Option<&Path>) -> CliResult<V> {
    match path {
        Some(path) => read_json(path),
        None => Ok(V::default()),
    }
}

/// Write a JSON document to stdout
pub fn write_response<V: Serialize>(data: &V) -> CliResult<()> {
    let mut stdout = io::stdout();
    write_to(&mut stdout, data)
}

fn write_to<W: Write, V: Serialize>(writer: &mut W, data: &V) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *writer, data)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
