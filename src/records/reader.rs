//! JSON-lines readers for the raw input streams.

use std::io::BufRead;

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{Feature, RawResult};

/// Errors reading a JSON-lines input stream.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read input line: {0}")]
    Io(#[from] std::io::Error),

    /// A line that is not valid JSON for the expected record shape.
    #[error("failed to parse json on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses one record per non-empty line. Line numbers in errors are 1-based.
pub(crate) fn read_jsonl<T, R>(reader: R) -> Result<Vec<T>, ReadError>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record =
            serde_json::from_str(&line).map_err(|source| ReadError::Json {
                line: idx + 1,
                source,
            })?;
        records.push(record);
    }
    Ok(records)
}

/// Reads the tokenized feature-window stream.
pub fn read_features<R: BufRead>(reader: R) -> Result<Vec<Feature>, ReadError> {
    read_jsonl(reader)
}

/// Reads the raw model-output stream.
pub fn read_results<R: BufRead>(reader: R) -> Result<Vec<RawResult>, ReadError> {
    read_jsonl(reader)
}
