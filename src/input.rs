
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::CliError;
use crate::types::AudioQuery;

/// Normalized shape of a user-supplied input file.
///
/// Classification is a pure function of the file content: JSON array →
/// `Multi`, any other JSON root → `Single` (schema-checked), not JSON →
/// newline-delimited text.
#[derive(Debug, Clone)]
pub enum InputArtifact {
    Multi(Vec<AudioQuery>),
    Single(AudioQuery),
    TextMulti(Vec<String>),
    TextSingle(String),
}

fn read_input(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| {
        CliError::Validation(format!("failed to read input file {}: {e}", path.display()))
    })
}

fn query_from_value(value: Value) -> Result<AudioQuery, CliError> {
    serde_json::from_value(value)
        .map_err(|e| CliError::Validation(format!("input is not an audio query: {e}")))
}

fn queries_from_items(items: Vec<Value>) -> Result<Vec<AudioQuery>, CliError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                CliError::Validation(format!("input element {index} is not an audio query: {e}"))
            })
        })
        .collect()
}

/// Sniffs the content of `path` and resolves it into one of the four input
/// shapes. JSON is tried first; anything that does not parse as JSON is
/// treated as newline-delimited text with blank lines dropped.
///
/// A text file whose single line happens to parse as JSON (for example a bare
/// number) is taken down the JSON path and rejected there; that ambiguity is
/// the documented cost of content sniffing.
pub fn resolve_input(path: &Path) -> Result<InputArtifact, CliError> {
    let content = read_input(path)?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => Ok(InputArtifact::Multi(queries_from_items(items)?)),
        Ok(value) => Ok(InputArtifact::Single(query_from_value(value)?)),
        Err(_) => {
            let mut lines: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect();

            match lines.len() {
                0 => Err(CliError::Validation("input is empty".to_string())),
                1 => Ok(InputArtifact::TextSingle(lines.remove(0))),
                _ => Ok(InputArtifact::TextMulti(lines)),
            }
        }
    }
}

/// Strict variant used when the caller explicitly requested batch mode: the
/// file must hold a JSON array of audio queries, nothing else. No partial
/// parsing — the first bad element fails the whole file.
pub fn resolve_multi_input(path: &Path) -> Result<Vec<AudioQuery>, CliError> {
    let content = read_input(path)?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => queries_from_items(items),
        _ => Err(CliError::Validation(
            "multi mode requires an array of audio queries".to_string(),
        )),
    }
}
