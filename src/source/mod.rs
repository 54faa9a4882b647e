//! Loading letters from the spreadsheet endpoint or a local file.
//!
//! Both sources share one document shape:
//!
//! ```json
//! { "letters": [ { "id": "...", "number": 1, "tag": "...", "text": "...", "audio": "..." } ] }
//! ```
//!
//! A failed request answers `{ "error": "..." }` with a non-success status.

pub mod file;
pub mod remote;

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{LetterError, Result};
use crate::model::letter::{derive_id, Letter};

/// Where letters come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterSource {
    /// HTTP(S) endpoint returning the letters document.
    Remote(String),
    /// Local JSON file with the same document shape.
    File(PathBuf),
}

impl LetterSource {
    /// Interpret a user-supplied location: anything with an `http://` or
    /// `https://` scheme is remote, everything else is a file path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Remote(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Human-readable description for logs and the header bar.
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Fetch and decode all letters from `source`.
///
/// An empty list is a valid result ("no entries"), not an error.
pub fn load_letters(source: &LetterSource, timeout: Duration) -> Result<Vec<Letter>> {
    let letters = match source {
        LetterSource::Remote(url) => remote::fetch(url, timeout)?,
        LetterSource::File(path) => file::read(path)?,
    };
    info!(source = %source.describe(), count = letters.len(), "Loaded letters");
    Ok(letters)
}

/// One record as the endpoint sends it. Every field is optional because
/// spreadsheets produce blank cells.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLetter {
    id: Value,
    number: Value,
    tag: Value,
    text: Value,
    audio: Value,
}

/// Decode a response body received with HTTP `status`.
pub fn parse_response(status: u16, body: &str) -> Result<Vec<Letter>> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| "no error message".to_string());
        return Err(LetterError::Status {
            code: status,
            message,
        });
    }
    parse_document(body)
}

/// Decode a letters document (`{ "letters": [...] }`).
pub fn parse_document(body: &str) -> Result<Vec<Letter>> {
    let doc: Value = serde_json::from_str(body)?;

    if let Some(err) = doc.get("error").and_then(Value::as_str) {
        return Err(LetterError::Shape(err.to_string()));
    }

    let records = match doc.get("letters") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(LetterError::Shape(format!(
                "'letters' is {} instead of a list",
                json_kind(other)
            )))
        }
        None => return Err(LetterError::Shape("missing 'letters' field".to_string())),
    };

    let mut letters = Vec::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        let raw: RawLetter = match serde_json::from_value(record.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(position, error = %e, "Skipping malformed letter record");
                continue;
            }
        };
        letters.push(normalize(position, raw));
    }
    Ok(letters)
}

fn normalize(position: usize, raw: RawLetter) -> Letter {
    let tag = cell_text(&raw.tag).trim().to_string();
    let text = cell_text(&raw.text);

    let id = match raw.id {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => derive_id(position, &tag, &text),
    };

    let number = match raw.number {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
    .filter(|&n| n > 0)
    .unwrap_or(position as u32 + 1);

    let audio = Some(cell_text(&raw.audio).trim().to_string()).filter(|a| !a.is_empty());

    Letter {
        id,
        number,
        tag,
        text,
        audio,
    }
}

/// Spreadsheet cells arrive as strings, numbers or nulls.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
