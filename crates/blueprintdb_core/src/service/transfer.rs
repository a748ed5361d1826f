//! JSON file export and import.
//!
//! # Responsibility
//! - Render a diagram as the downloadable `{nodes, edges}` file.
//! - Parse an uploaded file back into a named diagram.
//!
//! # Invariants
//! - Exported files never contain a timestamp.
//! - Imported files must carry both `nodes` and `edges` arrays.

use crate::model::diagram::Diagram;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

static JSON_EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.json$").expect("valid json extension regex"));

/// Import failure for an uploaded diagram file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// File name does not end in `.json`.
    UnsupportedFileType(String),
    /// Content is not JSON at all.
    InvalidJson(String),
    /// JSON parsed but lacks a required top-level array.
    MissingField(&'static str),
    /// `nodes`/`edges` are present but do not match the diagram shape.
    InvalidDiagram(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFileType(name) => {
                write!(f, "`{name}` is not a JSON diagram file")
            }
            Self::InvalidJson(message) => write!(f, "file is not valid JSON: {message}"),
            Self::MissingField(field) => {
                write!(f, "invalid diagram file: missing `{field}` array")
            }
            Self::InvalidDiagram(message) => write!(f, "invalid diagram file: {message}"),
        }
    }
}

impl Error for ImportError {}

/// Diagram read from an uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDiagram {
    /// File name without its `.json` extension.
    pub name: String,
    pub diagram: Diagram,
}

/// Pretty-printed `{nodes, edges}` JSON with two-space indentation.
pub fn export_json(diagram: &Diagram) -> serde_json::Result<String> {
    serde_json::to_string_pretty(diagram)
}

/// Download file name for a document.
pub fn export_file_name(document_name: &str) -> String {
    format!("{document_name}.json")
}

/// Parses an uploaded diagram file.
///
/// # Errors
/// - `UnsupportedFileType` unless `file_name` ends in `.json` (any case).
/// - `InvalidJson`, `MissingField` or `InvalidDiagram` for bad content.
pub fn import_json(file_name: &str, contents: &str) -> Result<ImportedDiagram, ImportError> {
    if !JSON_EXTENSION_RE.is_match(file_name) {
        return Err(ImportError::UnsupportedFileType(file_name.to_string()));
    }
    let name = JSON_EXTENSION_RE.replace(file_name, "").into_owned();
    if name.trim().is_empty() {
        return Err(ImportError::UnsupportedFileType(file_name.to_string()));
    }

    let value: Value =
        serde_json::from_str(contents).map_err(|err| ImportError::InvalidJson(err.to_string()))?;
    for field in ["nodes", "edges"] {
        if !value.get(field).is_some_and(Value::is_array) {
            return Err(ImportError::MissingField(field));
        }
    }
    let diagram: Diagram = serde_json::from_value(value)
        .map_err(|err| ImportError::InvalidDiagram(err.to_string()))?;

    Ok(ImportedDiagram { name, diagram })
}
