//! YAML front-matter for companion notes.
//!
//! A note starts with a metadata block fenced by `---` lines, followed by a
//! free-form Markdown body:
//!
//! ```text
//! ---
//! title: Deep Learning Notes
//! author: null
//! tags: []
//! year: null
//! content_file: content/deep_learning_notes.pdf
//! created: 2024-05-01T09:30:00Z
//! ---
//!
//! # Deep Learning Notes
//! ```
//!
//! Notes are edited by hand after creation, so parsing is lenient: the
//! block is read as plain YAML, unknown keys are ignored, and each known
//! field is extracted independently. Only a block that is not valid YAML
//! at all is an error.

use std::path::Path;

use serde::Serialize;
use serde_yaml::Value;

use crate::error::{Result, VaultError};

const FENCE: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub year: Option<i64>,
    /// Back-reference to the artifact, relative to the vault root.
    pub content_file: Option<String>,
    pub created: Option<String>,
}

impl NoteMeta {
    /// Pull the known fields out of a parsed block, one at a time.
    ///
    /// A field of an unexpected shape degrades on its own instead of
    /// discarding the rest: a list `author` is joined with `", "`, a scalar
    /// `tags` becomes a one-element list, a quoted `year` is parsed.
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: value.get("title").and_then(text),
            author: value.get("author").and_then(text),
            tags: value.get("tags").map(tag_list).unwrap_or_default(),
            year: value.get("year").and_then(year),
            content_file: value.get("content_file").and_then(text),
            created: value.get("created").and_then(text),
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => scalar(other),
    }
}

fn tag_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar).collect(),
        other => scalar(other).into_iter().collect(),
    }
}

fn year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Tagged(tagged) => year(&tagged.value),
        _ => None,
    }
}

/// Serialize `meta` as a front-matter block followed by `body`.
pub fn render(meta: &NoteMeta, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(meta)?;
    Ok(format!("{FENCE}\n{yaml}{FENCE}\n\n{body}"))
}

/// Split a document into its raw front-matter text and body.
///
/// Returns `None` when the document does not open with a fenced block.
pub fn split(text: &str) -> Option<(&str, &str)> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(|c: char| c == '\r' || c == '\n') == FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Parse the metadata block of a document. `Ok(None)` means there is no block.
pub fn parse(text: &str) -> Result<Option<NoteMeta>> {
    match split(text) {
        Some((yaml, _)) if yaml.trim().is_empty() => Ok(Some(NoteMeta::default())),
        Some((yaml, _)) => {
            let value: Value = serde_yaml::from_str(yaml)?;
            Ok(Some(NoteMeta::from_value(&value)))
        }
        None => Ok(None),
    }
}

pub fn read_file(path: &Path) -> Result<Option<NoteMeta>> {
    let text = std::fs::read_to_string(path).map_err(|e| VaultError::io("read note", path, e))?;
    parse(&text)
}
