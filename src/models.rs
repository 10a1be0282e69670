//! Core data models used throughout the catalog.
//!
//! These types describe the artifacts found on disk, the rows persisted in
//! the catalog, and the reports produced by the sync and validate passes.

use serde::Serialize;
use std::path::PathBuf;

/// A source file found directly under the content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the vault root, `/`-separated. This is the identity.
    pub relative_path: String,
    pub path: PathBuf,
    /// Last-modified time, Unix seconds.
    pub mtime: i64,
}

impl Artifact {
    /// File name without its final extension (`paper.v2.pdf` → `paper.v2`).
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// A row about to be written to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub md_file: String,
    pub content_file: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub year: Option<i64>,
    pub mtime: i64,
}

/// A persisted catalog row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub md_file: String,
    pub content_file: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub year: Option<i64>,
    /// Artifact mtime captured when the entry was first indexed.
    pub mtime: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftKind {
    MissingDocument,
    MissingArtifact,
}

/// One missing file referenced by a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    pub kind: DriftKind,
    pub md_file: String,
    pub content_file: String,
    /// The absolute path that was not found.
    pub path: PathBuf,
}

impl std::fmt::Display for DriftReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            DriftKind::MissingDocument => {
                write!(f, "Missing markdown file: {}", self.path.display())
            }
            DriftKind::MissingArtifact => write!(
                f,
                "Missing content file: {} (note {})",
                self.path.display(),
                self.md_file
            ),
        }
    }
}

/// Counters for one synchronization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub scanned: u64,
    pub already_indexed: u64,
    pub documents_created: u64,
    pub documents_existing: u64,
    /// Catalog rows inserted by this pass.
    pub indexed: u64,
    /// Artifacts whose note path is already held by another artifact's entry.
    pub conflicts: u64,
}
