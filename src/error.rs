//! Error types for the catalog library.
//!
//! Library functions return [`VaultError`]; the `vault` binary wraps these
//! in `anyhow` with command-level context. Uniqueness conflicts in the
//! catalog are not errors and never appear here, and neither does drift,
//! which the validator reports as data.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Debug, Error)]
pub enum VaultError {
    /// Filesystem failure on a specific path (unreadable root, unwritable notes dir, ...).
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog database is unavailable, unwritable, or corrupted.
    #[error("catalog error: {0}")]
    Catalog(#[from] sqlx::Error),

    #[error("invalid front-matter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl VaultError {
    pub(crate) fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        VaultError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}
