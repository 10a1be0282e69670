//! SQLite connection management.
//!
//! Opens a connection pool on the catalog file with WAL mode enabled, so
//! `vault validate` can read while an `index` run is writing. The database
//! file and its parent directories are created if they don't exist, except
//! through [`connect_existing`], which never creates anything.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, VaultError};

/// Create a connection pool to the configured catalog database.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the
/// database cannot be opened.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = config.catalog_path();

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| VaultError::io("create catalog directory", parent, e))?;
    }

    open_pool(db_path, true).await
}

/// Connect to the catalog only if its file already exists.
///
/// Returns `Ok(None)` instead of creating anything, for commands that must
/// leave an uninitialized vault untouched.
pub async fn connect_existing(config: &Config) -> Result<Option<SqlitePool>> {
    let db_path = config.catalog_path();
    if !db_path.is_file() {
        return Ok(None);
    }
    open_pool(db_path, false).await.map(Some)
}

async fn open_pool(db_path: &Path, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(create)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(10));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!(path = %db_path.display(), "opened catalog");
    Ok(pool)
}
