//! Catalog schema.
//!
//! One table, `notes`, with a row per indexed artifact. `md_file` and
//! `content_file` are each `UNIQUE`; the conflict-safe insert in
//! [`sqlite_store`](crate::sqlite_store) relies on both constraints.
//! The schema is additive-only: statements here must stay `IF NOT EXISTS`.

use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::error::Result;

/// Create the catalog table if absent. Idempotent.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY,
            md_file TEXT NOT NULL UNIQUE,
            content_file TEXT NOT NULL UNIQUE,
            title TEXT,
            author TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            year INTEGER,
            mtime INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// `vault init`: open (creating if needed) the catalog and ensure its schema.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    ensure_schema(&pool).await?;
    pool.close().await;
    Ok(())
}
