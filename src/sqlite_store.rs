//! SQLite-backed [`CatalogStore`] implementation.
//!
//! Wraps a [`SqlitePool`] and maps each trait method to a single statement
//! against the `notes` table created by [`migrate`](crate::migrate).

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::migrate;
use crate::models::{CatalogEntry, NewEntry};
use crate::store::CatalogStore;

pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the catalog named in `config`.
    pub async fn open(config: &Config) -> Result<Self> {
        Ok(Self::new(db::connect(config).await?))
    }

    /// Open the catalog for reading without creating the file or its table.
    ///
    /// `Ok(None)` when the vault has not been initialized yet.
    pub async fn open_existing(config: &Config) -> Result<Option<Self>> {
        let Some(pool) = db::connect_existing(config).await? else {
            return Ok(None);
        };
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'notes'",
        )
        .fetch_one(&pool)
        .await?;
        if tables == 0 {
            pool.close().await;
            return Ok(None);
        }
        Ok(Some(Self::new(pool)))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Rows written by older tooling carry `NULL` tags; those read as empty.
fn decode_tags(raw: Option<&str>, content_file: &str) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!(content_file, error = %e, "unreadable tags column");
            Vec::new()
        }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn ensure_schema(&self) -> Result<()> {
        migrate::ensure_schema(&self.pool).await
    }

    async fn has_entry(&self, content_file: &str) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM notes WHERE content_file = ?")
            .bind(content_file)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn insert_if_absent(&self, entry: &NewEntry) -> Result<bool> {
        let tags = serde_json::to_string(&entry.tags).unwrap_or_else(|_| "[]".to_string());

        // No conflict target: DO NOTHING covers both UNIQUE columns.
        let result = sqlx::query(
            r#"
            INSERT INTO notes (md_file, content_file, title, author, tags, year, mtime)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&entry.md_file)
        .bind(&entry.content_file)
        .bind(&entry.title)
        .bind(&entry.author)
        .bind(&tags)
        .bind(entry.year)
        .bind(entry.mtime)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn all_entries(&self) -> Result<Vec<CatalogEntry>> {
        let rows = sqlx::query(
            "SELECT id, md_file, content_file, title, author, tags, year, mtime FROM notes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let content_file: String = row.try_get("content_file")?;
            let tags: Option<String> = row.try_get("tags")?;
            let mtime: Option<i64> = row.try_get("mtime")?;
            entries.push(CatalogEntry {
                id: row.try_get("id")?,
                md_file: row.try_get("md_file")?,
                tags: decode_tags(tags.as_deref(), &content_file),
                content_file,
                title: row.try_get("title")?,
                author: row.try_get("author")?,
                year: row.try_get("year")?,
                mtime: mtime.unwrap_or(0),
            });
        }
        Ok(entries)
    }

    async fn count(&self) -> Result<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
