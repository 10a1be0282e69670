//! In-memory [`CatalogStore`] for tests and dry runs.
//!
//! Rows live in a `Vec` behind a `std::sync::RwLock`; the uniqueness checks
//! and the push happen under one write lock, which gives the same
//! insert-or-ignore semantics as the SQLite store.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CatalogEntry, NewEntry};

use super::CatalogStore;

pub struct InMemoryCatalog {
    rows: RwLock<Vec<CatalogEntry>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Seed the store with existing rows, e.g. a snapshot of the real catalog.
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            rows: RwLock::new(entries),
        }
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn has_entry(&self, content_file: &str) -> Result<bool> {
        let rows = self.rows.read().unwrap();
        Ok(rows.iter().any(|r| r.content_file == content_file))
    }

    async fn insert_if_absent(&self, entry: &NewEntry) -> Result<bool> {
        let mut rows = self.rows.write().unwrap();
        if rows
            .iter()
            .any(|r| r.content_file == entry.content_file || r.md_file == entry.md_file)
        {
            return Ok(false);
        }

        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        rows.push(CatalogEntry {
            id,
            md_file: entry.md_file.clone(),
            content_file: entry.content_file.clone(),
            title: entry.title.clone(),
            author: entry.author.clone(),
            tags: entry.tags.clone(),
            year: entry.year,
            mtime: entry.mtime,
        });
        Ok(true)
    }

    async fn all_entries(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.rows.read().unwrap().clone())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.rows.read().unwrap().len() as i64)
    }
}
