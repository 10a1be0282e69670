//! Catalog storage abstraction.
//!
//! The [`CatalogStore`] trait is the only path through which the catalog is
//! read or written. Rows are keyed by both the artifact path and the note
//! path, each unique on its own, and are only ever inserted: nothing in the
//! crate updates or deletes an entry.
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`ensure_schema`](CatalogStore::ensure_schema) | Create the table if absent (idempotent) |
//! | [`has_entry`](CatalogStore::has_entry) | Is this artifact already indexed? |
//! | [`insert_if_absent`](CatalogStore::insert_if_absent) | Conflict-safe insert |
//! | [`all_entries`](CatalogStore::all_entries) | Full read for validation |
//! | [`count`](CatalogStore::count) | Number of entries |
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CatalogEntry, NewEntry};

pub use memory::InMemoryCatalog;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Create the catalog schema if it does not exist. Safe on every startup.
    async fn ensure_schema(&self) -> Result<()>;

    /// Whether an entry exists for the artifact at `content_file`.
    async fn has_entry(&self, content_file: &str) -> Result<bool>;

    /// Insert `entry` unless a row already holds its artifact path or its
    /// note path. Returns `true` if a row was written.
    ///
    /// A duplicate is a silent no-op, never an error, so overlapping runs
    /// cannot produce duplicate rows or fail on each other.
    async fn insert_if_absent(&self, entry: &NewEntry) -> Result<bool>;

    /// Every entry, in insertion order.
    async fn all_entries(&self) -> Result<Vec<CatalogEntry>>;

    async fn count(&self) -> Result<i64>;
}
