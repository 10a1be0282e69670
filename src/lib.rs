//! # Vault Catalog
//!
//! Keeps a directory of immutable source files (PDFs, images, datasets)
//! paired one-to-one with Markdown notes, and records each pairing in a
//! SQLite catalog.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────┐
//! │   Scanner   │──▶│  Templater  │──▶│  SQLite  │
//! │  content/   │   │   notes/    │   │ catalog  │
//! └─────────────┘   └─────────────┘   └────┬─────┘
//!                                          │
//!                                          ▼
//!                                    ┌───────────┐
//!                                    │ Validator │
//!                                    └───────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. The **scanner** ([`scan`]) lists files directly under the content root.
//! 2. The **sync pass** ([`sync`]) skips artifacts already in the catalog.
//! 3. The **templater** ([`template`]) creates a note for each new artifact,
//!    leaving any existing note untouched.
//! 4. A row linking artifact and note is inserted through the
//!    [`store::CatalogStore`] conflict-safe insert.
//! 5. The **validator** ([`validate`]) later reports rows whose files are gone.
//!
//! ## Quick Start
//!
//! ```bash
//! vault init              # create the catalog
//! vault index             # create missing notes and catalog rows
//! vault validate          # report missing notes or content files
//! vault stats             # summary of the catalog
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`models`] | Core data types: `Artifact`, `CatalogEntry`, `DriftReport` |
//! | [`scan`] | Non-recursive content root scanner |
//! | [`frontmatter`] | YAML front-matter reader/writer |
//! | [`template`] | Create-once companion notes |
//! | [`store`] | `CatalogStore` trait and in-memory implementation |
//! | [`sqlite_store`] | SQLite `CatalogStore` |
//! | [`sync`] | Synchronization pass (`vault index`) |
//! | [`validate`] | Drift detection (`vault validate`) |
//! | [`stats`] | Catalog statistics (`vault stats`) |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Idempotent schema creation |
//! | [`error`] | Library error type |

pub mod config;
pub mod db;
pub mod error;
pub mod frontmatter;
pub mod migrate;
pub mod models;
pub mod scan;
pub mod sqlite_store;
pub mod stats;
pub mod store;
pub mod sync;
pub mod template;
pub mod validate;

pub use error::VaultError;
pub use models::{Artifact, CatalogEntry, DriftKind, DriftReport, NewEntry, SyncSummary};
pub use sqlite_store::SqliteCatalog;
pub use store::{CatalogStore, InMemoryCatalog};
