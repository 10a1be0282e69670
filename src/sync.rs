//! Synchronization pass: scan → note → catalog.
//!
//! For each artifact in the content root that the catalog does not know
//! yet, make sure its companion note exists and then insert a catalog row.
//! Running the pass again over an unchanged content root indexes nothing
//! and rewrites no note. Rows are never removed here, even for artifacts
//! that have since disappeared; `vault validate` reports those.
//!
//! The `has_entry` check only saves work. Correctness under overlapping
//! runs comes from [`CatalogStore::insert_if_absent`] and the
//! create-exclusive note write in [`template`](crate::template).

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::Result as VaultResult;
use crate::frontmatter::{self, NoteMeta};
use crate::models::{Artifact, NewEntry, SyncSummary};
use crate::scan::scan_content;
use crate::sqlite_store::SqliteCatalog;
use crate::store::{CatalogStore, InMemoryCatalog};
use crate::template::{default_meta, Materialized, NoteTemplater};

/// Run one synchronization pass against `store`.
pub async fn sync_vault(config: &Config, store: &dyn CatalogStore) -> VaultResult<SyncSummary> {
    store.ensure_schema().await?;

    let artifacts = scan_content(config)?;
    let templater = NoteTemplater::new(config);
    let mut summary = SyncSummary::default();

    for artifact in &artifacts {
        summary.scanned += 1;

        if store.has_entry(&artifact.relative_path).await? {
            summary.already_indexed += 1;
            continue;
        }

        let note = templater.materialize(artifact)?;
        if note.created {
            summary.documents_created += 1;
        }

        let entry = build_entry(artifact, &note);
        if store.insert_if_absent(&entry).await? {
            tracing::info!(artifact = %entry.content_file, note = %entry.md_file, "indexed");
            summary.indexed += 1;
            if !note.created {
                summary.documents_existing += 1;
            }
        } else if store.has_entry(&artifact.relative_path).await? {
            // Another run got there first.
            summary.already_indexed += 1;
        } else {
            tracing::warn!(
                artifact = %entry.content_file,
                note = %entry.md_file,
                "note path already belongs to another catalog entry; artifact left unindexed"
            );
            summary.conflicts += 1;
        }
    }

    Ok(summary)
}

/// Count what a pass would do without writing notes or rows.
///
/// The catalog is only read, so `store` must already hold the schema; an
/// uninitialized vault previews against an empty [`InMemoryCatalog`].
pub async fn preview_sync(config: &Config, store: &dyn CatalogStore) -> VaultResult<SyncSummary> {
    let artifacts = scan_content(config)?;
    let templater = NoteTemplater::new(config);
    let mut summary = SyncSummary::default();

    for artifact in &artifacts {
        summary.scanned += 1;
        if store.has_entry(&artifact.relative_path).await? {
            summary.already_indexed += 1;
            continue;
        }
        if templater.target_path(artifact).exists() {
            summary.documents_existing += 1;
        } else {
            summary.documents_created += 1;
        }
    }

    Ok(summary)
}

/// Build the catalog row for an artifact from its note's front-matter.
///
/// A note that already existed contributes whatever title, author, tags,
/// and year the user gave it. An unreadable block falls back to defaults.
fn build_entry(artifact: &Artifact, note: &Materialized) -> NewEntry {
    let meta = match frontmatter::read_file(&note.path) {
        Ok(Some(meta)) => meta,
        Ok(None) => {
            tracing::debug!(note = %note.relative, "note has no front-matter");
            fallback_meta(artifact)
        }
        Err(e) => {
            tracing::warn!(note = %note.relative, error = %e, "ignoring unreadable front-matter");
            fallback_meta(artifact)
        }
    };

    if let Some(ref back_ref) = meta.content_file {
        if back_ref != &artifact.relative_path {
            tracing::warn!(
                note = %note.relative,
                content_file = %back_ref,
                artifact = %artifact.relative_path,
                "note points at a different artifact"
            );
        }
    }

    NewEntry {
        md_file: note.relative.clone(),
        content_file: artifact.relative_path.clone(),
        title: meta.title,
        author: meta.author,
        tags: meta.tags,
        year: meta.year,
        mtime: artifact.mtime,
    }
}

fn fallback_meta(artifact: &Artifact) -> NoteMeta {
    default_meta(artifact, chrono::Utc::now())
}

/// `vault index`: sync the configured vault and print a summary.
pub async fn run_index(config: &Config, dry_run: bool) -> Result<()> {
    if dry_run {
        return run_preview(config).await;
    }

    let store = SqliteCatalog::open(config)
        .await
        .with_context(|| format!("opening catalog {}", config.catalog_path().display()))?;

    let summary = sync_vault(config, &store)
        .await
        .with_context(|| format!("indexing {}", config.content_root().display()))?;

    println!("index {}", config.content_root().display());
    println!("  scanned: {}", summary.scanned);
    println!("  already indexed: {}", summary.already_indexed);
    println!("  notes created: {}", summary.documents_created);
    println!("  notes existing: {}", summary.documents_existing);
    if summary.conflicts > 0 {
        println!("  note path conflicts: {}", summary.conflicts);
    }
    println!("  indexed: {}", summary.indexed);
    println!("ok");

    store.close().await;
    Ok(())
}

async fn run_preview(config: &Config) -> Result<()> {
    let existing = SqliteCatalog::open_existing(config)
        .await
        .with_context(|| format!("opening catalog {}", config.catalog_path().display()))?;

    let summary = match &existing {
        Some(store) => preview_sync(config, store).await?,
        None => preview_sync(config, &InMemoryCatalog::new()).await?,
    };
    if let Some(store) = existing {
        store.close().await;
    }

    println!("index (dry-run)");
    println!("  scanned: {}", summary.scanned);
    println!("  already indexed: {}", summary.already_indexed);
    println!(
        "  to index: {}",
        summary.documents_created + summary.documents_existing
    );
    println!("  notes to create: {}", summary.documents_created);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(files: &[&str]) -> (TempDir, Config) {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::from_root(tmp.path());
        fs::create_dir_all(cfg.content_root()).unwrap();
        for name in files {
            fs::write(cfg.content_root().join(name), name.as_bytes()).unwrap();
        }
        (tmp, cfg)
    }

    #[tokio::test]
    async fn test_first_pass_indexes_everything() {
        let (_tmp, cfg) = setup(&["a.pdf", "b.pdf"]);
        let store = InMemoryCatalog::new();

        let summary = sync_vault(&cfg, &store).await.unwrap();
        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.indexed, 2);
        assert_eq!(summary.documents_created, 2);

        let entries = store.all_entries().await.unwrap();
        assert_eq!(entries[0].md_file, "notes/a.md");
        assert_eq!(entries[0].content_file, "content/a.pdf");
        assert_eq!(entries[0].title.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_second_pass_is_noop() {
        let (_tmp, cfg) = setup(&["a.pdf", "b.pdf"]);
        let store = InMemoryCatalog::new();
        sync_vault(&cfg, &store).await.unwrap();

        let summary = sync_vault(&cfg, &store).await.unwrap();
        assert_eq!(summary.indexed, 0);
        assert_eq!(summary.already_indexed, 2);
        assert_eq!(summary.documents_created, 0);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_existing_note_metadata_is_cataloged() {
        let (_tmp, cfg) = setup(&["attention.pdf"]);
        fs::create_dir_all(cfg.notes_root()).unwrap();
        fs::write(
            cfg.notes_root().join("attention.md"),
            "---\ntitle: Attention Is All You Need\nauthor: Vaswani\ntags: [nlp]\nyear: 2017\n---\n",
        )
        .unwrap();
        let store = InMemoryCatalog::new();

        let summary = sync_vault(&cfg, &store).await.unwrap();
        assert_eq!(summary.documents_existing, 1);
        assert_eq!(summary.indexed, 1);

        let entry = &store.all_entries().await.unwrap()[0];
        assert_eq!(entry.title.as_deref(), Some("Attention Is All You Need"));
        assert_eq!(entry.author.as_deref(), Some("Vaswani"));
        assert_eq!(entry.tags, vec!["nlp"]);
        assert_eq!(entry.year, Some(2017));
    }

    #[tokio::test]
    async fn test_list_author_keeps_other_fields() {
        let (_tmp, cfg) = setup(&["orwell.pdf"]);
        fs::create_dir_all(cfg.notes_root()).unwrap();
        fs::write(
            cfg.notes_root().join("orwell.md"),
            "---\ntitle: 1984\nauthor: [George Orwell, Editor]\ntags: [dystopia]\nyear: 1949\n---\n",
        )
        .unwrap();
        let store = InMemoryCatalog::new();

        sync_vault(&cfg, &store).await.unwrap();

        let entry = &store.all_entries().await.unwrap()[0];
        assert_eq!(entry.title.as_deref(), Some("1984"));
        assert_eq!(entry.author.as_deref(), Some("George Orwell, Editor"));
        assert_eq!(entry.tags, vec!["dystopia"]);
        assert_eq!(entry.year, Some(1949));
    }

    #[tokio::test]
    async fn test_unparsable_note_falls_back_to_defaults() {
        let (_tmp, cfg) = setup(&["deep_learning_notes.pdf"]);
        fs::create_dir_all(cfg.notes_root()).unwrap();
        let note = cfg.notes_root().join("deep_learning_notes.md");
        fs::write(&note, "---\ntitle: [broken\n---\n").unwrap();
        let store = InMemoryCatalog::new();

        sync_vault(&cfg, &store).await.unwrap();

        let entry = &store.all_entries().await.unwrap()[0];
        assert_eq!(entry.title.as_deref(), Some("Deep Learning Notes"));
        assert_eq!(
            fs::read_to_string(&note).unwrap(),
            "---\ntitle: [broken\n---\n"
        );
    }

    #[tokio::test]
    async fn test_same_stem_conflict_is_absorbed() {
        let (_tmp, cfg) = setup(&["paper.epub", "paper.pdf"]);
        let store = InMemoryCatalog::new();

        let summary = sync_vault(&cfg, &store).await.unwrap();
        assert_eq!(summary.indexed, 1);
        assert_eq!(summary.conflicts, 1);
        assert_eq!(summary.documents_created, 1);
        assert_eq!(summary.documents_existing, 0);

        let entries = store.all_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content_file, "content/paper.epub");
    }

    #[tokio::test]
    async fn test_preview_writes_nothing() {
        let (_tmp, cfg) = setup(&["a.pdf", "b.pdf"]);
        let store = InMemoryCatalog::new();

        let summary = preview_sync(&cfg, &store).await.unwrap();
        assert_eq!(summary.documents_created, 2);
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!cfg.notes_root().exists());
    }

    #[tokio::test]
    async fn test_missing_content_root_fails() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::from_root(tmp.path());
        let store = InMemoryCatalog::new();

        assert!(sync_vault(&cfg, &store).await.is_err());
    }
}
