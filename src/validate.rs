//! Link validation.
//!
//! Checks that every catalog entry still points at a note and an artifact
//! that exist on disk. Missing files are returned as [`DriftReport`]s, one
//! per missing file, so an entry with both sides gone yields two reports.
//! Nothing is modified: fixing drift is left to the user.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::Result as VaultResult;
use crate::models::{DriftKind, DriftReport};
use crate::sqlite_store::SqliteCatalog;
use crate::store::CatalogStore;

pub async fn validate_catalog(
    config: &Config,
    store: &dyn CatalogStore,
) -> VaultResult<Vec<DriftReport>> {
    store.ensure_schema().await?;

    let entries = store.all_entries().await?;
    let mut reports = Vec::new();

    for entry in &entries {
        let md_path = config.resolve_relative(&entry.md_file);
        if !md_path.exists() {
            reports.push(DriftReport {
                kind: DriftKind::MissingDocument,
                md_file: entry.md_file.clone(),
                content_file: entry.content_file.clone(),
                path: md_path,
            });
        }

        let content_path = config.resolve_relative(&entry.content_file);
        if !content_path.exists() {
            reports.push(DriftReport {
                kind: DriftKind::MissingArtifact,
                md_file: entry.md_file.clone(),
                content_file: entry.content_file.clone(),
                path: content_path,
            });
        }
    }

    tracing::debug!(entries = entries.len(), drift = reports.len(), "validated catalog");
    Ok(reports)
}

/// `vault validate`: print every drift report, or a confirmation when the
/// catalog is consistent. Drift is not a command failure.
pub async fn run_validate(config: &Config, json: bool) -> Result<()> {
    let store = SqliteCatalog::open(config)
        .await
        .with_context(|| format!("opening catalog {}", config.catalog_path().display()))?;
    let reports = validate_catalog(config, &store).await?;
    store.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("All links valid.");
    } else {
        println!("Validation found {} problem(s):", reports.len());
        for report in &reports {
            println!("  - {}", report);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEntry;
    use crate::store::InMemoryCatalog;
    use std::fs;
    use tempfile::TempDir;

    async fn seeded(cfg: &Config, names: &[&str]) -> InMemoryCatalog {
        fs::create_dir_all(cfg.content_root()).unwrap();
        fs::create_dir_all(cfg.notes_root()).unwrap();
        let store = InMemoryCatalog::new();
        for name in names {
            fs::write(cfg.content_root().join(format!("{name}.pdf")), b"x").unwrap();
            fs::write(cfg.notes_root().join(format!("{name}.md")), b"x").unwrap();
            store
                .insert_if_absent(&NewEntry {
                    md_file: format!("notes/{name}.md"),
                    content_file: format!("content/{name}.pdf"),
                    title: None,
                    author: None,
                    tags: Vec::new(),
                    year: None,
                    mtime: 0,
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_consistent_catalog_has_no_drift() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::from_root(tmp.path());
        let store = seeded(&cfg, &["a", "b"]).await;

        assert!(validate_catalog(&cfg, &store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_report_per_missing_file() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::from_root(tmp.path());
        let store = seeded(&cfg, &["a", "b", "c"]).await;

        fs::remove_file(cfg.content_root().join("a.pdf")).unwrap();
        fs::remove_file(cfg.notes_root().join("b.md")).unwrap();
        fs::remove_file(cfg.content_root().join("b.pdf")).unwrap();

        let reports = validate_catalog(&cfg, &store).await.unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].kind, DriftKind::MissingArtifact);
        assert_eq!(reports[0].content_file, "content/a.pdf");
        assert_eq!(reports[1].kind, DriftKind::MissingDocument);
        assert_eq!(reports[1].md_file, "notes/b.md");
        assert_eq!(reports[2].kind, DriftKind::MissingArtifact);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[test]
    fn test_report_display() {
        let report = DriftReport {
            kind: DriftKind::MissingArtifact,
            md_file: "notes/b.md".to_string(),
            content_file: "content/b.pdf".to_string(),
            path: "/vault/content/b.pdf".into(),
        };
        assert_eq!(
            report.to_string(),
            "Missing content file: /vault/content/b.pdf (note notes/b.md)"
        );
    }
}
