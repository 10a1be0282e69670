//! Catalog statistics.
//!
//! A quick, read-only summary of what is indexed: entry counts, how much
//! metadata has been filled in by hand, and a breakdown by artifact type.
//! Used by `vault stats`.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::Result as VaultResult;
use crate::sqlite_store::SqliteCatalog;
use crate::store::CatalogStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub entries: i64,
    pub with_author: i64,
    pub with_year: i64,
    pub with_tags: i64,
    pub oldest_mtime: Option<i64>,
    pub newest_mtime: Option<i64>,
    /// Entry count per lower-cased artifact extension (`""` when there is none).
    pub by_extension: BTreeMap<String, i64>,
}

pub async fn collect_stats(store: &dyn CatalogStore) -> VaultResult<CatalogStats> {
    store.ensure_schema().await?;

    let entries = store.all_entries().await?;
    let mut stats = CatalogStats {
        entries: entries.len() as i64,
        ..Default::default()
    };

    for entry in &entries {
        if entry.author.as_deref().is_some_and(|a| !a.is_empty()) {
            stats.with_author += 1;
        }
        if entry.year.is_some() {
            stats.with_year += 1;
        }
        if !entry.tags.is_empty() {
            stats.with_tags += 1;
        }
        stats.oldest_mtime = Some(stats.oldest_mtime.map_or(entry.mtime, |m| m.min(entry.mtime)));
        stats.newest_mtime = Some(stats.newest_mtime.map_or(entry.mtime, |m| m.max(entry.mtime)));

        *stats
            .by_extension
            .entry(extension_of(&entry.content_file))
            .or_insert(0) += 1;
    }

    Ok(stats)
}

fn extension_of(content_file: &str) -> String {
    let name = content_file.rsplit('/').next().unwrap_or(content_file);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Run the stats command: query the catalog and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let store = SqliteCatalog::open(config)
        .await
        .with_context(|| format!("opening catalog {}", config.catalog_path().display()))?;
    let stats = collect_stats(&store).await?;
    store.close().await;

    let db_size = std::fs::metadata(config.catalog_path())
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Vault Catalog Stats");
    println!("===================");
    println!();
    println!("  Catalog:     {}", config.catalog_path().display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Entries:     {}", stats.entries);
    println!("  With author: {}", stats.with_author);
    println!("  With year:   {}", stats.with_year);
    println!("  With tags:   {}", stats.with_tags);
    if let (Some(oldest), Some(newest)) = (stats.oldest_mtime, stats.newest_mtime) {
        println!(
            "  Modified:    {} .. {}",
            format_ts_iso(oldest),
            format_ts_iso(newest)
        );
    }

    if !stats.by_extension.is_empty() {
        println!();
        println!("  By type:");
        println!("  {:<12} {:>8}", "EXTENSION", "ENTRIES");
        println!("  {}", "-".repeat(21));
        for (ext, count) in &stats.by_extension {
            let label = if ext.is_empty() { "(none)" } else { ext.as_str() };
            println!("  {:<12} {:>8}", label, count);
        }
    }

    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEntry;
    use crate::store::InMemoryCatalog;

    fn entry(name: &str, author: Option<&str>, tags: &[&str], mtime: i64) -> NewEntry {
        NewEntry {
            md_file: format!("notes/{}.md", name),
            content_file: format!("content/{}", name),
            title: None,
            author: author.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            year: None,
            mtime,
        }
    }

    #[tokio::test]
    async fn test_collect_stats() {
        let store = InMemoryCatalog::new();
        store.insert_if_absent(&entry("a.pdf", Some("Knuth"), &["algo"], 300)).await.unwrap();
        store.insert_if_absent(&entry("b.PDF", None, &[], 100)).await.unwrap();
        store.insert_if_absent(&entry("c.csv", Some(""), &[], 200)).await.unwrap();
        store.insert_if_absent(&entry("README", None, &[], 250)).await.unwrap();

        let stats = collect_stats(&store).await.unwrap();
        assert_eq!(stats.entries, 4);
        assert_eq!(stats.with_author, 1);
        assert_eq!(stats.with_tags, 1);
        assert_eq!(stats.oldest_mtime, Some(100));
        assert_eq!(stats.newest_mtime, Some(300));
        assert_eq!(stats.by_extension.get("pdf"), Some(&2));
        assert_eq!(stats.by_extension.get("csv"), Some(&1));
        assert_eq!(stats.by_extension.get(""), Some(&1));
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let stats = collect_stats(&InMemoryCatalog::new()).await.unwrap();
        assert_eq!(stats, CatalogStats::default());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("content/paper.v2.PDF"), "pdf");
        assert_eq!(extension_of("content/.hidden"), "");
        assert_eq!(extension_of("content/Makefile"), "");
    }
}
