//! Artifact scanner.
//!
//! Lists the regular files sitting directly in the content root. Nothing
//! below a subdirectory is visited; a symlink counts when its target is a
//! regular file. An entry that cannot be read (including a dangling
//! symlink) is logged and skipped; only an unreadable root fails the scan.

use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

use globset::GlobSet;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::models::Artifact;

pub fn scan_content(config: &Config) -> Result<Vec<Artifact>> {
    let root = config.content_root();
    let meta = std::fs::metadata(root).map_err(|e| VaultError::io("read content root", root, e))?;
    if !meta.is_dir() {
        return Err(VaultError::io(
            "read content root",
            root,
            std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
        ));
    }
    // Fail fast on permissions; walkdir would only report this as an entry error.
    std::fs::read_dir(root).map_err(|e| VaultError::io("read content root", root, e))?;

    let excludes = config.exclude_set()?;
    let mut artifacts = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        // Follows symlinks: a link to a regular file is cataloged, a dangling one is skipped.
        let metadata = match std::fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        if is_excluded(&excludes, entry.path()) {
            tracing::debug!(path = %entry.path().display(), "excluded by glob");
            continue;
        }

        match to_artifact(config, entry.path(), &metadata) {
            Ok(artifact) => artifacts.push(artifact),
            Err(e) => tracing::warn!(error = %e, "skipping artifact"),
        }
    }

    // Sort for deterministic ordering
    artifacts.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    tracing::debug!(count = artifacts.len(), root = %root.display(), "scanned content root");
    Ok(artifacts)
}

fn is_excluded(excludes: &GlobSet, path: &Path) -> bool {
    path.file_name()
        .map(|name| excludes.is_match(Path::new(name)))
        .unwrap_or(false)
}

fn to_artifact(config: &Config, path: &Path, metadata: &Metadata) -> Result<Artifact> {
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let mtime = modified
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    Ok(Artifact {
        relative_path: config.relative_to_root(path)?,
        path: path.to_path_buf(),
        mtime,
    })
}
