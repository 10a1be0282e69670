//! Configuration parsing and validation.
//!
//! The vault is configured by a TOML file (default `./vault.toml`):
//!
//! ```toml
//! [vault]
//! root = "/home/me/vault"
//! content_root = "content"
//! notes_root = "notes"
//! note_extension = "md"
//! exclude_globs = [".DS_Store"]
//!
//! [db]
//! path = "vault.db"
//! ```
//!
//! `root` is the project root: every path stored in the catalog or written
//! into a note's `content_file` field is relative to it. A relative `root`
//! is resolved against the directory holding the config file; the other
//! paths are resolved against `root`. Both the content root and the notes
//! root must live inside `root`.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

use crate::error::VaultError;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub vault: VaultConfig,
    #[serde(default)]
    pub db: DbConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VaultConfig {
    pub root: PathBuf,
    #[serde(default = "default_content_root")]
    pub content_root: PathBuf,
    #[serde(default = "default_notes_root")]
    pub notes_root: PathBuf,
    #[serde(default = "default_note_extension")]
    pub note_extension: String,
    /// Glob patterns matched against artifact file names; matches are not cataloged.
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_content_root() -> PathBuf {
    PathBuf::from("content")
}
fn default_notes_root() -> PathBuf {
    PathBuf::from("notes")
}
fn default_note_extension() -> String {
    "md".to_string()
}
fn default_db_path() -> PathBuf {
    PathBuf::from("vault.db")
}

impl Config {
    /// Build a configuration with the default layout under `root`:
    /// `content/`, `notes/`, and `vault.db`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            vault: VaultConfig {
                content_root: root.join(default_content_root()),
                notes_root: root.join(default_notes_root()),
                note_extension: default_note_extension(),
                exclude_globs: Vec::new(),
                root: root.clone(),
            },
            db: DbConfig {
                path: root.join(default_db_path()),
            },
        }
    }

    pub fn root(&self) -> &Path {
        &self.vault.root
    }

    pub fn content_root(&self) -> &Path {
        &self.vault.content_root
    }

    pub fn notes_root(&self) -> &Path {
        &self.vault.notes_root
    }

    pub fn catalog_path(&self) -> &Path {
        &self.db.path
    }

    /// Express `path` relative to the project root, with `/` separators.
    ///
    /// This is the form stored in the catalog and in note front-matter.
    pub fn relative_to_root(&self, path: &Path) -> Result<String, VaultError> {
        let relative = path.strip_prefix(&self.vault.root).map_err(|_| {
            VaultError::Config(format!(
                "{} is outside the vault root {}",
                path.display(),
                self.vault.root.display()
            ))
        })?;
        Ok(to_slash(relative))
    }

    /// Resolve a root-relative catalog path back to an absolute path.
    pub fn resolve_relative(&self, relative: &str) -> PathBuf {
        self.vault.root.join(relative)
    }

    pub fn exclude_set(&self) -> Result<GlobSet, VaultError> {
        build_globset(&self.vault.exclude_globs)
    }

    fn resolve_paths(mut self, base: &Path) -> Self {
        if self.vault.root.is_relative() {
            self.vault.root = normalize(&base.join(&self.vault.root));
        }
        let root = self.vault.root.clone();
        self.vault.content_root = normalize(&root.join(&self.vault.content_root));
        self.vault.notes_root = normalize(&root.join(&self.vault.notes_root));
        self.db.path = normalize(&root.join(&self.db.path));
        self
    }

    /// Check the invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<()> {
        let root = &self.vault.root;
        if !self.vault.content_root.starts_with(root) {
            bail!(
                "vault.content_root ({}) must be inside vault.root ({})",
                self.vault.content_root.display(),
                root.display()
            );
        }
        if !self.vault.notes_root.starts_with(root) {
            bail!(
                "vault.notes_root ({}) must be inside vault.root ({})",
                self.vault.notes_root.display(),
                root.display()
            );
        }
        if self.vault.content_root == self.vault.notes_root {
            bail!("vault.content_root and vault.notes_root must be different directories");
        }

        let ext = &self.vault.note_extension;
        if ext.is_empty() || ext.contains(|c: char| matches!(c, '/' | '\\' | '.')) {
            bail!(
                "vault.note_extension must be a bare extension like \"md\", got {:?}",
                ext
            );
        }

        self.exclude_set()
            .with_context(|| "vault.exclude_globs contains an invalid pattern")?;
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let config = config.resolve_paths(&base);

    config.validate()?;
    Ok(config)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, VaultError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| VaultError::Config(format!("bad glob {:?}: {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| VaultError::Config(e.to_string()))
}

/// Lexically drop `.` components and fold `..` so containment checks are
/// not fooled by `root/../elsewhere`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
