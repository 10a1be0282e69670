//! Companion note templating.
//!
//! Every artifact gets one note at `<notes_root>/<stem>.<note_extension>`.
//! A note that already exists is never touched: notes are edited by hand
//! once created, and re-running `vault index` must not clobber them.
//!
//! New notes are written to a temporary file inside the notes root and then
//! linked into place with a create-exclusive persist, so a crash leaves
//! either no note or a complete one, and two concurrent runs cannot both
//! create the same note.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::frontmatter::{self, NoteMeta};
use crate::models::Artifact;

/// Outcome of [`NoteTemplater::materialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub path: PathBuf,
    /// Path relative to the vault root, `/`-separated.
    pub relative: String,
    /// `false` when a note was already present at `path`.
    pub created: bool,
}

pub struct NoteTemplater<'a> {
    config: &'a Config,
}

impl<'a> NoteTemplater<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn target_path(&self, artifact: &Artifact) -> PathBuf {
        self.config.notes_root().join(format!(
            "{}.{}",
            artifact.stem(),
            self.config.vault.note_extension
        ))
    }

    pub fn materialize(&self, artifact: &Artifact) -> Result<Materialized> {
        self.materialize_at(artifact, Utc::now())
    }

    /// Like [`materialize`](Self::materialize) with an explicit creation time.
    pub fn materialize_at(&self, artifact: &Artifact, now: DateTime<Utc>) -> Result<Materialized> {
        let path = self.target_path(artifact);
        let relative = self.config.relative_to_root(&path)?;

        if path.exists() {
            tracing::debug!(note = %relative, "note already exists");
            return Ok(Materialized {
                path,
                relative,
                created: false,
            });
        }

        let notes_root = self.config.notes_root();
        std::fs::create_dir_all(notes_root)
            .map_err(|e| VaultError::io("create notes root", notes_root, e))?;

        let meta = default_meta(artifact, now);
        let title = meta.title.clone().unwrap_or_default();
        let text = frontmatter::render(&meta, &format!("# {}\n\n", title))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".vault-")
            .suffix(".tmp")
            .tempfile_in(notes_root)
            .map_err(|e| VaultError::io("create temp note in", notes_root, e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| VaultError::io("write temp note", tmp.path(), e))?;

        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                tracing::info!(note = %relative, artifact = %artifact.relative_path, "created note");
                Ok(Materialized {
                    path,
                    relative,
                    created: true,
                })
            }
            // Lost a race with another run; its note stands and our temp file is dropped.
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!(note = %relative, "note appeared concurrently");
                Ok(Materialized {
                    path,
                    relative,
                    created: false,
                })
            }
            Err(e) => Err(VaultError::io("write note", &path, e.error)),
        }
    }
}

/// Front-matter for a freshly created note.
pub fn default_meta(artifact: &Artifact, now: DateTime<Utc>) -> NoteMeta {
    NoteMeta {
        title: Some(humanize(&artifact.stem())),
        author: None,
        tags: Vec::new(),
        year: None,
        content_file: Some(artifact.relative_path.clone()),
        created: Some(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}

/// Turn a file stem into a display title: `_` and `-` become spaces and
/// each space-separated word is capitalized (`deep_learning_notes` →
/// `Deep Learning Notes`).
pub fn humanize(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut word_start = true;
    for ch in stem.chars() {
        let ch = if ch == '_' || ch == '-' { ' ' } else { ch };
        if ch.is_whitespace() {
            out.push(ch);
            word_start = true;
        } else if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}
