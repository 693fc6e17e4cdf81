//! File-backed snapshot store.
//!
//! Persists the latest record snapshot, a rolling changelog, fetch
//! metadata, and the raw workbook under one data directory:
//!
//! | File | Content |
//! |------|---------|
//! | `current.json` | latest extracted record set |
//! | `changelog.json` | changelog entries, newest first, capped at 500 |
//! | `meta.json` | last hash / check time / source URL |
//! | `current.xlsx` | raw bytes of the latest workbook |
//!
//! Reads degrade gracefully: a missing or unreadable snapshot reads as
//! empty, which the pipeline treats as a first run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::diff::{DiffResult, ModifiedRecord};
use crate::extract::{Record, RecordSet};
use crate::Result;

/// Oldest changelog entries beyond this count are discarded on append.
pub const CHANGELOG_CAP: usize = 500;

/// One historical diff, newest-first in the changelog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub timestamp: DateTime<Utc>,
    pub added_count: usize,
    pub removed_count: usize,
    pub modified_count: usize,
    pub added: Vec<Record>,
    pub removed: Vec<Record>,
    pub modified: Vec<ModifiedRecord>,
}

impl ChangelogEntry {
    /// Freeze a diff into a changelog entry.
    pub fn new(diff: DiffResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            added_count: diff.added.len(),
            removed_count: diff.removed.len(),
            modified_count: diff.modified.len(),
            added: diff.added,
            removed: diff.removed,
            modified: diff.modified,
        }
    }
}

/// Fetch metadata for the cheap no-change check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub last_hash: String,
    pub last_checked: DateTime<Utc>,
    pub last_changed: Option<DateTime<Utc>>,
    pub source_url: String,
    pub entry_count: usize,
}

/// Snapshot store rooted at one data directory.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn current_path(&self) -> PathBuf {
        self.dir.join("current.json")
    }

    fn changelog_path(&self) -> PathBuf {
        self.dir.join("changelog.json")
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join("meta.json")
    }

    fn workbook_path(&self) -> PathBuf {
        self.dir.join("current.xlsx")
    }

    /// Load the latest snapshot. Absent or unreadable reads as empty
    /// (first run).
    pub fn load_current(&self) -> RecordSet {
        read_json(&self.current_path()).unwrap_or_default()
    }

    /// Persist a snapshot as the latest.
    pub fn save_current(&self, records: &[Record]) -> Result<()> {
        write_json(&self.current_path(), &records)
    }

    /// Load the changelog, newest first. Absent or unreadable reads as
    /// empty.
    pub fn load_changelog(&self) -> Vec<ChangelogEntry> {
        read_json(&self.changelog_path()).unwrap_or_default()
    }

    /// Prepend one entry to the changelog, dropping entries beyond
    /// [`CHANGELOG_CAP`].
    pub fn append_changelog(&self, entry: ChangelogEntry) -> Result<()> {
        let mut changelog = self.load_changelog();
        changelog.insert(0, entry);
        changelog.truncate(CHANGELOG_CAP);
        write_json(&self.changelog_path(), &changelog)
    }

    pub fn load_meta(&self) -> Option<Meta> {
        read_json(&self.meta_path())
    }

    pub fn save_meta(&self, meta: &Meta) -> Result<()> {
        write_json(&self.meta_path(), meta)
    }

    /// Keep the raw workbook bytes alongside the parsed snapshot.
    pub fn save_workbook(&self, bytes: &[u8]) -> Result<()> {
        fs::write(self.workbook_path(), bytes)?;
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read store file");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse store file");
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    Ok(())
}
