//! Structural diff between two record snapshots.
//!
//! Classifies every identity key as added, removed, or modified, with
//! field-level change detail for modified records. Pure function of its
//! two inputs: no IO, no failure states, deterministic output ordering
//! (keys ascending in all three sequences).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extract::Record;

/// Old and new value of one changed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: String,
    pub new: String,
}

/// A record present in both snapshots whose fields differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiedRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// Every field whose value changed; values absent on one side count
    /// as empty strings.
    pub changes: BTreeMap<String, FieldChange>,
}

/// Result of comparing an old snapshot against a new one.
///
/// Computed once per comparison and appended to the changelog as an
/// immutable historical entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Records present only in the new snapshot, key ascending.
    pub added: Vec<Record>,
    /// Records present only in the old snapshot, key ascending.
    pub removed: Vec<Record>,
    /// Records present in both with differing fields, key ascending.
    pub modified: Vec<ModifiedRecord>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Total number of changed records across all three classes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// Compare two snapshots by identity key.
///
/// Duplicate keys within one snapshot are a degenerate case the extractor
/// avoids by construction; when they do occur the last occurrence in input
/// order wins, with a diagnostic log rather than an error. Comparison is
/// exact string equality on field values.
pub fn compute_diff(old: &[Record], new: &[Record]) -> DiffResult {
    let old_map = key_map(old, "old");
    let new_map = key_map(new, "new");

    let old_keys: BTreeSet<&str> = old_map.keys().copied().collect();
    let new_keys: BTreeSet<&str> = new_map.keys().copied().collect();

    let added = new_keys
        .difference(&old_keys)
        .map(|key| new_map[key].clone())
        .collect();

    let removed = old_keys
        .difference(&new_keys)
        .map(|key| old_map[key].clone())
        .collect();

    let mut modified = Vec::new();
    for key in old_keys.intersection(&new_keys) {
        let old_record = old_map[key];
        let new_record = new_map[key];
        if old_record.fields == new_record.fields {
            continue;
        }

        let mut changes = BTreeMap::new();
        let field_names: BTreeSet<&String> = old_record
            .fields
            .keys()
            .chain(new_record.fields.keys())
            .collect();
        for field in field_names {
            let old_value = old_record.fields.get(field).map_or("", String::as_str);
            let new_value = new_record.fields.get(field).map_or("", String::as_str);
            if old_value != new_value {
                changes.insert(
                    field.clone(),
                    FieldChange {
                        old: old_value.to_string(),
                        new: new_value.to_string(),
                    },
                );
            }
        }
        modified.push(ModifiedRecord {
            id: (*key).to_string(),
            changes,
        });
    }

    DiffResult {
        added,
        removed,
        modified,
    }
}

/// Build the identity key → record mapping for one snapshot.
fn key_map<'a>(records: &'a [Record], side: &str) -> HashMap<&'a str, &'a Record> {
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        if record.id.is_empty() {
            continue;
        }
        if map.insert(record.id.as_str(), record).is_some() {
            warn!(key = %record.id, side, "duplicate identity key, keeping last occurrence");
        }
    }
    map
}
