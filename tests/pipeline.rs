//! End-to-end pipeline tests against the library API.
//!
//! Drives raw rows through extraction, diffs consecutive snapshots, and
//! persists the results through a temp-dir snapshot store — the same
//! path `check` takes, minus the network and the workbook file.

use chrono::Utc;
use sanctwatch::diff::compute_diff;
use sanctwatch::extract::{extract_records, Cell, RecordSet};
use sanctwatch::store::{ChangelogEntry, SnapshotStore};

fn text(s: &str) -> Cell {
    Cell::from(s)
}

/// A plausible revision of the published table: title row, blank row,
/// header, data, footnote.
fn revision(entries: &[(&str, &str, &str)]) -> Vec<Vec<Cell>> {
    let mut rows = vec![
        vec![text("Lista osób i podmiotów objętych sankcjami"), Cell::Null, Cell::Null],
        vec![Cell::Null, Cell::Null, Cell::Null],
        vec![text("Lp."), text("Nazwisko i imię"), text("Uzasadnienie")],
    ];
    for (lp, name, reason) in entries {
        rows.push(vec![text(lp), text(name), text(reason)]);
    }
    rows.push(vec![Cell::Null, text("[1] na podstawie decyzji MSWiA"), Cell::Null]);
    rows
}

#[test]
fn first_fetch_then_update_produces_expected_changelog() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    store.ensure_dir().unwrap();

    // First fetch: two entries, seeded as all-added.
    let first = extract_records(&revision(&[
        ("1", "Jan Kowalski", "decyzja nr 5"),
        ("2", "Anna Nowak", "decyzja nr 9"),
    ]));
    assert_eq!(first.len(), 2);

    let seed = sanctwatch::DiffResult {
        added: first.clone(),
        ..Default::default()
    };
    store
        .append_changelog(ChangelogEntry::new(seed, Utc::now()))
        .unwrap();
    store.save_current(&first).unwrap();

    // Second fetch: one entry dropped, one reworded, one new.
    let second = extract_records(&revision(&[
        ("2", "Anna Nowak", "decyzja nr 9 (zmieniona)"),
        ("3", "Igor Pietrow", "decyzja nr 11"),
    ]));

    let old = store.load_current();
    let diff = compute_diff(&old, &second);
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].id, "3|Igor Pietrow");
    assert_eq!(diff.removed.len(), 1);
    assert_eq!(diff.removed[0].id, "1|Jan Kowalski");
    assert_eq!(diff.modified.len(), 1);
    let change = &diff.modified[0].changes["uzasadnienie"];
    assert_eq!(change.old, "decyzja nr 9");
    assert_eq!(change.new, "decyzja nr 9 (zmieniona)");

    store
        .append_changelog(ChangelogEntry::new(diff, Utc::now()))
        .unwrap();
    store.save_current(&second).unwrap();

    // Newest entry first; counts frozen with the entry.
    let changelog = store.load_changelog();
    assert_eq!(changelog.len(), 2);
    assert_eq!(changelog[0].added_count, 1);
    assert_eq!(changelog[0].removed_count, 1);
    assert_eq!(changelog[0].modified_count, 1);
    assert_eq!(changelog[1].added_count, 2);

    // And the stored snapshot round-trips exactly.
    assert_eq!(store.load_current(), second);
}

#[test]
fn identical_revisions_diff_to_nothing() {
    let rows = revision(&[("1", "Jan Kowalski", "decyzja nr 5")]);
    let a = extract_records(&rows);
    let b = extract_records(&rows);
    assert!(compute_diff(&a, &b).is_empty());
}

#[test]
fn footnote_and_blank_rows_never_become_records() {
    let records = extract_records(&revision(&[("1", "Jan Kowalski", "decyzja nr 5")]));
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| !r.id.starts_with('[')));
}

#[test]
fn snapshot_survives_serialize_deserialize_byte_identically() {
    let records = extract_records(&revision(&[
        ("1", "Jan Kowalski", "decyzja nr 5"),
        ("2", "Anna Nowak", "decyzja nr 9"),
    ]));
    let json = serde_json::to_string_pretty(&records).unwrap();
    let back: RecordSet = serde_json::from_str(&json).unwrap();
    assert_eq!(records, back);
    assert_eq!(json, serde_json::to_string_pretty(&back).unwrap());
}
