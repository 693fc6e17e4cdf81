//! Row normalization and identity key synthesis.
//!
//! Turns one raw data row plus the normalized header labels into a
//! [`Record`]: a flat field→value map keyed by a stable identity string.
//! The identity key is how a record is tracked across snapshots, so its
//! construction must stay byte-for-byte reproducible — keys already
//! persisted in changelogs depend on it.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Cell, Record};

/// Header label substrings that mark a sequence/number column (Lp., Nr,
/// Numer decyzji, ...). Their values go to the front of the identity key.
const SEQUENCE_TERMS: &[&str] = &["lp", "nr", "numer"];

/// Header label substrings that mark a name column (nazwa, imię,
/// nazwisko, name). Their values are appended to the identity key.
const NAME_TERMS: &[&str] = &["nazwa", "imię", "imie", "nazwisko", "name"];

/// Footnote rows embedded in the table by the publisher start with a
/// bracketed reference number, e.g. `[3] zob. przypis`.
static FOOTNOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\d+\]").expect("footnote pattern is valid"));

/// Normalize the header row into column labels.
///
/// Null cells become empty labels — the column keeps its index for
/// positional alignment but contributes no field. Text labels are
/// lower-cased with internal whitespace runs collapsed to single spaces.
pub fn normalize_header(cells: &[Cell]) -> Vec<String> {
    cells
        .iter()
        .map(|cell| match cell {
            Cell::Null => String::new(),
            Cell::Text(s) => s
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect()
}

/// Normalize one data row into a [`Record`], or `None` if the row is
/// filtered out.
///
/// Discard rules, applied in order:
/// - every cell null or blank after trimming (spacer rows)
/// - first non-empty value starts with a bracketed integer (footnote rows)
/// - the synthesized identity key comes out empty (nothing identifying)
pub fn normalize_row(headers: &[String], row: &[Cell]) -> Option<Record> {
    if row.iter().all(Cell::is_blank) {
        return None;
    }

    let mut record = Record::new();
    for (idx, cell) in row.iter().enumerate() {
        // Columns past the header or under an empty label are dropped.
        let Some(label) = headers.get(idx) else { break };
        if label.is_empty() {
            continue;
        }
        let value = match cell {
            Cell::Null => String::new(),
            Cell::Text(s) => s.trim().to_string(),
        };
        record.fields.insert(label.clone(), value);
    }

    if let Some(first) = record.fields.values().find(|v| !v.is_empty()) {
        if FOOTNOTE_RE.is_match(first) {
            return None;
        }
    }

    record.id = synthesize_id(&record);
    if record.id.is_empty() {
        return None;
    }
    Some(record)
}

/// Build the identity key from a record's fields.
///
/// Labels are visited in lexicographic order. Sequence-like labels insert
/// their value at the front of the key parts, name-like labels append.
/// The front-insertion means that with several sequence columns the
/// lexicographically last one lands at position 0. Odd, but load-bearing:
/// changing it would re-key every record in existing changelogs.
fn synthesize_id(record: &Record) -> String {
    let mut labels: Vec<&String> = record.fields.keys().collect();
    labels.sort_unstable();

    let mut parts: Vec<&str> = Vec::new();
    for label in labels {
        let value = record.fields[label].as_str();
        if SEQUENCE_TERMS.iter().any(|t| label.contains(t)) {
            parts.insert(0, value);
        } else if NAME_TERMS.iter().any(|t| label.contains(t)) {
            parts.push(value);
        }
    }

    if parts.is_empty() {
        // Fallback: the first 3 non-empty values in column order.
        parts = record
            .fields
            .values()
            .filter(|v| !v.is_empty())
            .take(3)
            .map(String::as_str)
            .collect();
    }

    parts.join("|").trim_matches('|').to_string()
}
