//! Record extraction from raw tabular rows.
//!
//! Converts the loosely-structured rows of a published workbook into an
//! ordered set of identity-keyed records:
//!
//! 1. Locate the header row (leading title/blank rows are tolerated)
//! 2. Normalize header labels once
//! 3. Normalize every following row, dropping spacer and footnote rows
//!    and rows with no identifying information
//!
//! Extraction is pure and deterministic: the same rows always produce
//! byte-identical records, which the diff engine and persisted identity
//! keys rely on.

pub mod header;
pub mod normalize;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use header::locate_header;
pub use normalize::{normalize_header, normalize_row};

/// A cell value at the workbook boundary. Everything entering the
/// extractor is already text or null; the core never needs numeric or
/// date semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Null,
    Text(String),
}

impl Cell {
    /// `true` if the cell is null or whitespace-only.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// One flattened row of the sanctions table: field→value pairs in column
/// order, plus the derived identity key.
///
/// Serializes as a flat JSON object with the key under `_id`, matching
/// the snapshot files already on disk. Field insertion order is preserved
/// through serialization; equality ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Derived identity key, stable across snapshots.
    #[serde(rename = "_id")]
    pub id: String,
    /// Normalized field label → trimmed string value.
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            fields: IndexMap::new(),
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered snapshot of records extracted from one document fetch.
pub type RecordSet = Vec<Record>;

/// Extract all records from raw workbook rows.
///
/// Rows before and including the header row never produce records. Rows
/// that fail a discard rule (blank, footnote, empty identity key) are
/// silently dropped; survivors keep their original order.
pub fn extract_records(rows: &[Vec<Cell>]) -> RecordSet {
    if rows.is_empty() {
        return Vec::new();
    }

    let header_idx = locate_header(rows);
    let headers = normalize_header(&rows[header_idx]);
    debug!(header_idx, columns = headers.len(), "located header row");

    let records: RecordSet = rows[header_idx + 1..]
        .iter()
        .filter_map(|row| normalize_row(&headers, row))
        .collect();

    debug!(
        rows = rows.len(),
        records = records.len(),
        "extracted records"
    );
    records
}
