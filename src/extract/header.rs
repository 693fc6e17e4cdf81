//! Header row detection.
//!
//! Published workbooks carry a variable number of title and blank rows
//! before the actual column headers, and the layout shifts between
//! revisions. Rather than pin a fixed schema, we scan for the first row
//! that looks like a header: at least [`MIN_HEADER_CELLS`] non-empty cells.

use super::Cell;

/// Minimum number of non-empty cells for a row to qualify as the header.
pub const MIN_HEADER_CELLS: usize = 3;

/// Find the index of the header row.
///
/// Returns the index of the first row with at least [`MIN_HEADER_CELLS`]
/// cells that are non-empty after trimming. Falls back to index 0 when no
/// row qualifies, so an empty or degenerate document still extracts (to an
/// empty record set) instead of erroring.
pub fn locate_header(rows: &[Vec<Cell>]) -> usize {
    rows.iter()
        .position(|row| {
            row.iter().filter(|cell| !cell.is_blank()).count() >= MIN_HEADER_CELLS
        })
        .unwrap_or(0)
}
