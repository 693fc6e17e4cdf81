//! XLSX workbook boundary.
//!
//! Converts workbook bytes into the raw row/cell structure the extractor
//! consumes. Every scalar cell value is rendered to text here — the core
//! never sees numbers or dates. Only the first worksheet is read; the
//! published list ships as a single-sheet workbook.

use std::io::Cursor;

use calamine::{DataType, Reader, Xlsx};
use tracing::debug;

use crate::extract::Cell;
use crate::{MonitorError, Result};

/// Parse XLSX bytes into rows of boundary cells.
///
/// A workbook without worksheets yields an empty row list, not an error;
/// a workbook that cannot be opened or read does error.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<Cell>>> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| MonitorError::Workbook(format!("failed to open workbook: {e}")))?;

    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };

    let range = match workbook.worksheet_range(&sheet) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            return Err(MonitorError::Workbook(format!(
                "failed to read sheet {sheet:?}: {e}"
            )))
        }
        None => return Ok(Vec::new()),
    };

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_text).collect())
        .collect();
    debug!(sheet = %sheet, rows = rows.len(), "read workbook");
    Ok(rows)
}

/// Render one calamine cell as a boundary cell.
fn cell_to_text(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Null,
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Float(v) | DataType::DateTime(v) | DataType::Duration(v) => {
            Cell::Text(render_float(*v))
        }
        DataType::Int(v) => Cell::Text(v.to_string()),
        DataType::Bool(b) => Cell::Text(if *b { "true" } else { "false" }.to_string()),
        DataType::Error(e) => Cell::Text(format!("#{e:?}")),
        DataType::DateTimeIso(s) | DataType::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Render a float without a trailing `.0` when it is integral.
///
/// Sequence columns (Lp.) arrive as floats from the workbook; leaking
/// `1.0` into identity keys would re-key the whole list.
fn render_float(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 9e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(render_float(1.0), "1");
        assert_eq!(render_float(42.0), "42");
        assert_eq!(render_float(-3.0), "-3");
    }

    #[test]
    fn fractional_floats_keep_their_fraction() {
        assert_eq!(render_float(1.5), "1.5");
        assert_eq!(render_float(-0.25), "-0.25");
    }

    #[test]
    fn cells_convert_to_text_or_null() {
        assert_eq!(cell_to_text(&DataType::Empty), Cell::Null);
        assert_eq!(
            cell_to_text(&DataType::String("Kowalski".into())),
            Cell::Text("Kowalski".into())
        );
        assert_eq!(cell_to_text(&DataType::Float(7.0)), Cell::Text("7".into()));
        assert_eq!(cell_to_text(&DataType::Int(12)), Cell::Text("12".into()));
        assert_eq!(cell_to_text(&DataType::Bool(true)), Cell::Text("true".into()));
    }

    #[test]
    fn garbage_bytes_are_a_workbook_error() {
        let err = read_workbook(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, MonitorError::Workbook(_)));
    }
}
