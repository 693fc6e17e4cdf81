//! `sanctwatch` - sanctions list monitor
//!
//! Watches the published sanctions list: scrapes the publisher page for
//! the current XLSX attachment, extracts identity-keyed records from it,
//! and diffs them against the previously stored snapshot into a rolling
//! changelog of additions, removals, and field modifications.
//!
//! The extraction and diff core ([`extract`], [`diff`]) is pure and
//! synchronous; fetching ([`fetch`]), workbook parsing ([`sheet`]), and
//! persistence ([`store`]) are the collaborators around it.
//!
//! # Example
//!
//! ```rust
//! use sanctwatch::extract::{extract_records, Cell};
//! use sanctwatch::diff::compute_diff;
//!
//! let rows = vec![
//!     vec![Cell::from("lp"), Cell::from("nazwa")],
//!     vec![Cell::from("1"), Cell::from("Jan Kowalski")],
//! ];
//! let records = extract_records(&rows);
//! assert_eq!(records[0].id, "1|Jan Kowalski");
//!
//! let diff = compute_diff(&[], &records);
//! assert_eq!(diff.added.len(), 1);
//! ```

pub mod config;
pub mod diff;
pub mod extract;
pub mod fetch;
pub mod report;
pub mod sheet;
pub mod store;

use thiserror::Error;

pub use config::MonitorConfig;
pub use diff::{compute_diff, DiffResult, FieldChange, ModifiedRecord};
pub use extract::{extract_records, Cell, Record, RecordSet};
pub use fetch::{content_hash, find_spreadsheet_url, ListClient};
pub use sheet::read_workbook;
pub use store::{ChangelogEntry, Meta, SnapshotStore};

/// Boundary errors. The extraction and diff core never fails; everything
/// here comes from collaborators (network, workbook parsing, storage).
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("no spreadsheet link found on {0}")]
    LinkNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;

/// Version of sanctwatch
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
