//! Monitor configuration.
//!
//! One explicit struct, built by the CLI and handed to the fetch and
//! store collaborators at construction time. The extraction and diff
//! core takes no configuration at all.

use std::path::PathBuf;
use std::time::Duration;

/// Publisher page carrying the sanctions list attachment.
pub const DEFAULT_PAGE_URL: &str =
    "https://www.gov.pl/web/mswia/lista-osob-i-podmiotow-objetych-sankcjami";

/// Identifies the monitor to the publisher site.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "sanctwatch/",
    env!("CARGO_PKG_VERSION"),
    " (compliance monitoring tool)"
);

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Page to scrape for the current spreadsheet link.
    pub page_url: String,
    pub user_agent: String,
    /// Directory for snapshot, changelog, and metadata files.
    pub data_dir: PathBuf,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            data_dir: default_data_dir(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Platform data directory, or `./data` when none is available.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("sanctwatch"))
        .unwrap_or_else(|| PathBuf::from("data"))
}
