//! Publisher page and workbook retrieval.
//!
//! The sanctions list is published as an XLSX attachment on a ministry
//! web page whose download URL changes with every revision. Fetching is
//! two-step: scrape the page for the current attachment link, then
//! download the workbook itself. A SHA-256 content hash gives the caller
//! a cheap no-change check before any parsing happens.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use url::Url;

use crate::config::MonitorConfig;
use crate::{MonitorError, Result};

/// HTTP client for the publisher site.
pub struct ListClient {
    client: Client,
    page_url: Url,
}

impl ListClient {
    /// Build a client from the monitor configuration.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            // TLS 1.3 via rustls
            .use_rustls_tls()
            // Compression, auto-negotiated via Accept-Encoding
            .brotli(true)
            .gzip(true)
            .deflate(true)
            // Connection reuse between the page fetch and the download
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        let page_url = Url::parse(&config.page_url)?;
        Ok(Self { client, page_url })
    }

    /// Fetch the publisher page and return its HTML.
    pub async fn fetch_page(&self) -> Result<String> {
        debug!(url = %self.page_url, "fetching publisher page");
        let response = self
            .client
            .get(self.page_url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    /// Find the current spreadsheet URL on the publisher page.
    pub async fn locate_spreadsheet(&self) -> Result<String> {
        let html = self.fetch_page().await?;
        find_spreadsheet_url(&html, &self.page_url)
            .ok_or_else(|| MonitorError::LinkNotFound(self.page_url.to_string()))
    }

    /// Download the workbook bytes.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "downloading workbook");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?.to_vec();
        info!(url, bytes = bytes.len(), "workbook downloaded");
        Ok(bytes)
    }
}

/// Scan page HTML for the spreadsheet attachment link.
///
/// First anchor whose href contains `.xlsx` (case-insensitive) wins.
/// Fallback: an anchor whose text mentions both "tabela" and "sankcyj",
/// covering revisions where the ministry links the file by title instead
/// of extension. Relative hrefs are resolved against the page URL.
pub fn find_spreadsheet_url(html: &str, base: &Url) -> Option<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").unwrap();

    for anchor in document.select(&anchors) {
        if let Some(href) = anchor.value().attr("href") {
            if href.to_lowercase().contains(".xlsx") {
                return resolve(base, href);
            }
        }
    }

    for anchor in document.select(&anchors) {
        let text = anchor.text().collect::<String>().to_lowercase();
        if text.contains("tabela") && text.contains("sankcyj") {
            if let Some(href) = anchor.value().attr("href") {
                return resolve(base, href);
            }
        }
    }

    None
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    base.join(href).ok().map(Into::into)
}

/// SHA-256 hex digest of the workbook bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
