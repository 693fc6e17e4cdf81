//! `sanctwatch` CLI - check the sanctions list and manage snapshots

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sanctwatch::diff::compute_diff;
use sanctwatch::extract::{extract_records, RecordSet};
use sanctwatch::fetch::{content_hash, ListClient};
use sanctwatch::report::{render_html, render_markdown};
use sanctwatch::sheet::read_workbook;
use sanctwatch::store::{ChangelogEntry, Meta, SnapshotStore};
use sanctwatch::MonitorConfig;

#[derive(Parser)]
#[command(name = "sanctwatch")]
#[command(about = "Sanctions list monitor: fetch, diff, changelog")]
#[command(version)]
struct Cli {
    /// Data directory for snapshots and the changelog
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Publisher page to scrape for the spreadsheet link
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one full check: fetch, parse, diff, update the changelog
    Check {
        /// Also write an HTML notification body next to the changelog
        #[arg(long)]
        html: bool,
    },

    /// Parse a local workbook and print its records as JSON
    Parse {
        /// Path to an .xlsx file
        file: PathBuf,
    },

    /// Diff two snapshot JSON files and print the report
    Diff {
        /// Older snapshot
        old: PathBuf,
        /// Newer snapshot
        new: PathBuf,
    },

    /// Print the most recent changelog entries
    Changelog {
        /// Number of entries to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = MonitorConfig::default();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(url) = cli.url {
        config.page_url = url;
    }

    match cli.command {
        Commands::Check { html } => cmd_check(&config, html).await?,
        Commands::Parse { file } => cmd_parse(&file)?,
        Commands::Diff { old, new } => cmd_diff(&old, &new)?,
        Commands::Changelog { limit } => cmd_changelog(&config, limit),
    }

    Ok(())
}

async fn cmd_check(config: &MonitorConfig, write_html: bool) -> Result<()> {
    let now = Utc::now();
    let store = SnapshotStore::new(&config.data_dir);
    store.ensure_dir()?;

    let client = ListClient::new(config)?;
    let xlsx_url = client.locate_spreadsheet().await?;
    info!(url = %xlsx_url, "found spreadsheet link");

    let bytes = client.download(&xlsx_url).await?;
    let hash = content_hash(&bytes);

    // Cheap no-change exit before any parsing.
    if let Some(mut meta) = store.load_meta() {
        if meta.last_hash == hash {
            println!("No changes detected (same file hash).");
            meta.last_checked = now;
            store.save_meta(&meta)?;
            return Ok(());
        }
        info!("file hash changed, analyzing differences");
    }

    let rows = read_workbook(&bytes)?;
    let new_records = extract_records(&rows);
    println!("Parsed {} entries from new file.", new_records.len());

    let old_records = store.load_current();
    let entry = if old_records.is_empty() {
        // First run: seed the changelog with everything as added.
        println!("First run - no previous snapshot. Initializing.");
        let diff = sanctwatch::DiffResult {
            added: new_records.clone(),
            ..Default::default()
        };
        Some(ChangelogEntry::new(diff, now))
    } else {
        let diff = compute_diff(&old_records, &new_records);
        if diff.is_empty() {
            println!("File hash changed but no structural changes detected.");
            None
        } else {
            println!(
                "Changes: +{} added, -{} removed, ~{} modified",
                diff.added.len(),
                diff.removed.len(),
                diff.modified.len()
            );
            Some(ChangelogEntry::new(diff, now))
        }
    };

    if let Some(entry) = entry {
        println!("\n{}", render_markdown(&entry));
        if write_html {
            let path = store.dir().join("notification.html");
            fs::write(&path, render_html(&entry, &config.page_url))?;
            println!("Notification body written to {}", path.display());
        }
        store.append_changelog(entry)?;
    }

    store.save_workbook(&bytes)?;
    store.save_current(&new_records)?;
    store.save_meta(&Meta {
        last_hash: hash,
        last_checked: now,
        last_changed: Some(now),
        source_url: xlsx_url,
        entry_count: new_records.len(),
    })?;

    Ok(())
}

fn cmd_parse(file: &Path) -> Result<()> {
    let bytes =
        fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let rows = read_workbook(&bytes)?;
    let records = extract_records(&rows);
    println!("{}", serde_json::to_string_pretty(&records)?);
    info!(records = records.len(), "parsed workbook");
    Ok(())
}

fn cmd_diff(old: &Path, new: &Path) -> Result<()> {
    let old_records = load_snapshot(old)?;
    let new_records = load_snapshot(new)?;
    let diff = compute_diff(&old_records, &new_records);

    if diff.is_empty() {
        println!("No differences.");
        return Ok(());
    }
    let entry = ChangelogEntry::new(diff, Utc::now());
    println!("{}", render_markdown(&entry));
    Ok(())
}

fn cmd_changelog(config: &MonitorConfig, limit: usize) {
    let store = SnapshotStore::new(&config.data_dir);
    let changelog = store.load_changelog();
    if changelog.is_empty() {
        println!("Changelog is empty.");
        return;
    }
    for entry in changelog.iter().take(limit) {
        println!("{}", render_markdown(entry));
        println!("---");
    }
}

fn load_snapshot(path: &Path) -> Result<RecordSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    Ok(records)
}
