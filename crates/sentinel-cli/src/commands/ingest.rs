//! Ingest command: normalize a raw snapshot file and store it

use crate::config::SentinelConfig;
use anyhow::{Context, Result};
use clap::Args;
use sentinel_core::{normalize_with, ExError};
use sentinel_store::SnapshotStore;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Department name, e.g. "Atlántida"
    #[arg(long)]
    pub department: String,

    /// Snapshot time, ISO-8601 (e.g. 2025-12-01T18:00:00Z)
    #[arg(long)]
    pub timestamp: String,

    /// Raw snapshot JSON file
    #[arg(long)]
    pub file: PathBuf,

    /// Election year (defaults to the configured year)
    #[arg(long)]
    pub year: Option<u32>,

    /// Hash of the preceding entry; omit for the first entry
    #[arg(long, conflicts_with = "chain")]
    pub previous_hash: Option<String>,

    /// Link to the department's latest stored entry
    #[arg(long)]
    pub chain: bool,
}

pub fn execute(args: IngestArgs, config: &SentinelConfig, store: &SnapshotStore) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let raw: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let snapshot = normalize_with(
        &raw,
        &args.department,
        &args.timestamp,
        &config.normalize_options(args.year),
    )
    .map_err(ExError::from)?;

    let hash = if args.chain {
        store.append_snapshot(&snapshot)?
    } else {
        store.store_snapshot(&snapshot, args.previous_hash.as_deref())?
    };

    tracing::info!(
        department_code = snapshot.department_code(),
        timestamp_utc = snapshot.timestamp_utc(),
        hash = %hash,
        chained = args.chain,
        "Ingested snapshot"
    );
    println!("{}", hash);
    Ok(())
}
