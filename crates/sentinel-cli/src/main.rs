//! Sentinel CLI
//!
//! Command-line interface for the snapshot ledger

use anyhow::Context;
use clap::{Parser, Subcommand};
use sentinel_core::logging_facility;
use sentinel_store::SnapshotStore;
use std::path::PathBuf;

mod commands;
mod config;

use config::SentinelConfig;

#[derive(Debug, Parser)]
#[command(name = "sentinel")]
#[command(about = "Sentinel - tamper-evident electoral snapshot ledger", long_about = None)]
struct Cli {
    /// Ledger database path (overrides configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Configuration file (defaults to ./sentinel.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize a raw snapshot file and store it
    Ingest(commands::ingest::IngestArgs),
    /// Print index rows as JSON lines
    Index(commands::index::IndexArgs),
    /// Export a department chain as JSON or CSV
    Export(commands::export::ExportArgs),
    /// Recompute and check a department chain
    Verify(commands::verify::VerifyArgs),
    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SentinelConfig::load(cli.config.as_deref())?.with_db_override(cli.db);
    logging_facility::init(config.profile()?);

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let store = SnapshotStore::open(&config.db_path)
        .with_context(|| format!("failed to open ledger at {}", config.db_path.display()))?
        .with_collision_policy(config.collision_policy);

    let result = match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, &config, &store),
        Commands::Index(args) => commands::index::execute(args, &store),
        Commands::Export(args) => commands::export::execute(args, &store),
        Commands::Verify(args) => commands::verify::execute(args, &store),
        Commands::Config => Ok(()),
    };

    // Close even when the command failed; the command's error wins
    let closed = store.close();
    result?;
    closed?;
    Ok(())
}
