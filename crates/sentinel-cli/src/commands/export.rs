//! Export command

use super::resolve_department;
use anyhow::Result;
use clap::{Args, ValueEnum};
use sentinel_store::SnapshotStore;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Department code or name
    #[arg(long)]
    pub department: String,

    #[arg(long, value_enum)]
    pub format: ExportFormat,

    /// Destination file (parent directories are created)
    #[arg(long)]
    pub out: PathBuf,
}

pub fn execute(args: ExportArgs, store: &SnapshotStore) -> Result<()> {
    let department = resolve_department(&args.department);
    let count = match args.format {
        ExportFormat::Json => store.export_department_json(&department, &args.out)?,
        ExportFormat::Csv => store.export_department_csv(&department, &args.out)?,
    };

    println!("Exported {} entries to {}", count, args.out.display());
    Ok(())
}
