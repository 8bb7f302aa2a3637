//! Index command: print index rows as JSON lines

use super::resolve_department;
use anyhow::Result;
use clap::Args;
use sentinel_store::SnapshotStore;
use std::io::Write;

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Restrict to one department (code or name)
    #[arg(long)]
    pub department: Option<String>,
}

pub fn execute(args: IndexArgs, store: &SnapshotStore) -> Result<()> {
    let department = args.department.as_deref().map(resolve_department);
    let entries = store.get_index_entries(department.as_deref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for entry in &entries {
        writeln!(out, "{}", serde_json::to_string(entry)?)?;
    }
    Ok(())
}
