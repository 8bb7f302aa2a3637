//! Verify command: recompute every hash and link of a department chain

use super::resolve_department;
use anyhow::{bail, Result};
use clap::Args;
use sentinel_store::SnapshotStore;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Department code or name
    #[arg(long)]
    pub department: String,
}

pub fn execute(args: VerifyArgs, store: &SnapshotStore) -> Result<()> {
    let department = resolve_department(&args.department);
    let report = store.verify_department_chain(&department)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(brk) = &report.first_break {
        bail!(
            "chain for department {} is broken at position {} ({})",
            department,
            brk.position,
            brk.timestamp_utc
        );
    }
    Ok(())
}
