//! Exporter: read-only formatters over a department's chain.
//!
//! Both formats preserve timestamp order and carry the full hash linkage, so
//! an export alone is enough to re-verify a chain.
//!
//! - JSON: array of `{timestamp_utc, hash, previous_hash, snapshot}` where
//!   `snapshot` is the decoded canonical payload
//! - CSV: one row per entry, columns in [`CSV_COLUMNS`] order; candidate
//!   detail stays embedded in `candidates_json`

mod csv_export;
mod json_export;

pub use csv_export::{write_department_csv, CSV_COLUMNS};
pub use json_export::{write_department_json, JsonExportEntry};

use crate::atomic::atomic_write;
use crate::errors::Result;
use sentinel_core::ChainEntry;
use std::path::Path;

/// Write a department's chain as a JSON file at `destination`.
///
/// ## Errors
///
/// - `ExErrorKind::Serialization`: a stored canonical payload is not valid JSON
/// - `ExErrorKind::Io`: the destination cannot be written
pub fn export_department_json(entries: &[ChainEntry], destination: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    write_department_json(entries, &mut buffer)?;
    atomic_write(destination, &buffer)
}

/// Write a department's chain as a CSV file at `destination`.
///
/// ## Errors
///
/// - `ExErrorKind::Serialization`: CSV encoding failed
/// - `ExErrorKind::Io`: the destination cannot be written
pub fn export_department_csv(entries: &[ChainEntry], destination: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    write_department_csv(entries, &mut buffer)?;
    atomic_write(destination, &buffer)
}
