//! CSV export

use crate::errors::{io_error, serialization_error, Result};
use sentinel_core::ChainEntry;
use std::io::Write;

/// Fixed CSV header. Downstream consumers depend on this exact order.
pub const CSV_COLUMNS: [&str; 10] = [
    "timestamp_utc",
    "hash",
    "previous_hash",
    "registered_voters",
    "total_votes",
    "valid_votes",
    "null_votes",
    "blank_votes",
    "candidates_json",
    "canonical_json",
];

/// Write entries as CSV with a header row.
///
/// The header is written even for an empty slice. A missing previous hash is
/// an empty field.
///
/// ## Errors
///
/// - `ExErrorKind::Serialization`: CSV encoding failed
/// - `ExErrorKind::Io`: the writer failed
pub fn write_department_csv<W: Write>(entries: &[ChainEntry], writer: W) -> Result<()> {
    let op = "export_department_csv";

    // Header is explicit: serde-derived headers are only emitted with the first row
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer
        .write_record(CSV_COLUMNS)
        .map_err(|e| serialization_error(op, e))?;
    for entry in entries {
        csv_writer
            .serialize(entry)
            .map_err(|e| serialization_error(op, e))?;
    }
    csv_writer.flush().map_err(|e| io_error(op, e))?;
    Ok(())
}
