//! JSON export

use crate::errors::{io_error, serialization_error, Result};
use sentinel_core::ChainEntry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;

/// One element of the exported JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonExportEntry {
    pub timestamp_utc: String,
    pub hash: String,
    pub previous_hash: Option<String>,
    pub snapshot: Value,
}

impl TryFrom<&ChainEntry> for JsonExportEntry {
    type Error = serde_json::Error;

    fn try_from(entry: &ChainEntry) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            timestamp_utc: entry.timestamp_utc.clone(),
            hash: entry.hash.clone(),
            previous_hash: entry.previous_hash.clone(),
            snapshot: serde_json::from_str(&entry.canonical_json)?,
        })
    }
}

/// Write entries as a pretty-printed JSON array (two-space indent).
///
/// An empty slice writes `[]`.
///
/// ## Errors
///
/// - `ExErrorKind::Serialization`: a stored canonical payload is not valid JSON
/// - `ExErrorKind::Io`: the writer failed
pub fn write_department_json<W: Write>(entries: &[ChainEntry], mut writer: W) -> Result<()> {
    let op = "export_department_json";
    let rows = entries
        .iter()
        .map(JsonExportEntry::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| serialization_error(op, e))?;

    serde_json::to_writer_pretty(&mut writer, &rows).map_err(|e| serialization_error(op, e))?;
    writer.write_all(b"\n").map_err(|e| io_error(op, e))?;
    writer.flush().map_err(|e| io_error(op, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(canonical: &str) -> ChainEntry {
        ChainEntry {
            timestamp_utc: "2025-12-01T18:00:00Z".to_string(),
            hash: "h1".to_string(),
            previous_hash: None,
            registered_voters: 0,
            total_votes: 0,
            valid_votes: 0,
            null_votes: 0,
            blank_votes: 0,
            candidates_json: "[]".to_string(),
            canonical_json: canonical.to_string(),
        }
    }

    #[test]
    fn test_empty_export_is_empty_array() {
        let mut out = Vec::new();
        write_department_json(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
    }

    #[test]
    fn test_snapshot_is_decoded_not_quoted() {
        let mut out = Vec::new();
        write_department_json(&[entry(r#"{"meta":{"scope":"DEPARTMENT"}}"#)], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\n  {\n    \"timestamp_utc\""));
        let parsed: Vec<JsonExportEntry> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0].snapshot["meta"]["scope"], "DEPARTMENT");
        assert_eq!(parsed[0].previous_hash, None);
    }

    #[test]
    fn test_invalid_canonical_payload_rejected() {
        let mut out = Vec::new();
        let err = write_department_json(&[entry("{not json")], &mut out).unwrap_err();
        assert_eq!(err.code(), "ERR_SERIALIZATION");
    }
}
