//! Persisted ledger rows.

use serde::{Deserialize, Serialize};

/// One hashed snapshot within a department's append-only sequence.
///
/// Field order matches the CSV export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub timestamp_utc: String,
    pub hash: String,
    pub previous_hash: Option<String>,
    pub registered_voters: u64,
    pub total_votes: u64,
    pub valid_votes: u64,
    pub null_votes: u64,
    pub blank_votes: u64,
    pub candidates_json: String,
    pub canonical_json: String,
}

/// Cross-department mirror of a chain entry, keyed by
/// (department_code, timestamp_utc).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub department_code: String,
    pub timestamp_utc: String,
    pub table_name: String,
    pub hash: String,
    pub previous_hash: Option<String>,
}
