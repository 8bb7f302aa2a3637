//! Hash chaining and chain verification.
//!
//! `hash(n) = SHA256(previous_hash(n) || canonical_text(n))`, hex-encoded,
//! where the first entry of a chain uses the empty genesis sentinel in place
//! of a previous hash. Changing any byte of an entry, or of any entry before
//! it, changes every hash from that point on.

use crate::model::{CandidateResult, ChainEntry, Totals};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stand-in for the previous hash of the first entry in a chain.
pub const GENESIS_SENTINEL: &str = "";

/// Compute the next chain hash.
///
/// Returns a 64-character lowercase hex SHA-256 digest.
///
/// ```
/// use sentinel_core::hashchain::next_hash;
///
/// let h1 = next_hash(r#"{"a":1}"#, None);
/// let h2 = next_hash(r#"{"a":1}"#, Some(&h1));
/// assert_eq!(h1.len(), 64);
/// assert_ne!(h1, h2);
/// ```
pub fn next_hash(canonical_text: &str, previous_hash: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(previous_hash.unwrap_or(GENESIS_SENTINEL).as_bytes());
    hasher.update(canonical_text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Why a chain failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BreakReason {
    /// Stored hash differs from the hash recomputed over the stored content.
    HashMismatch { expected: String, stored: String },
    /// Stored previous_hash does not point at the preceding entry.
    LinkMismatch {
        expected: Option<String>,
        stored: Option<String>,
    },
    /// A stored column disagrees with the hashed canonical text.
    ColumnMismatch { column: String },
}

/// First point at which a chain stops verifying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainBreak {
    pub position: usize,
    pub timestamp_utc: String,
    #[serde(flatten)]
    pub reason: BreakReason,
}

/// Outcome of verifying a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainVerification {
    pub entries_checked: usize,
    pub first_break: Option<ChainBreak>,
}

impl ChainVerification {
    /// True when every entry verified.
    pub fn is_intact(&self) -> bool {
        self.first_break.is_none()
    }
}

/// Verify a timestamp-ordered chain.
///
/// Each entry's hash is recomputed from its stored canonical text and stored
/// previous hash. The count and candidate columns must then match the totals
/// and candidates inside that canonical text, and the entry must link to the
/// preceding one. The first entry must have no previous hash. Verification stops at the first break;
/// everything at or after it is suspect. An empty chain is intact.
pub fn verify_chain(entries: &[ChainEntry]) -> ChainVerification {
    let mut expected_previous: Option<&str> = None;

    for (position, entry) in entries.iter().enumerate() {
        let recomputed = next_hash(&entry.canonical_json, entry.previous_hash.as_deref());
        if recomputed != entry.hash {
            return broken(
                position,
                entry,
                BreakReason::HashMismatch {
                    expected: recomputed,
                    stored: entry.hash.clone(),
                },
            );
        }

        if let Some(column) = mismatched_column(entry) {
            return broken(
                position,
                entry,
                BreakReason::ColumnMismatch {
                    column: column.to_string(),
                },
            );
        }

        if entry.previous_hash.as_deref() != expected_previous {
            return broken(
                position,
                entry,
                BreakReason::LinkMismatch {
                    expected: expected_previous.map(str::to_string),
                    stored: entry.previous_hash.clone(),
                },
            );
        }

        expected_previous = Some(&entry.hash);
    }

    ChainVerification {
        entries_checked: entries.len(),
        first_break: None,
    }
}

/// The part of the canonical text mirrored into the stored columns.
#[derive(Deserialize)]
struct HashedColumns {
    totals: Totals,
    candidates: Vec<CandidateResult>,
}

fn mismatched_column(entry: &ChainEntry) -> Option<&'static str> {
    let Ok(hashed) = serde_json::from_str::<HashedColumns>(&entry.canonical_json) else {
        return Some("canonical_json");
    };

    let totals = hashed.totals;
    let counts = [
        ("registered_voters", totals.registered_voters, entry.registered_voters),
        ("total_votes", totals.total_votes, entry.total_votes),
        ("valid_votes", totals.valid_votes, entry.valid_votes),
        ("null_votes", totals.null_votes, entry.null_votes),
        ("blank_votes", totals.blank_votes, entry.blank_votes),
    ];
    if let Some((column, _, _)) = counts.iter().find(|(_, expected, stored)| expected != stored) {
        return Some(*column);
    }

    match serde_json::from_str::<Vec<CandidateResult>>(&entry.candidates_json) {
        Ok(stored) if stored == hashed.candidates => None,
        _ => Some("candidates_json"),
    }
}

fn broken(position: usize, entry: &ChainEntry, reason: BreakReason) -> ChainVerification {
    ChainVerification {
        entries_checked: position + 1,
        first_break: Some(ChainBreak {
            position,
            timestamp_utc: entry.timestamp_utc.clone(),
            reason,
        }),
    }
}
