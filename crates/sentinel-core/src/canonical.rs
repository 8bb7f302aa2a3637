//! Canonical text serialization.
//!
//! The canonical text is the only non-hash input to the chain hash, so its
//! byte layout is fixed:
//!
//! ```text
//! {"meta":{..},"totals":{..},"candidates":[{..},..]}
//! ```
//!
//! - Top-level fields appear in the order meta, totals, candidates
//! - Keys inside each object are sorted lexicographically
//! - No whitespace; UTF-8 output
//!
//! Key order comes from the field order of the private `Canonical*` structs
//! below, which must stay alphabetical.

use crate::errors::Result;
use crate::model::{CandidateResult, Snapshot};
use serde::Serialize;

#[derive(Serialize)]
struct CanonicalSnapshot<'a> {
    meta: CanonicalMeta<'a>,
    totals: CanonicalTotals,
    candidates: Vec<CanonicalCandidate>,
}

#[derive(Serialize)]
struct CanonicalMeta<'a> {
    department_code: &'a str,
    election: &'a str,
    scope: &'a str,
    source: &'a str,
    timestamp_utc: &'a str,
    year: u32,
}

#[derive(Serialize)]
struct CanonicalTotals {
    blank_votes: u64,
    null_votes: u64,
    registered_voters: u64,
    total_votes: u64,
    valid_votes: u64,
}

#[derive(Serialize)]
struct CanonicalCandidate {
    slot: u8,
    votes: u64,
}

impl From<&CandidateResult> for CanonicalCandidate {
    fn from(c: &CandidateResult) -> Self {
        Self {
            slot: c.slot,
            votes: c.votes,
        }
    }
}

/// Produce the canonical text of a snapshot.
///
/// Pure and deterministic: equal snapshots always yield identical bytes.
///
/// ## Errors
///
/// Returns `SentinelError::Serialization` if JSON serialization fails.
pub fn to_canonical_text(snapshot: &Snapshot) -> Result<String> {
    let meta = snapshot.meta();
    let totals = snapshot.totals();

    let canonical = CanonicalSnapshot {
        meta: CanonicalMeta {
            department_code: &meta.department_code,
            election: &meta.election,
            scope: &meta.scope,
            source: &meta.source,
            timestamp_utc: &meta.timestamp_utc,
            year: meta.year,
        },
        totals: CanonicalTotals {
            blank_votes: totals.blank_votes,
            null_votes: totals.null_votes,
            registered_voters: totals.registered_voters,
            total_votes: totals.total_votes,
            valid_votes: totals.valid_votes,
        },
        candidates: snapshot.candidates().iter().map(Into::into).collect(),
    };

    Ok(serde_json::to_string(&canonical)?)
}

/// Serialize the candidate list alone (`[{"slot":1,"votes":..},..]`).
///
/// Stored next to the chain entry as a flat blob for CSV consumers.
///
/// ## Errors
///
/// Returns `SentinelError::Serialization` if JSON serialization fails.
pub fn candidates_json(snapshot: &Snapshot) -> Result<String> {
    let candidates: Vec<CanonicalCandidate> =
        snapshot.candidates().iter().map(Into::into).collect();
    Ok(serde_json::to_string(&candidates)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn sample() -> Snapshot {
        let raw = json!({
            "registered_voters": 1000,
            "total_votes": 900,
            "valid_votes": 850,
            "null_votes": 30,
            "blank_votes": 20,
            "candidates": {"1": 400, "2": 300, "3": 150}
        });
        normalize(&raw, "Atlántida", "2025-12-01T18:00:00Z", 2025).unwrap()
    }

    #[test]
    fn test_exact_byte_layout() {
        let text = to_canonical_text(&sample()).unwrap();
        let expected = concat!(
            r#"{"meta":{"department_code":"01","election":"HN-PRESIDENTIAL","scope":"DEPARTMENT","#,
            r#""source":"CNE","timestamp_utc":"2025-12-01T18:00:00Z","year":2025},"#,
            r#""totals":{"blank_votes":20,"null_votes":30,"registered_voters":1000,"#,
            r#""total_votes":900,"valid_votes":850},"#,
            r#""candidates":[{"slot":1,"votes":400},{"slot":2,"votes":300},{"slot":3,"votes":150},"#,
            r#"{"slot":4,"votes":0},{"slot":5,"votes":0},{"slot":6,"votes":0},{"slot":7,"votes":0}]}"#
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_no_whitespace() {
        let text = to_canonical_text(&sample()).unwrap();
        assert!(!text.contains(' '));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_deterministic() {
        let a = to_canonical_text(&sample()).unwrap();
        let b = to_canonical_text(&sample()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_candidates_blob() {
        let blob = candidates_json(&sample()).unwrap();
        assert!(blob.starts_with(r#"[{"slot":1,"votes":400},{"slot":2,"votes":300}"#));
        assert!(blob.ends_with(r#"{"slot":7,"votes":0}]"#));
    }
}
