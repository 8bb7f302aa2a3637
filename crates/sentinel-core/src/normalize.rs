//! Normalization of raw snapshots.
//!
//! Raw snapshots arrive as loosely-typed JSON objects: counts may be JSON
//! integers or strings with `,` thousands separators, and any field may be
//! missing. Normalization turns that into a fully-typed [`Snapshot`] or fails
//! without returning anything partial.
//!
//! ## Rules
//!
//! - The department name is resolved first; unknown names fail before any
//!   field is read.
//! - Absent (or `null`) totals and candidate slots count as zero.
//! - Present values must parse as non-negative integers; they are never
//!   silently defaulted.
//! - Candidate slots are always `1..=7`; other keys are ignored.

use crate::errors::{Result, SentinelError};
use crate::model::{
    department_code, CandidateResult, Meta, Snapshot, Totals, CANDIDATE_SLOTS, SCOPE_DEPARTMENT,
};
use serde_json::{Map, Value};

/// Largest accepted count; counts are stored as signed 64-bit integers.
const MAX_COUNT: u64 = i64::MAX as u64;

const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Provenance values stamped onto every normalized snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub election: String,
    pub source: String,
    pub year: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            election: "HN-PRESIDENTIAL".to_string(),
            source: "CNE".to_string(),
            year: 2025,
        }
    }
}

/// Normalize a raw snapshot using the default election and source.
///
/// ## Errors
///
/// - `SentinelError::UnknownDepartment`: name not in the department table
/// - `SentinelError::MalformedInput`: a present field is not a non-negative
///   integer, the payload is not an object, or the timestamp is not a
///   whole-second RFC 3339 UTC time
pub fn normalize(
    raw: &Value,
    department_name: &str,
    timestamp_utc: &str,
    year: u32,
) -> Result<Snapshot> {
    let options = NormalizeOptions {
        year,
        ..NormalizeOptions::default()
    };
    normalize_with(raw, department_name, timestamp_utc, &options)
}

/// Normalize a raw snapshot with explicit provenance options.
///
/// ## Errors
///
/// Same as [`normalize`].
pub fn normalize_with(
    raw: &Value,
    department_name: &str,
    timestamp_utc: &str,
    options: &NormalizeOptions,
) -> Result<Snapshot> {
    let code = department_code(department_name)?;
    let timestamp_utc = utc_timestamp(timestamp_utc)?;

    let object = raw
        .as_object()
        .ok_or_else(|| SentinelError::malformed("<root>", raw))?;

    let meta = Meta {
        election: options.election.clone(),
        year: options.year,
        source: options.source.clone(),
        scope: SCOPE_DEPARTMENT.to_string(),
        department_code: code.to_string(),
        timestamp_utc,
    };

    let totals = Totals {
        registered_voters: count_field(object, "registered_voters")?,
        total_votes: count_field(object, "total_votes")?,
        valid_votes: count_field(object, "valid_votes")?,
        null_votes: count_field(object, "null_votes")?,
        blank_votes: count_field(object, "blank_votes")?,
    };

    let raw_candidates = match present(object, "candidates") {
        None => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => return Err(SentinelError::malformed("candidates", other)),
    };

    let mut candidates = Vec::with_capacity(7);
    for slot in CANDIDATE_SLOTS {
        let votes = match raw_candidates {
            Some(map) => {
                let key = slot.to_string();
                match map.get(&key).filter(|v| !v.is_null()) {
                    Some(value) => parse_count(&format!("candidates.{}", key), value)?,
                    None => 0,
                }
            }
            None => 0,
        };
        candidates.push(CandidateResult { slot, votes });
    }

    if let Some(map) = raw_candidates {
        let ignored = map
            .keys()
            .filter(|k| {
                k.parse::<u8>()
                    .map_or(true, |slot| !CANDIDATE_SLOTS.contains(&slot))
            })
            .count();
        if ignored > 0 {
            tracing::debug!(
                department_code = code,
                ignored_keys = ignored,
                "Ignoring candidate keys outside slots 1..7"
            );
        }
    }

    Ok(Snapshot::new(meta, totals, candidates))
}

/// Parse one count value.
///
/// Accepts non-negative JSON integers and strings of digits, optionally
/// grouped with `,` thousands separators (`"12,345"`). Surrounding
/// whitespace in strings is ignored.
///
/// ## Errors
///
/// `SentinelError::MalformedInput` for negatives, fractions, booleans,
/// empty strings, badly grouped digits or values above `i64::MAX`.
pub fn parse_count(field: &str, value: &Value) -> Result<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => parse_count_str(s),
        _ => None,
    };

    parsed
        .filter(|n| *n <= MAX_COUNT)
        .ok_or_else(|| SentinelError::malformed(field, value))
}

fn parse_count_str(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut groups = trimmed.split(',');
    let head = groups.next()?;
    let tail: Vec<&str> = groups.collect();

    let all_digits = |g: &str| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(head) {
        return None;
    }
    if !tail.is_empty() && (head.len() > 3 || tail.iter().any(|g| g.len() != 3 || !all_digits(g)))
    {
        return None;
    }

    let digits: String = trimmed.chars().filter(|c| *c != ',').collect();
    digits.parse::<u64>().ok()
}

fn count_field(object: &Map<String, Value>, field: &str) -> Result<u64> {
    match present(object, field) {
        Some(value) => parse_count(field, value),
        None => Ok(0),
    }
}

fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|v| !v.is_null())
}

/// Rewrite a UTC timestamp into the one stored form, `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Chains are ordered by comparing timestamp strings, which only matches
/// chronological order when every timestamp shares that form. Offsets other
/// than `Z`/`+00:00`, naive times and sub-second precision are rejected.
fn utc_timestamp(timestamp_utc: &str) -> Result<String> {
    let malformed = || SentinelError::malformed("timestamp_utc", timestamp_utc);
    let parsed = chrono::DateTime::parse_from_rfc3339(timestamp_utc).map_err(|_| malformed())?;
    if parsed.offset().local_minus_utc() != 0 || parsed.timestamp_subsec_nanos() != 0 {
        return Err(malformed());
    }
    Ok(parsed
        .with_timezone(&chrono::Utc)
        .format(STORED_TIMESTAMP_FORMAT)
        .to_string())
}
