//! Chain entry persistence.
//!
//! Writes one chain entry into its department partition and mirrors it into
//! the global index. Both writes go through the caller's transaction: either
//! both rows land or neither does.

use crate::errors::{storage_write_failure, timestamp_collision, Result};
use crate::partition::{department_table_name, ensure_department_table};
use rusqlite::{OptionalExtension, Transaction};
use sentinel_core::{candidates_json, to_canonical_text, Snapshot};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What happens when a department already holds an entry for a timestamp.
///
/// Re-storing identical content always succeeds and yields the same hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the detail and index rows (idempotent retries; a different
    /// payload silently changes the stored hash, logged at warn).
    #[default]
    Replace,
    /// Fail with `TimestampCollision` unless the hash is unchanged.
    Reject,
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(CollisionPolicy::Replace),
            "reject" => Ok(CollisionPolicy::Reject),
            other => Err(format!("unknown collision policy '{}'", other)),
        }
    }
}

/// Outcome of writing one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// New timestamp for this department.
    Inserted,
    /// Same timestamp, same hash.
    Unchanged,
    /// Same timestamp, different hash; holds the hash that was replaced.
    Replaced { replaced_hash: String },
}

/// Everything about an entry that does not depend on its position in the chain.
#[derive(Debug, Clone)]
pub(crate) struct PreparedEntry<'a> {
    pub snapshot: &'a Snapshot,
    pub table_name: String,
    pub canonical_json: String,
    pub candidates_json: String,
}

impl<'a> PreparedEntry<'a> {
    /// Serialize the snapshot and derive its partition name; touches no storage.
    pub fn new(snapshot: &'a Snapshot) -> Result<Self> {
        Ok(Self {
            snapshot,
            table_name: department_table_name(snapshot.department_code())?,
            canonical_json: to_canonical_text(snapshot)?,
            candidates_json: candidates_json(snapshot)?,
        })
    }
}

/// Upsert the chain entry and its index row inside `tx`.
///
/// Creates the department partition on first use. Does not commit.
///
/// ## Errors
///
/// - `ExErrorKind::StorageWriteFailure`: any SQL failure (caller rolls back)
/// - `ExErrorKind::TimestampCollision`: reject policy and a different hash
pub(crate) fn write_entry(
    op: &str,
    tx: &Transaction<'_>,
    entry: &PreparedEntry<'_>,
    hash: &str,
    previous_hash: Option<&str>,
    policy: CollisionPolicy,
) -> Result<WriteOutcome> {
    let table = entry.table_name.as_str();
    let snapshot = entry.snapshot;
    let timestamp_utc = snapshot.timestamp_utc();

    ensure_department_table(tx, table).map_err(|e| storage_write_failure(op, e))?;

    let existing: Option<String> = tx
        .query_row(
            &format!(r#"SELECT hash FROM "{}" WHERE timestamp_utc = ?1"#, table),
            [timestamp_utc],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| storage_write_failure(op, e))?;

    let outcome = match existing {
        None => WriteOutcome::Inserted,
        Some(existing) if existing == hash => WriteOutcome::Unchanged,
        Some(existing) => {
            if policy == CollisionPolicy::Reject {
                return Err(timestamp_collision(
                    op,
                    snapshot.department_code(),
                    timestamp_utc,
                    &existing,
                    hash,
                ));
            }
            WriteOutcome::Replaced {
                replaced_hash: existing,
            }
        }
    };

    let totals = snapshot.totals();
    tx.execute(
        &format!(
            r#"
            INSERT INTO "{}" (
                timestamp_utc,
                hash,
                previous_hash,
                canonical_json,
                registered_voters,
                total_votes,
                valid_votes,
                null_votes,
                blank_votes,
                candidates_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(timestamp_utc) DO UPDATE SET
                hash = excluded.hash,
                previous_hash = excluded.previous_hash,
                canonical_json = excluded.canonical_json,
                registered_voters = excluded.registered_voters,
                total_votes = excluded.total_votes,
                valid_votes = excluded.valid_votes,
                null_votes = excluded.null_votes,
                blank_votes = excluded.blank_votes,
                candidates_json = excluded.candidates_json
            "#,
            table
        ),
        rusqlite::params![
            timestamp_utc,
            hash,
            previous_hash,
            entry.canonical_json,
            sql_count(totals.registered_voters),
            sql_count(totals.total_votes),
            sql_count(totals.valid_votes),
            sql_count(totals.null_votes),
            sql_count(totals.blank_votes),
            entry.candidates_json,
        ],
    )
    .map_err(|e| storage_write_failure(op, e))?;

    tx.execute(
        r#"
        INSERT INTO snapshot_index (
            department_code,
            timestamp_utc,
            table_name,
            hash,
            previous_hash
        ) VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(department_code, timestamp_utc) DO UPDATE SET
            table_name = excluded.table_name,
            hash = excluded.hash,
            previous_hash = excluded.previous_hash
        "#,
        rusqlite::params![
            snapshot.department_code(),
            timestamp_utc,
            table,
            hash,
            previous_hash
        ],
    )
    .map_err(|e| storage_write_failure(op, e))?;

    tracing::debug!(
        department_code = snapshot.department_code(),
        timestamp_utc,
        table_name = table,
        hash,
        outcome = ?outcome,
        "Wrote chain entry"
    );

    Ok(outcome)
}

/// Counts are capped at `i64::MAX` during normalization.
fn sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
