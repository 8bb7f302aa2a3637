//! Read-only ledger queries.
//!
//! Nothing here creates a partition: reading a department that has never
//! been written yields an empty result, not an empty table. Codes outside the
//! department table read as empty too, so index and detail reads agree.

use crate::errors::{corrupt_count, from_rusqlite, Result};
use crate::partition::{department_table_name, table_exists, INDEX_TABLE};
use rusqlite::{Connection, OptionalExtension, Row};
use sentinel_core::{department_name, ChainEntry, IndexEntry};

/// Timestamp and hash of one chain position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHead {
    pub timestamp_utc: String,
    pub hash: String,
}

/// Index rows ordered by (department_code, timestamp_utc), optionally
/// restricted to one department.
pub fn index_entries(conn: &Connection, department_code: Option<&str>) -> Result<Vec<IndexEntry>> {
    let base = format!(
        "SELECT department_code, timestamp_utc, table_name, hash, previous_hash FROM {}",
        INDEX_TABLE
    );
    let map_row = |row: &Row<'_>| {
        Ok(IndexEntry {
            department_code: row.get(0)?,
            timestamp_utc: row.get(1)?,
            table_name: row.get(2)?,
            hash: row.get(3)?,
            previous_hash: row.get(4)?,
        })
    };

    let rows = match department_code {
        Some(code) => {
            let mut stmt = conn
                .prepare(&format!(
                    "{} WHERE department_code = ?1 ORDER BY timestamp_utc ASC",
                    base
                ))
                .map_err(from_rusqlite)?;
            let rows = stmt
                .query_map([code], map_row)
                .map_err(from_rusqlite)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(from_rusqlite)?;
            rows
        }
        None => {
            let mut stmt = conn
                .prepare(&format!(
                    "{} ORDER BY department_code ASC, timestamp_utc ASC",
                    base
                ))
                .map_err(from_rusqlite)?;
            let rows = stmt
                .query_map([], map_row)
                .map_err(from_rusqlite)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(from_rusqlite)?;
            rows
        }
    };

    Ok(rows)
}

/// Full chain for a department, ascending by timestamp.
pub fn chain_entries(conn: &Connection, department_code: &str) -> Result<Vec<ChainEntry>> {
    // Partition names are sanitized; an exact code match keeps "0;1" off 01's chain
    if department_name(department_code).is_none() {
        return Ok(Vec::new());
    }

    let table = department_table_name(department_code)?;
    if !table_exists(conn, &table).map_err(from_rusqlite)? {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(&format!(
            r#"
            SELECT timestamp_utc, hash, previous_hash,
                   registered_voters, total_votes, valid_votes, null_votes, blank_votes,
                   candidates_json, canonical_json
            FROM "{}"
            ORDER BY timestamp_utc ASC
            "#,
            table
        ))
        .map_err(from_rusqlite)?;

    let raw = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                [
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, i64>(6)?,
                    row.get::<_, i64>(7)?,
                ],
                row.get::<_, String>(8)?,
                row.get::<_, String>(9)?,
            ))
        })
        .map_err(from_rusqlite)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(from_rusqlite)?;

    raw.into_iter()
        .map(
            |(timestamp_utc, hash, previous_hash, counts, candidates_json, canonical_json)| {
                let [registered, total, valid, null, blank] = counts;
                Ok(ChainEntry {
                    timestamp_utc,
                    hash,
                    previous_hash,
                    registered_voters: stored_count("registered_voters", registered)?,
                    total_votes: stored_count("total_votes", total)?,
                    valid_votes: stored_count("valid_votes", valid)?,
                    null_votes: stored_count("null_votes", null)?,
                    blank_votes: stored_count("blank_votes", blank)?,
                    candidates_json,
                    canonical_json,
                })
            },
        )
        .collect()
}

/// Latest entry strictly before `timestamp_utc`.
pub fn latest_before(
    conn: &Connection,
    department_code: &str,
    timestamp_utc: &str,
) -> Result<Option<ChainHead>> {
    conn.query_row(
        &format!(
            "SELECT timestamp_utc, hash FROM {} \
             WHERE department_code = ?1 AND timestamp_utc < ?2 \
             ORDER BY timestamp_utc DESC LIMIT 1",
            INDEX_TABLE
        ),
        [department_code, timestamp_utc],
        head_from_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Latest entry of a department.
pub fn head(conn: &Connection, department_code: &str) -> Result<Option<ChainHead>> {
    conn.query_row(
        &format!(
            "SELECT timestamp_utc, hash FROM {} \
             WHERE department_code = ?1 \
             ORDER BY timestamp_utc DESC LIMIT 1",
            INDEX_TABLE
        ),
        [department_code],
        head_from_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

fn head_from_row(row: &Row<'_>) -> rusqlite::Result<ChainHead> {
    Ok(ChainHead {
        timestamp_utc: row.get(0)?,
        hash: row.get(1)?,
    })
}

fn stored_count(column: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| corrupt_count(column, value))
}
