#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use rusqlite::Connection;
use sentinel_core::{normalize, Snapshot};
use sentinel_store::SnapshotStore;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const T1: &str = "2025-12-01T18:00:00Z";
pub const T2: &str = "2025-12-01T19:00:00Z";
pub const T3: &str = "2025-12-01T20:00:00Z";

/// On-disk store in a fresh temp dir; keep the `TempDir` alive for the test.
pub fn temp_store() -> (TempDir, PathBuf, SnapshotStore) {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("ledger.db");
    let store = SnapshotStore::open(&db_path).expect("open store");
    (dir, db_path, store)
}

/// Second connection to the same database file, for inspection and tampering.
pub fn raw_conn(db_path: &Path) -> Connection {
    Connection::open(db_path).expect("open raw connection")
}

/// Snapshot with only `valid_votes` set.
pub fn snapshot(department: &str, timestamp_utc: &str, valid_votes: u64) -> Snapshot {
    normalize(
        &json!({ "valid_votes": valid_votes }),
        department,
        timestamp_utc,
        2025,
    )
    .expect("normalize")
}

/// Snapshot with every total and a few candidate slots populated.
pub fn full_snapshot(department: &str, timestamp_utc: &str) -> Snapshot {
    normalize(
        &json!({
            "registered_voters": "1,200,000",
            "total_votes": 900,
            "valid_votes": 850,
            "null_votes": 30,
            "blank_votes": "20",
            "candidates": {"1": "400", "2": 300, "3": 150}
        }),
        department,
        timestamp_utc,
        2025,
    )
    .expect("normalize")
}

/// Names of all department partition tables.
pub fn partition_tables(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE 'dept_%' ORDER BY name",
        )
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}
