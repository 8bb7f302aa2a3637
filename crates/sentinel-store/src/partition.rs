//! Department partitions.
//!
//! Each department's chain lives in its own table, `dept_<code>_snapshots`,
//! created on first write together with a timestamp index for range queries.
//! Table names are derived from the department code after stripping every
//! character that is not ASCII alphanumeric, so an externally supplied code
//! can never inject SQL through an identifier.

use rusqlite::{Connection, OptionalExtension};
use sentinel_core::errors::SentinelError;

/// Name of the global cross-department index table.
pub const INDEX_TABLE: &str = "snapshot_index";

/// Derive the partition table name for a department code.
///
/// ```
/// use sentinel_store::partition::department_table_name;
///
/// assert_eq!(department_table_name("01").unwrap(), "dept_01_snapshots");
/// assert_eq!(department_table_name("0;1 --").unwrap(), "dept_01_snapshots");
/// assert!(department_table_name("';--").is_err());
/// ```
///
/// ## Errors
///
/// `SentinelError::InvalidDepartmentCode` when nothing alphanumeric remains.
pub fn department_table_name(department_code: &str) -> Result<String, SentinelError> {
    let sanitized: String = department_code
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if sanitized.is_empty() {
        return Err(SentinelError::InvalidDepartmentCode {
            code: department_code.to_string(),
        });
    }

    Ok(format!("dept_{}_snapshots", sanitized))
}

/// Create the partition table and its timestamp index if missing.
///
/// Runs on the caller's connection or transaction, so a rolled-back write
/// leaves no partition behind.
pub(crate) fn ensure_department_table(conn: &Connection, table_name: &str) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{table}" (
            timestamp_utc TEXT PRIMARY KEY,
            hash TEXT NOT NULL,
            previous_hash TEXT,
            canonical_json TEXT NOT NULL,
            registered_voters INTEGER NOT NULL,
            total_votes INTEGER NOT NULL,
            valid_votes INTEGER NOT NULL,
            null_votes INTEGER NOT NULL,
            blank_votes INTEGER NOT NULL,
            candidates_json TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS "idx_{table}_timestamp" ON "{table}"(timestamp_utc);
        "#,
        table = table_name
    ))
}

/// Whether a partition table has been created.
pub(crate) fn table_exists(conn: &Connection, table_name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table_name],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_strips_non_alphanumeric() {
        assert_eq!(
            department_table_name("1; DROP TABLE x").unwrap(),
            "dept_1DROPTABLEx_snapshots"
        );
        assert_eq!(department_table_name("ñ18").unwrap(), "dept_18_snapshots");
    }

    #[test]
    fn test_empty_code_rejected() {
        assert!(matches!(
            department_table_name(""),
            Err(SentinelError::InvalidDepartmentCode { .. })
        ));
    }

    #[test]
    fn test_ensure_is_idempotent_and_lazy() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!table_exists(&conn, "dept_01_snapshots").unwrap());

        ensure_department_table(&conn, "dept_01_snapshots").unwrap();
        ensure_department_table(&conn, "dept_01_snapshots").unwrap();

        assert!(table_exists(&conn, "dept_01_snapshots").unwrap());
        let index_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_dept_01_snapshots_timestamp'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index_count, 1);
    }
}
