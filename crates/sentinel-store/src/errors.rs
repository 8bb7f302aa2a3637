//! Error helpers for sentinel-store
//!
//! Builds `ExError` values with store-specific kinds and operation context.

use sentinel_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a failed-write error; the surrounding transaction has been rolled back
pub fn storage_write_failure(op: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::StorageWriteFailure)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// Create a timestamp collision error (reject policy)
pub fn timestamp_collision(
    operation: &str,
    department_code: &str,
    timestamp_utc: &str,
    existing_hash: &str,
    new_hash: &str,
) -> ExError {
    ExError::new(ExErrorKind::TimestampCollision)
        .with_op(operation.to_string())
        .with_entity_id(department_code.to_string())
        .with_message(format!(
            "Timestamp {} already stored with hash {}; refusing to replace with {}",
            timestamp_utc, existing_hash, new_hash
        ))
}

/// Create an out-of-order append error
pub fn out_of_order(department_code: &str, timestamp_utc: &str, head_timestamp: &str) -> ExError {
    ExError::new(ExErrorKind::OutOfOrder)
        .with_op("append_snapshot")
        .with_entity_id(department_code.to_string())
        .with_message(format!(
            "Cannot append {} behind existing entry {}",
            timestamp_utc, head_timestamp
        ))
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an error for a connection lock poisoned by a panicking holder
pub fn lock_poisoned(operation: &str) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op(operation.to_string())
        .with_message("Store connection lock poisoned")
}

/// Create an error for a stored count that does not fit the model
pub fn corrupt_count(column: &str, value: i64) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("read_chain_entry")
        .with_message(format!("Column {} holds negative count {}", column, value))
}
