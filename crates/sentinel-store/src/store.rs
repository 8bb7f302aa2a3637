//! SnapshotStore: the owned ledger handle.
//!
//! One SQLite connection, opened once and held behind a mutex for the life
//! of the store. Every write runs in a `BEGIN IMMEDIATE` transaction while
//! the lock is held, so "read the head, hash, write" is one critical section
//! even when the store is shared across threads. Reads run in their own
//! transaction and observe a single committed state.

use crate::db;
use crate::errors::{from_rusqlite, lock_poisoned, out_of_order, storage_write_failure, Result};
use crate::export;
use crate::migrations::apply_migrations;
use crate::snapshot::persist::{write_entry, PreparedEntry};
use crate::snapshot::query;
use crate::snapshot::{CollisionPolicy, WriteOutcome};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use sentinel_core::{
    log_op_end, log_op_error, log_op_start, next_hash, verify_chain, ChainEntry,
    ChainVerification, ExError, IndexEntry, Snapshot,
};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// Persistent, tamper-evident snapshot ledger.
#[derive(Debug)]
pub struct SnapshotStore {
    conn: Mutex<Connection>,
    collision_policy: CollisionPolicy,
}

impl SnapshotStore {
    /// Open (or create) a ledger database at `path`.
    ///
    /// Creates parent directories, enables WAL, and applies index migrations.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::Io`: the parent directory cannot be created
    /// - `ExErrorKind::Persistence`: open, pragma, or migration failure
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = db::open(path)?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        tracing::debug!(db_path = %path.display(), "Opened snapshot store");
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory ledger.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::Persistence`: open or migration failure
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            collision_policy: CollisionPolicy::default(),
        }
    }

    /// Set the policy for re-storing an existing timestamp.
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    /// Release the connection, surfacing any error SQLite reports on close.
    ///
    /// Dropping the store also releases the connection, silently.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::Internal`: the lock was poisoned by a panicking writer
    /// - `ExErrorKind::Persistence`: SQLite refused to close
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| lock_poisoned("close"))?;
        conn.close().map_err(|(_, e)| from_rusqlite(e))
    }

    /// Hash and persist a snapshot, linking it to `previous_hash`.
    ///
    /// The chain entry and its index row are written in one transaction.
    /// The caller is trusted to pass the right predecessor; use
    /// [`append_snapshot`](Self::append_snapshot) to have the store find it.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::InvalidDepartmentCode`: no usable partition name
    /// - `ExErrorKind::StorageWriteFailure`: a write failed; nothing was kept
    /// - `ExErrorKind::TimestampCollision`: reject policy and a different hash
    pub fn store_snapshot(&self, snapshot: &Snapshot, previous_hash: Option<&str>) -> Result<String> {
        let op = "store_snapshot";
        let started = Instant::now();
        log_op_start!(
            op,
            department_code = snapshot.department_code(),
            timestamp_utc = snapshot.timestamp_utc()
        );

        let result = PreparedEntry::new(snapshot).and_then(|prepared| {
            let hash = next_hash(&prepared.canonical_json, previous_hash);
            self.write(op, |tx| {
                let outcome =
                    write_entry(op, tx, &prepared, &hash, previous_hash, self.collision_policy)?;
                Ok((hash, outcome))
            })
        });

        finish(op, started, result.map(|(hash, outcome)| report(snapshot, hash, outcome)))
    }

    /// Hash and persist a snapshot after the department's latest entry.
    ///
    /// The predecessor is looked up inside the write transaction. Re-appending
    /// the current head's timestamp re-links it to the entry before it.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::OutOfOrder`: a later entry already exists
    /// - otherwise as [`store_snapshot`](Self::store_snapshot)
    pub fn append_snapshot(&self, snapshot: &Snapshot) -> Result<String> {
        let op = "append_snapshot";
        let started = Instant::now();
        let code = snapshot.department_code();
        let timestamp_utc = snapshot.timestamp_utc();
        log_op_start!(op, department_code = code, timestamp_utc = timestamp_utc);

        let result = PreparedEntry::new(snapshot).and_then(|prepared| {
            self.write(op, |tx| {
                if let Some(head) = query::head(tx, code)? {
                    if head.timestamp_utc.as_str() > timestamp_utc {
                        return Err(out_of_order(code, timestamp_utc, &head.timestamp_utc));
                    }
                }
                let previous = query::latest_before(tx, code, timestamp_utc)?.map(|h| h.hash);
                let hash = next_hash(&prepared.canonical_json, previous.as_deref());
                let outcome = write_entry(
                    op,
                    tx,
                    &prepared,
                    &hash,
                    previous.as_deref(),
                    self.collision_policy,
                )?;
                Ok((hash, outcome))
            })
        });

        finish(op, started, result.map(|(hash, outcome)| report(snapshot, hash, outcome)))
    }

    /// Hash of a department's latest entry, if any.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::Persistence`: query failure
    pub fn latest_hash(&self, department_code: &str) -> Result<Option<String>> {
        let op = "latest_hash";
        let started = Instant::now();
        log_op_start!(op, department_code = department_code);

        let result = self.read(op, |conn| {
            Ok(query::head(conn, department_code)?.map(|h| h.hash))
        });
        finish(op, started, result)
    }

    /// Index rows ordered by (department_code, timestamp_utc).
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::Persistence`: query failure
    pub fn get_index_entries(&self, department_code: Option<&str>) -> Result<Vec<IndexEntry>> {
        let op = "get_index_entries";
        let started = Instant::now();
        log_op_start!(op, department_code = department_code.unwrap_or("*"));

        let result = self.read(op, |conn| query::index_entries(conn, department_code));
        if let Ok(rows) = &result {
            tracing::debug!(row_count = rows.len(), "Read index entries");
        }
        finish(op, started, result)
    }

    /// A department's full chain in timestamp order; empty if never written
    /// or if `department_code` is not an exact department code.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::Persistence`: query failure or corrupt stored count
    pub fn chain_entries(&self, department_code: &str) -> Result<Vec<ChainEntry>> {
        self.read("chain_entries", |conn| {
            query::chain_entries(conn, department_code)
        })
    }

    /// Recompute and check every hash, mirrored column and link of a
    /// department's chain.
    ///
    /// ## Errors
    ///
    /// As [`chain_entries`](Self::chain_entries). A broken chain is reported
    /// in the returned value, not as an error.
    pub fn verify_department_chain(&self, department_code: &str) -> Result<ChainVerification> {
        let op = "verify_department_chain";
        let started = Instant::now();
        log_op_start!(op, department_code = department_code);

        let result = self.chain_entries(department_code).map(|entries| {
            let report = verify_chain(&entries);
            if let Some(brk) = &report.first_break {
                tracing::warn!(
                    department_code,
                    position = brk.position,
                    timestamp_utc = %brk.timestamp_utc,
                    reason = ?brk.reason,
                    "Chain verification failed"
                );
            }
            report
        });
        finish(op, started, result)
    }

    /// Export a department's chain as a JSON file.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::Io`: the destination cannot be written
    /// - `ExErrorKind::Serialization`: a stored payload is not valid JSON
    /// - otherwise as [`chain_entries`](Self::chain_entries)
    pub fn export_department_json<P: AsRef<Path>>(
        &self,
        department_code: &str,
        destination: P,
    ) -> Result<usize> {
        let op = "export_department_json";
        let started = Instant::now();
        log_op_start!(op, department_code = department_code);

        let result = self.chain_entries(department_code).and_then(|entries| {
            export::export_department_json(&entries, destination.as_ref())?;
            Ok(entries.len())
        });
        log_row_count(&result);
        finish(op, started, result)
    }

    /// Export a department's chain as a CSV file.
    ///
    /// ## Errors
    ///
    /// - `ExErrorKind::Io`: the destination cannot be written
    /// - `ExErrorKind::Serialization`: CSV encoding failed
    /// - otherwise as [`chain_entries`](Self::chain_entries)
    pub fn export_department_csv<P: AsRef<Path>>(
        &self,
        department_code: &str,
        destination: P,
    ) -> Result<usize> {
        let op = "export_department_csv";
        let started = Instant::now();
        log_op_start!(op, department_code = department_code);

        let result = self.chain_entries(department_code).and_then(|entries| {
            export::export_department_csv(&entries, destination.as_ref())?;
            Ok(entries.len())
        });
        log_row_count(&result);
        finish(op, started, result)
    }

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| lock_poisoned(op))
    }

    /// Run `f` in an immediate transaction; commit on `Ok`, roll back otherwise.
    fn write<T>(&self, op: &str, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.lock(op)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| storage_write_failure(op, e))?;

        // Dropping an uncommitted transaction rolls it back
        let value = f(&tx)?;
        tx.commit().map_err(|e| storage_write_failure(op, e))?;
        Ok(value)
    }

    fn read<T>(&self, op: &str, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.lock(op)?;
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let value = f(&*tx)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(value)
    }
}

fn report(snapshot: &Snapshot, hash: String, outcome: WriteOutcome) -> String {
    if let WriteOutcome::Replaced { replaced_hash } = &outcome {
        tracing::warn!(
            department_code = snapshot.department_code(),
            timestamp_utc = snapshot.timestamp_utc(),
            replaced_hash = %replaced_hash,
            hash = %hash,
            "Replaced existing entry with a different payload"
        );
    }
    hash
}

fn log_row_count(result: &Result<usize>) {
    if let Ok(rows) = result {
        tracing::debug!(row_count = *rows, "Exported chain entries");
    }
}

fn finish<T>(op: &'static str, started: Instant, result: Result<T>) -> Result<T> {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms);
        }
        Err(err) => {
            log_op_error!(op, ExError::clone(err), duration_ms = duration_ms);
        }
    }
    result
}
