//! Sentinel Store - SQLite persistence for the snapshot ledger
//!
//! Provides:
//! - `SnapshotStore`, the owned ledger handle (open, store, append, query, close)
//! - Global index migration with checksum tracking
//! - Lazily created per-department partitions with sanitized names
//! - JSON and CSV exporters over a department's chain

pub mod atomic;
pub mod db;
pub mod errors;
pub mod export;
pub mod migrations;
pub mod partition;
pub mod snapshot;
pub mod store;

// Re-export key types
pub use errors::Result;
pub use export::{CSV_COLUMNS, JsonExportEntry};
pub use snapshot::{ChainHead, CollisionPolicy, WriteOutcome};
pub use store::SnapshotStore;
