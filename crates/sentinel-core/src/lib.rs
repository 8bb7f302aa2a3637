//! Sentinel Core - canonical snapshot model and hash chaining
//!
//! This crate provides the pure, storage-independent half of the ledger:
//! - Department lookup table (18 fixed departments, 2-digit codes)
//! - Snapshot data model (meta, totals, seven candidate slots)
//! - Normalization of loosely-typed raw snapshots into typed values
//! - Canonical text serialization used as hashing input
//! - SHA-256 hash chaining and chain verification
//! - Error and logging facilities shared by the store and CLI

pub mod canonical;
pub mod errors;
pub mod hashchain;
pub mod logging_facility;
pub mod model;
pub mod normalize;

// Re-export commonly used types
pub use canonical::{candidates_json, to_canonical_text};
pub use errors::{ExError, ExErrorKind, Result, SentinelError};
pub use hashchain::{next_hash, verify_chain, ChainVerification, GENESIS_SENTINEL};
pub use model::{
    department_code, department_name, CandidateResult, ChainEntry, IndexEntry, Meta, Snapshot,
    Totals, DEPARTMENTS,
};
pub use normalize::{normalize, normalize_with, parse_count, NormalizeOptions};
