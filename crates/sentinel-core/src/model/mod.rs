//! Ledger data model
//!
//! - [`department`]: closed table of the 18 departments and their codes
//! - [`snapshot`]: immutable snapshot produced by normalization
//! - [`ledger`]: persisted chain and index rows

pub mod department;
pub mod ledger;
pub mod snapshot;

pub use department::{department_code, department_name, DEPARTMENTS};
pub use ledger::{ChainEntry, IndexEntry};
pub use snapshot::{CandidateResult, Meta, Snapshot, Totals, CANDIDATE_SLOTS, SCOPE_DEPARTMENT};
