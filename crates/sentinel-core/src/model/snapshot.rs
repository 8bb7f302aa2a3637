//! Snapshot data model.
//!
//! A [`Snapshot`] is built once by [`crate::normalize`] and never mutated:
//! its fields are private and only exposed through shared references.

use serde::{Deserialize, Serialize};

/// Scope recorded on every department-level snapshot.
pub const SCOPE_DEPARTMENT: &str = "DEPARTMENT";

/// Candidate slots present in every snapshot, in order.
pub const CANDIDATE_SLOTS: std::ops::RangeInclusive<u8> = 1..=7;

/// Provenance of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub election: String,
    pub year: u32,
    pub source: String,
    pub scope: String,
    pub department_code: String,
    pub timestamp_utc: String,
}

/// Department-level vote totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub registered_voters: u64,
    pub total_votes: u64,
    pub valid_votes: u64,
    pub null_votes: u64,
    pub blank_votes: u64,
}

/// Votes for one ballot slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub slot: u8,
    pub votes: u64,
}

/// Immutable aggregate of meta, totals and exactly seven candidate results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    meta: Meta,
    totals: Totals,
    candidates: Vec<CandidateResult>,
}

impl Snapshot {
    /// Crate-private: callers obtain snapshots through normalization, which
    /// guarantees the department code and the seven contiguous slots.
    pub(crate) fn new(meta: Meta, totals: Totals, candidates: Vec<CandidateResult>) -> Self {
        debug_assert!(candidates
            .iter()
            .map(|c| c.slot)
            .eq(CANDIDATE_SLOTS));
        Self {
            meta,
            totals,
            candidates,
        }
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    /// Candidate results ordered by slot 1..=7.
    pub fn candidates(&self) -> &[CandidateResult] {
        &self.candidates
    }

    pub fn department_code(&self) -> &str {
        &self.meta.department_code
    }

    pub fn timestamp_utc(&self) -> &str {
        &self.meta.timestamp_utc
    }
}
