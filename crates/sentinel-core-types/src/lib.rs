//! Core types shared across Sentinel facilities
//!
//! This crate holds the canonical schema constants used by the logging
//! facility and by every crate that emits structured events:
//!
//! - **Field keys**: component, op, event, duration and ledger identifiers
//! - **Event names**: start, end, end_error

pub mod schema;
