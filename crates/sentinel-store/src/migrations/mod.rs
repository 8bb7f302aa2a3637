//! Migration framework
//!
//! - Embedded SQL migrations for the global index
//! - Checksums recorded per migration and re-checked on every open
//! - Idempotent application
//!
//! Department partitions are not migrations: they are created lazily on
//! first write (see [`crate::partition`]).

mod checksums;
mod embedded;
mod runner;

pub use runner::apply_migrations;
