//! Chain entry persistence and queries.
//!
//! ## Responsibilities
//!
//! - Write a chain entry and its index row in the caller's transaction
//! - Apply the collision policy when a timestamp is already taken
//! - Read index rows, full chains and chain heads
//!
//! ## Non-Responsibilities
//!
//! - Transactions, locking and logging (handled by [`crate::store`])
//! - Hash computation (handled by `sentinel-core`)

pub mod persist;
pub mod query;

pub use persist::{CollisionPolicy, WriteOutcome};
pub use query::ChainHead;
