//! The Thor REST client (spec.md §4.8): block lookup, transaction submission/lookup,
//! receipts, and contract-call dry-runs.

mod client;
pub mod types;

pub use client::ThorClient;
