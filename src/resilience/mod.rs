//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Read-only RPC call:
//!     → per-call timeout (blockchain::client)
//!     → On transient failure: retries.rs (retry with backoff.rs delay)
//! ```
//!
//! # Design Decisions
//! - Every RPC has a deadline
//! - Only connection failures and timeouts are retried
//! - Simulation reverts, authorization failures and submissions are never retried

pub mod backoff;
pub mod retries;

pub use retries::{with_retries, RetryPolicy};
