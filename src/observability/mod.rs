//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Mint pipeline, RPC layer and HTTP service produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout log lines
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (stage, method, tx_hash) instead of formatted strings
//! - Private keys never appear in any event
//! - Metrics are recorded through the `metrics` facade and are no-ops
//!   until an exporter is installed

pub mod logging;
pub mod metrics;
