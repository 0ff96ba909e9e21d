//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Artifact file (ABI) + private key + RPC URL
//!     → artifact.rs (ABI loading, call encoding)
//!     → wallet.rs (key holding, signing, nonce lease)
//!     → client.rs (RPC connection with timeouts and retries)
//!     → transaction.rs (build, signed artifact)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - One nonce lease per signer at a time

pub mod artifact;
pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use artifact::{ContractArtifact, TokenContract};
pub use client::ChainConnection;
pub use transaction::SignedTransaction;
pub use types::{ChainId, ClientError, ClientResult};
pub use wallet::Wallet;
