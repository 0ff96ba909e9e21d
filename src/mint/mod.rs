//! Mint orchestration.
//!
//! [`TokenClient`] runs pre-flight checks, simulates, signs and submits a
//! `mint` call, then waits for and validates the receipt.

pub mod client;
pub mod types;

pub use client::TokenClient;
pub use types::{authorize, parse_address, ContractState, MintRequest, MintStage};
