//! HTTP client for the token-client mint service.

pub mod client;

pub use client::{ApiErrorResponse, BalanceResponse, HealthResponse, MintApiClient, TokenInfoResponse};
