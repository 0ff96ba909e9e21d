//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas limit > 0)
//! - Check that URLs, addresses and socket addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: ClientConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;
use std::net::SocketAddr;

use crate::config::schema::ClientConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut check = |ok: bool, field: &'static str, message: String| {
        if !ok {
            errors.push(ValidationError { field, message });
        }
    };

    check(
        config.chain.rpc_url.parse::<url::Url>().is_ok(),
        "chain.rpc_url",
        format!("invalid URL '{}'", config.chain.rpc_url),
    );
    check(
        config.chain.rpc_timeout_secs > 0,
        "chain.rpc_timeout_secs",
        "must be greater than zero".to_string(),
    );
    check(
        config.token.address.parse::<Address>().is_ok(),
        "token.address",
        format!("invalid address '{}'", config.token.address),
    );
    check(
        !config.token.artifact_path.is_empty(),
        "token.artifact_path",
        "must not be empty".to_string(),
    );
    check(
        config.transaction.gas_limit > 0,
        "transaction.gas_limit",
        "must be greater than zero".to_string(),
    );
    check(
        config.transaction.receipt_timeout_secs > 0,
        "transaction.receipt_timeout_secs",
        "must be greater than zero".to_string(),
    );
    check(
        config.transaction.poll_interval_ms > 0,
        "transaction.poll_interval_ms",
        "must be greater than zero".to_string(),
    );
    check(
        config.retries.max_delay_ms >= config.retries.base_delay_ms,
        "retries.max_delay_ms",
        "must not be lower than retries.base_delay_ms".to_string(),
    );
    check(
        config.server.bind_address.parse::<SocketAddr>().is_ok(),
        "server.bind_address",
        format!("invalid socket address '{}'", config.server.bind_address),
    );
    check(
        !config.observability.metrics_enabled
            || config.observability.metrics_address.parse::<SocketAddr>().is_ok(),
        "observability.metrics_address",
        format!(
            "invalid socket address '{}'",
            config.observability.metrics_address
        ),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
