//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use alloy::sol_types::decode_revert_reason;
use alloy::transports::{RpcError, TransportError};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors surfaced by the client and the mint pipeline.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Caller supplied a malformed address or amount.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Artifact, key, address or endpoint configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Endpoint unreachable or the transport failed.
    #[error("Connection error during {method}: {message}")]
    Connection { method: &'static str, message: String },

    /// RPC request timed out.
    #[error("RPC timeout during {method} after {secs} seconds")]
    Timeout { method: &'static str, secs: u64 },

    /// The node answered with a JSON-RPC error.
    #[error("Node rejected {method}: {message}")]
    Rpc {
        method: &'static str,
        message: String,
        revert_reason: Option<String>,
    },

    /// No bytecode at the configured token address.
    #[error("No contract found at {0}")]
    ContractNotFound(Address),

    /// Mandatory contract state (owner, paused) could not be read.
    #[error("Failed to read contract state: {0}")]
    ContractState(String),

    #[error("Contract is paused")]
    ContractPaused,

    /// Signer is not the contract owner.
    #[error("Sender {signer} is not the contract owner {owner}")]
    Unauthorized { owner: Address, signer: Address },

    /// The simulated call would revert.
    #[error("Transaction would fail: {reason}")]
    Simulation { reason: String },

    /// ABI encoding or decoding failed.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Signing the transaction failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Transaction was mined but reverted.
    #[error("Transaction {tx_hash} failed on-chain")]
    TransactionFailed {
        tx_hash: TxHash,
        block_number: Option<u64>,
    },

    /// No receipt before the confirmation deadline.
    #[error("Transaction {tx_hash} not mined after {secs} seconds")]
    ReceiptTimeout { tx_hash: TxHash, secs: u64 },
}

impl ClientError {
    /// Classify a transport-level failure for the given RPC method.
    pub fn from_rpc(method: &'static str, err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => {
                let revert_reason = payload
                    .as_revert_data()
                    .and_then(|data| decode_revert_reason(&data));
                ClientError::Rpc {
                    method,
                    message: payload.message.to_string(),
                    revert_reason,
                }
            }
            RpcError::Transport(kind) => ClientError::Connection {
                method,
                message: kind.to_string(),
            },
            RpcError::NullResp => ClientError::Rpc {
                method,
                message: "null response".to_string(),
                revert_reason: None,
            },
            other => ClientError::Rpc {
                method,
                message: other.to_string(),
                revert_reason: None,
            },
        }
    }

    /// Connection failures and timeouts may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::Connection { .. } | ClientError::Timeout { .. }
        )
    }

    /// Stable label for metrics and API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "validation",
            ClientError::Config(_) => "config",
            ClientError::Connection { .. } => "connection",
            ClientError::Timeout { .. } => "timeout",
            ClientError::Rpc { .. } => "rpc",
            ClientError::ContractNotFound(_) => "contract_not_found",
            ClientError::ContractState(_) => "contract_state",
            ClientError::ContractPaused => "contract_paused",
            ClientError::Unauthorized { .. } => "unauthorized",
            ClientError::Simulation { .. } => "simulation",
            ClientError::Abi(_) => "abi",
            ClientError::Signing(_) => "signing",
            ClientError::TransactionFailed { .. } => "transaction_failed",
            ClientError::ReceiptTimeout { .. } => "receipt_timeout",
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
