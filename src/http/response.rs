//! Response bodies and error mapping.
//!
//! # Responsibilities
//! - Map client errors to HTTP status codes
//! - Render errors as `{ "error": kind, "message": text }`
//!
//! # Design Decisions
//! - Upstream node failures result in 502 Bad Gateway
//! - Timeouts (RPC or confirmation) result in 504 Gateway Timeout

use alloy::primitives::Address;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::blockchain::types::ClientError;
use crate::mint::ContractState;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// A [`ClientError`] on its way to the HTTP client.
#[derive(Debug)]
pub struct ApiError(pub ClientError);

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        Self(err)
    }
}

/// Status code for a client error.
pub fn status_for(err: &ClientError) -> StatusCode {
    match err {
        ClientError::Validation(_) => StatusCode::BAD_REQUEST,
        ClientError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        ClientError::ContractPaused => StatusCode::CONFLICT,
        ClientError::Simulation { .. } | ClientError::TransactionFailed { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ClientError::Connection { .. }
        | ClientError::Rpc { .. }
        | ClientError::ContractNotFound(_) => StatusCode::BAD_GATEWAY,
        ClientError::Timeout { .. } | ClientError::ReceiptTimeout { .. } => {
            StatusCode::GATEWAY_TIMEOUT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Body of `GET /api/v1/token`.
#[derive(Debug, Serialize)]
pub struct TokenInfo {
    pub address: Address,
    pub signer: Address,
    pub chain_id: u64,
    #[serde(flatten)]
    pub state: ContractState,
}

/// Body of `GET /api/v1/balance/{address}`.
#[derive(Debug, Serialize)]
pub struct BalanceBody {
    pub address: Address,
    /// Decimal string; balances routinely exceed JSON's safe integer range.
    pub balance: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}
