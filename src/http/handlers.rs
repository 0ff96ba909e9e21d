//! API handlers.

use alloy::primitives::U256;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::blockchain::types::ClientError;
use crate::http::request::MintBody;
use crate::http::response::{ApiError, BalanceBody, HealthBody, TokenInfo};
use crate::http::server::AppState;
use crate::mint::parse_address;
use crate::normalize::NormalizedReceipt;

/// `POST /api/v1/mint`
pub async fn mint(
    State(state): State<AppState>,
    payload: Result<Json<MintBody>, JsonRejection>,
) -> Result<Json<NormalizedReceipt>, ApiError> {
    let (recipient, amount) = match payload
        .map_err(|e| ClientError::Validation(e.body_text()))
        .and_then(|Json(body)| body.amount_text().map(|amount| (body.recipient, amount)))
    {
        Ok(input) => input,
        Err(e) => return Err(state.client.reject(e).into()),
    };

    let receipt = state.client.mint_text(&recipient, &amount).await?;
    Ok(Json(receipt))
}

/// `GET /api/v1/token`
pub async fn token_info(State(state): State<AppState>) -> Result<Json<TokenInfo>, ApiError> {
    let contract_state = state.client.contract_state().await?;
    Ok(Json(TokenInfo {
        address: state.client.token_address(),
        signer: state.client.signer_address(),
        chain_id: state.client.connection().chain_id(),
        state: contract_state,
    }))
}

/// `GET /api/v1/balance/{address}`
pub async fn balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceBody>, ApiError> {
    let holder = parse_address(&address)?;
    let balance: U256 = state.client.balance_of(&address).await?;
    Ok(Json(BalanceBody {
        address: holder,
        balance: balance.to_string(),
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.client.is_healthy().await {
        (StatusCode::OK, Json(HealthBody { status: "healthy" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthBody {
                status: "unhealthy",
            }),
        )
    }
}
