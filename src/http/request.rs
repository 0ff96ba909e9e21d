//! Request identification and request bodies.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID for every request
//! - Define the JSON bodies accepted by the API
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept, not replaced

use axum::http::{HeaderValue, Request};
use serde::Deserialize;
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::blockchain::types::{ClientError, ClientResult};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Body of `POST /api/v1/mint`.
#[derive(Debug, Clone, Deserialize)]
pub struct MintBody {
    pub recipient: String,
    /// Decimal string or JSON integer.
    pub amount: Value,
}

impl MintBody {
    /// Amount as decimal text for [`crate::mint::MintRequest::parse`].
    pub fn amount_text(&self) -> ClientResult<String> {
        match &self.amount {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => n.as_u64().map(|n| n.to_string()).ok_or_else(|| {
                ClientError::Validation(format!(
                    "amount must be a non-negative integer, got {}",
                    n
                ))
            }),
            other => Err(ClientError::Validation(format!(
                "amount must be a string or integer, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(amount: Value) -> MintBody {
        serde_json::from_value(json!({
            "recipient": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "amount": amount
        }))
        .unwrap()
    }

    #[test]
    fn test_amount_text() {
        assert_eq!(body(json!("1000")).amount_text().unwrap(), "1000");
        assert_eq!(body(json!(1000)).amount_text().unwrap(), "1000");
        assert!(body(json!(-5)).amount_text().is_err());
        assert!(body(json!(1.5)).amount_text().is_err());
        assert!(body(json!(null)).amount_text().is_err());
    }

    #[test]
    fn test_request_ids_unique() {
        let mut maker = UuidRequestId;
        let request = Request::new(());
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
        assert!(Uuid::parse_str(a.header_value().to_str().unwrap()).is_ok());
    }
}
