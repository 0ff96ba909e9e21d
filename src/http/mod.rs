//! HTTP mint service.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → server.rs (Axum setup, request ID, trace and timeout layers)
//!     → request.rs (body parsing)
//!     → handlers.rs (TokenClient calls)
//!     → response.rs (JSON bodies, error to status mapping)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{status_for, ApiError};
pub use server::HttpServer;
