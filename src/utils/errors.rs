use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Unified error type for the gateway.
///
/// Exactly three kinds exist: malformed client input, a failure propagated
/// from the chain RPC, and an unknown route. There is no retry or recovery
/// path; upstream failures are surfaced verbatim to the caller.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Endpoint not found")]
    NotFound,
}

impl GatewayError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        GatewayError::BadRequest(msg.into())
    }

    /// Wrap any chain-side failure, keeping its message.
    pub fn upstream(err: impl std::fmt::Display) -> Self {
        GatewayError::Upstream(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = match &self {
            GatewayError::BadRequest(msg) => json!({ "error": msg }),
            GatewayError::Upstream(msg) => {
                tracing::error!("upstream failure: {msg}");
                json!({ "error": "Internal server error", "message": msg })
            }
            GatewayError::NotFound => json!({ "error": "Endpoint not found" }),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, GatewayError>;
