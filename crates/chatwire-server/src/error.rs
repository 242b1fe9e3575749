//! HTTP-facing error envelope.
//!
//! Every failure leaves the relay as `{ "error": … }` JSON with a status
//! code matching the taxonomy: 400 for request validation, 500 for missing
//! configuration, 502 for anything upstream (transport, non-success
//! status, unexpected shape). Upstream status and raw body ride along for
//! diagnostics – never silently swallowed.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use chatwire_core::error::RelayError;
use chatwire_openai::error::OpenAiError;

#[derive(Debug)]
pub enum ApiError {
    Relay(RelayError),
    NotFound(String),
}

impl From<RelayError> for ApiError {
    fn from(value: RelayError) -> Self {
        ApiError::Relay(value)
    }
}

impl From<OpenAiError> for ApiError {
    fn from(value: OpenAiError) -> Self {
        ApiError::Relay(value.into())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            body: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, payload) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, ErrorBody::new(detail)),
            ApiError::Relay(err) => match err {
                RelayError::Validation(detail) => (StatusCode::BAD_REQUEST, ErrorBody::new(detail)),
                RelayError::Configuration(detail) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(detail))
                }
                RelayError::UpstreamStatus { status, body } => (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: "upstream returned an error".into(),
                        status: Some(status),
                        body: Some(body),
                    },
                ),
                RelayError::UpstreamFormat(detail) => (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody::new(format!("unexpected upstream payload: {detail}")),
                ),
                RelayError::Transport(err) => (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody::new(format!("failed to reach upstream: {err}")),
                ),
                RelayError::Serialization(err) => (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody::new(format!("serialization error: {err}")),
                ),
            },
        };

        warn!(status = %code, error = %payload.error, "request failed");
        (code, Json(payload)).into_response()
    }
}
