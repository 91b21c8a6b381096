//! Custom error types for the API service

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use common::error::ClientError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// No session, or a session without an upstream token
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Upstream error relayed byte for byte
    #[error("Upstream error {status}")]
    Relay {
        status: StatusCode,
        content_type: Option<String>,
        body: Vec<u8>,
    },
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Upstream {
                status,
                content_type,
                raw,
                ..
            } => ApiError::Relay {
                status,
                content_type,
                body: raw,
            },
            ClientError::Validation(msg) => ApiError::BadRequest(msg),
            ClientError::Unauthorized => ApiError::Unauthorized,
            other => {
                error!("Upstream call failed: {}", other);
                ApiError::InternalServerError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Relay {
                status,
                content_type,
                body,
            } => return raw_response(status, content_type, body),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Build a response from upstream parts, keeping the upstream content type
pub fn raw_response(status: StatusCode, content_type: Option<String>, body: Vec<u8>) -> Response {
    let mut response = (status, body).into_response();
    match content_type.and_then(|value| HeaderValue::from_str(&value).ok()) {
        Some(value) => {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }
        None => {
            response.headers_mut().remove(CONTENT_TYPE);
        }
    }
    response
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
