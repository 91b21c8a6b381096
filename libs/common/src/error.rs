//! Custom error types for the common library
//!
//! This module defines the error types shared by the HTTP client, the
//! session codec and the configuration loader.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Error raised by the HTTP client and the domain façades built on it
#[derive(Error, Debug)]
pub enum ClientError {
    /// The upstream answered with a non-2xx status
    ///
    /// `body` is the parsed error payload; `raw` and `content_type` are the
    /// bytes and media type exactly as received, for relaying.
    #[error("Upstream responded with {status}: {body}")]
    Upstream {
        status: StatusCode,
        body: Value,
        content_type: Option<String>,
        raw: Vec<u8>,
    },

    /// The request never produced a response
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body did not match the expected shape
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Payload rejected before any network call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A write was attempted without a session credential
    #[error("Unauthorized")]
    Unauthorized,
}

impl ClientError {
    /// Human-readable message for the failure.
    ///
    /// For upstream failures this is the `error` field of the body, then the
    /// `message` field, then the body itself.
    pub fn message(&self) -> String {
        match self {
            ClientError::Upstream { body, .. } => body
                .get("error")
                .or_else(|| body.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| match body {
                    Value::String(raw) => raw.clone(),
                    other => other.to_string(),
                }),
            other => other.to_string(),
        }
    }

    /// Upstream status, when the failure came from the upstream
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Type alias for Result with ClientError
pub type ClientResult<T> = Result<T, ClientError>;

/// Error raised while encoding or decoding a session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Signing the session claims failed
    #[error("Failed to sign session: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Signature, expiry or shape check failed
    #[error("Invalid session: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// The session carries no upstream bearer token
    #[error("Session has no bearer token")]
    MissingToken,
}

/// Type alias for Result with SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value was read but is not acceptable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
