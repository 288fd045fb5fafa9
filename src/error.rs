//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorPayload;

// == Proxy Error Enum ==
/// Failures while fetching a response from upstream.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Request could not be sent or no response arrived
    #[error("Request error: {0}")]
    Request(#[source] reqwest::Error),

    /// Response arrived but its body could not be read
    #[error("Decode error: {0}")]
    Body(#[source] reqwest::Error),
}

impl ProxyError {
    /// Converts the error into the payload sent to the client.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload::internal(self.to_string())
    }
}

// == IntoResponse Implementation ==
// Upstream failures are reported in the body only; the status stays 200 so
// clients see the same status as on success. Known issue, kept for parity.
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.to_payload())).into_response()
    }
}

// == Config Error Enum ==
/// Failures while loading configuration at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("missing required configuration variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The default cache directory cannot be derived
    #[error("cannot locate executable directory: {0}")]
    ExecutableDir(String),
}

// == Result Type Alias ==
/// Convenience Result type for upstream fetches.
pub type Result<T> = std::result::Result<T, ProxyError>;
