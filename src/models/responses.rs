//! Response DTOs for the proxy
//!
//! Defines the structure of the error payload written when an upstream
//! fetch fails.

use serde::Serialize;

/// Closed set of error codes reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCode {
    /// Upstream request or body read failed
    Internal,
}

/// Inner `error` object of an [`ErrorPayload`].
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable description, embeds the underlying error text
    pub message: String,
}

/// Error response body: `{"error":{"code":"...","message":"..."}}`.
///
/// Built per failed request and never cached.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub error: ErrorBody,
}

impl ErrorPayload {
    /// Creates a new ErrorPayload
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    /// Creates an `internal` ErrorPayload
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_error_payload_shape() {
        let payload = ErrorPayload::internal("Request error: connection refused");
        let value: Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "error": {
                    "code": "internal",
                    "message": "Request error: connection refused"
                }
            })
        );
    }

    #[test]
    fn test_error_code_serialize() {
        let json = serde_json::to_string(&ErrorCode::Internal).unwrap();
        assert_eq!(json, "\"internal\"");
    }
}
