//! Response models for the proxy
//!
//! This module defines the DTOs serialized into HTTP response bodies that the
//! proxy produces itself. Cached and upstream bodies are passed through as
//! raw bytes and never modelled.

pub mod responses;

// Re-export commonly used types
pub use responses::{ErrorBody, ErrorCode, ErrorPayload};
