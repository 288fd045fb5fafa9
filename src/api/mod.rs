//! API Module
//!
//! HTTP handler and routing for the proxy.
//!
//! # Endpoints
//! - `* /*` - Every method and path is served by the read-through proxy

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
