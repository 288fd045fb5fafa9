//! JSON Cache Proxy - A transparent caching reverse proxy
//!
//! Serves upstream API responses from a disk cache while they are fresh and
//! fetches, stores and returns them otherwise.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
