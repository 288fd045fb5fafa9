//! API Handlers
//!
//! The read-through proxy handler: serve from cache, otherwise fetch from
//! upstream, store, and return.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Uri},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::upstream::Upstream;

const APPLICATION_JSON: &str = "application/json";

/// Application state shared across all handlers.
///
/// Built once at startup and injected into the router.
#[derive(Clone)]
pub struct AppState {
    /// Disk cache; needs no lock, see [`CacheStore`]
    pub cache: Arc<CacheStore>,
    /// Upstream API client
    pub upstream: Arc<Upstream>,
}

impl AppState {
    /// Creates a new AppState with the given cache store and upstream.
    pub fn new(cache: CacheStore, upstream: Upstream) -> Self {
        Self {
            cache: Arc::new(cache),
            upstream: Arc::new(upstream),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens (and creates if needed) the cache directory.
    pub fn from_config(config: &Config) -> std::io::Result<Self> {
        let cache = CacheStore::open(&config.cache_dir, config.cache_expiry_hours)?;
        let upstream = Upstream::new(config.api_url.clone());
        Ok(Self::new(cache, upstream))
    }
}

/// Returns the request identifier: path plus query, exactly as received.
pub fn identifier_of(uri: &Uri) -> &str {
    uri.path_and_query().map_or("/", |pq| pq.as_str())
}

/// Catch-all proxy handler, mounted for every path and method.
///
/// 1. Look up the identifier in the cache; on a hit return the stored bytes.
/// 2. On a miss GET `<api_url><identifier>` once.
/// 3. Store the body (best effort) and return it.
///
/// Upstream failures produce an `internal` error payload with status 200.
pub async fn proxy_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let identifier = identifier_of(&uri);

    if let Some(cached) = state.cache.load(identifier).await {
        return json_response(cached);
    }

    match state.upstream.fetch(identifier).await {
        Ok(body) => {
            state.cache.save(identifier, &body).await;
            debug!(identifier, bytes = body.len(), "served from upstream");
            json_response(body)
        }
        Err(err) => {
            warn!(identifier, error = %err, "upstream fetch failed");
            err.into_response()
        }
    }
}

fn json_response(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, APPLICATION_JSON)], body).into_response()
}
