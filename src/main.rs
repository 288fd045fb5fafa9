//! JSON Cache Proxy - A transparent caching reverse proxy
//!
//! Serves upstream API responses from a disk cache while they are fresh.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use json_cache_proxy::api::{create_router, AppState};
use json_cache_proxy::cache::CacheStore;
use json_cache_proxy::{spawn_cleanup_task, Config};

/// Main entry point for the proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the cache directory and build the upstream client
/// 4. Start the background expiry sweep
/// 5. Create Axum router with the catch-all proxy handler
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
///
/// Configuration and cache directory errors abort startup.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "json_cache_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JSON Cache Proxy");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: api_url={}, port={}, expiry={}h, cache_dir={}, cleanup_interval={}s",
        config.api_url,
        config.server_port,
        config.cache_expiry_hours,
        config.cache_dir.display(),
        config.cleanup_interval
    );

    let state = AppState::from_config(&config).with_context(|| {
        format!(
            "failed to create cache directory {}",
            config.cache_dir.display()
        )
    })?;
    info!("Cache store initialized");

    let cleanup_handle = if config.cleanup_interval > 0 {
        info!("Background expiry sweep started");
        Some(spawn_cleanup_task(
            state.cache.clone(),
            config.cleanup_interval,
        ))
    } else {
        info!("Background expiry sweep disabled");
        None
    };

    let cache = state.cache.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle, cache))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and logs the cache counters.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>, cache: Arc<CacheStore>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Expiry sweep aborted");
    }

    let stats = cache.stats();
    info!(
        "Cache stats: hits={}, misses={}, expirations={}, write_failures={}, hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.expirations,
        stats.write_failures,
        stats.hit_rate()
    );
}
