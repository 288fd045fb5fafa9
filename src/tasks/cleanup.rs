//! Expiry Sweep Task
//!
//! Background task that periodically deletes stale cache files, so entries
//! that are never requested again do not linger on disk.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically purges expired cache files.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. It only removes files that a load would already treat as
/// absent, so it never changes what clients see.
///
/// # Arguments
/// * `cache` - Shared cache store
/// * `cleanup_interval_secs` - Interval in seconds between sweeps, must be non-zero
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: Arc<CacheStore>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache expiry sweep with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;

            if removed > 0 {
                info!("Expiry sweep: removed {} stale cache files", removed);
            } else {
                debug!("Expiry sweep: no stale cache files found");
            }
        }
    })
}
