//! Cache Store Module
//!
//! Disk-backed response cache. One file per entry under a root directory,
//! named after the entry's [`CacheKey`]; freshness comes from the file's
//! modification time.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use axum::body::Bytes;
use chrono::{DateTime, Duration, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::cache::{key_for, CacheKey, CacheStats, StatsSnapshot, ENTRY_EXTENSION};

/// Permission bits for entry files: owner read/write, everyone else read.
#[cfg(unix)]
const ENTRY_MODE: u32 = 0o644;

/// Suffix of in-flight temporary files.
const TEMP_EXTENSION: &str = "tmp";

/// Temporary files younger than this may still belong to a running save.
const TEMP_MIN_AGE_SECS: i64 = 60;

// == Cache Store ==
/// Owns the cache root directory and every entry file in it.
///
/// There is no locking: concurrent saves of the same key race at the
/// filesystem level and the last rename wins. Each writer stages its bytes
/// in its own temporary file, so a reader only ever sees a complete entry
/// or none.
#[derive(Debug)]
pub struct CacheStore {
    /// Directory holding the entry files
    root: PathBuf,
    /// Entries older than this many hours are treated as absent
    expiry_hours: u64,
    /// Activity counters
    stats: CacheStats,
    /// Distinguishes temporary files of concurrent writers
    temp_seq: AtomicU64,
}

impl CacheStore {
    // == Constructor ==
    /// Opens a store rooted at `root`, creating the directory if absent.
    ///
    /// # Arguments
    /// * `root` - Cache root directory
    /// * `expiry_hours` - Age in hours after which an entry is stale
    pub fn open(root: impl Into<PathBuf>, expiry_hours: u64) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        Ok(Self {
            root,
            expiry_hours,
            stats: CacheStats::new(),
            temp_seq: AtomicU64::new(0),
        })
    }

    /// Returns the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configured expiry in hours.
    pub fn expiry_hours(&self) -> u64 {
        self.expiry_hours
    }

    /// Returns a snapshot of the activity counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // == Path For ==
    /// Returns the entry path for an identifier: `<root>/<key>.json`.
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.entry_path(&key_for(identifier))
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn temp_path(&self, key: &CacheKey) -> PathBuf {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{}.{}.{}",
            key.file_name(),
            std::process::id(),
            seq,
            TEMP_EXTENSION
        ))
    }

    // == Load ==
    /// Returns the cached bytes for an identifier if a fresh entry exists.
    ///
    /// A missing entry, a stat or read failure, and a stale entry all come
    /// back as `None`. Stale entries are deleted on the way out; a failed
    /// delete is logged and the file simply fails the next freshness check.
    pub async fn load(&self, identifier: &str) -> Option<Bytes> {
        let path = self.path_for(identifier);
        let cutoff = self.cutoff();

        let modified = match fs::metadata(&path).await.and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(err) => {
                if err.kind() == io::ErrorKind::NotFound {
                    debug!(identifier, "cache miss");
                } else {
                    warn!(identifier, path = %path.display(), error = %err, "cache stat failed, treating as miss");
                }
                self.stats.record_miss();
                return None;
            }
        };

        if is_stale(modified, cutoff) {
            debug!(identifier, "cache entry expired");
            if self.remove(&path).await {
                self.stats.record_expiration();
            }
            self.stats.record_miss();
            return None;
        }

        match fs::read(&path).await {
            Ok(data) => {
                debug!(identifier, bytes = data.len(), "cache hit");
                self.stats.record_hit();
                Some(Bytes::from(data))
            }
            Err(err) => {
                debug!(identifier, error = %err, "cache read failed, treating as miss");
                self.stats.record_miss();
                None
            }
        }
    }

    // == Save ==
    /// Persists `data` as the entry for an identifier.
    ///
    /// The bytes go to a temporary sibling file which is then renamed over
    /// the entry, creating or replacing it. Failures are logged and counted
    /// but never returned: a request that fetched fresh bytes still serves
    /// them when the cache cannot keep a copy.
    pub async fn save(&self, identifier: &str, data: &[u8]) {
        let key = key_for(identifier);
        let path = self.entry_path(&key);
        let temp = self.temp_path(&key);

        match write_then_rename(&temp, &path, data).await {
            Ok(()) => debug!(identifier, bytes = data.len(), "cache entry saved"),
            Err(err) => {
                warn!(identifier, path = %path.display(), error = %err, "cache write failed");
                let _ = fs::remove_file(&temp).await;
                self.stats.record_write_failure();
            }
        }
    }

    // == Purge Expired ==
    /// Removes every stale entry and orphaned temporary file under the root.
    ///
    /// Returns the number of files removed. Files that are neither entries
    /// nor temporary files are left alone. Temporary files must also be at
    /// least a minute old, so a save between its write and its rename keeps
    /// its file even when the expiry is zero.
    pub async fn purge_expired(&self) -> usize {
        let cutoff = self.cutoff();
        let temp_cutoff =
            cutoff.map(|cutoff| cutoff.min(Utc::now() - Duration::seconds(TEMP_MIN_AGE_SECS)));

        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(err) => {
                warn!(root = %self.root.display(), error = %err, "cannot scan cache root");
                return 0;
            }
        };

        let mut removed = 0;
        loop {
            let item = match dir.next_entry().await {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(err) => {
                    warn!(root = %self.root.display(), error = %err, "cache scan aborted");
                    break;
                }
            };

            let path = item.path();
            let Some(kind) = FileKind::of(&path) else {
                continue;
            };

            let modified = match item.metadata().await {
                Ok(meta) if meta.is_file() => match meta.modified() {
                    Ok(modified) => modified,
                    Err(_) => continue,
                },
                _ => continue,
            };

            let threshold = match kind {
                FileKind::Entry => cutoff,
                FileKind::Temp => temp_cutoff,
            };

            if is_stale(modified, threshold) && self.remove(&path).await {
                if kind == FileKind::Entry {
                    self.stats.record_expiration();
                }
                removed += 1;
            }
        }

        removed
    }

    /// Deletes a file, returning whether it is gone because of this call.
    async fn remove(&self, path: &Path) -> bool {
        match fs::remove_file(path).await {
            Ok(()) => true,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cache eviction failed");
                false
            }
        }
    }

    /// Oldest modification time still considered fresh, computed once per
    /// call. `None` when the expiry reaches past the representable range,
    /// in which case nothing is stale.
    fn cutoff(&self) -> Option<DateTime<Utc>> {
        let expiry = i64::try_from(self.expiry_hours)
            .ok()
            .and_then(Duration::try_hours)?;
        Utc::now().checked_sub_signed(expiry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Entry,
    Temp,
}

impl FileKind {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ENTRY_EXTENSION) => Some(Self::Entry),
            Some(TEMP_EXTENSION) => Some(Self::Temp),
            _ => None,
        }
    }
}

fn is_stale(modified: SystemTime, cutoff: Option<DateTime<Utc>>) -> bool {
    cutoff.is_some_and(|cutoff| DateTime::<Utc>::from(modified) < cutoff)
}

async fn write_then_rename(temp: &Path, dest: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(ENTRY_MODE);

    let mut file = options.open(temp).await?;
    file.write_all(data).await?;
    file.flush().await?;
    drop(file);

    fs::rename(temp, dest).await
}
