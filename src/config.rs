//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::CACHE_DIR_NAME;
use crate::error::ConfigError;

/// Proxy configuration parameters.
///
/// `API_URL` is required; everything else has a default.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Upstream base URL, the request path and query are appended verbatim
    pub api_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Entries older than this many hours are treated as absent
    pub cache_expiry_hours: u64,
    /// Cache root directory
    pub cache_dir: PathBuf,
    /// Background sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
}

impl Config {
    /// Default HTTP server port
    pub const DEFAULT_PORT: u16 = 3000;
    /// Default cache expiry in hours
    pub const DEFAULT_EXPIRY_HOURS: u64 = 24;
    /// Default background sweep interval in seconds
    pub const DEFAULT_CLEANUP_INTERVAL: u64 = 3600;

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_URL` - Upstream base URL (required)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_EXPIRY_HOURS` - Entry lifetime in hours (default: 24)
    /// - `CACHE_DIR` - Cache root (default: `cache/` next to the executable)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 3600, 0 = off)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("API_URL"))?;

        let cache_dir = match lookup("CACHE_DIR").filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_cache_dir()?,
        };

        Ok(Self {
            api_url,
            server_port: parse_or(&lookup, "SERVER_PORT", Self::DEFAULT_PORT)?,
            cache_expiry_hours: parse_or(
                &lookup,
                "CACHE_EXPIRY_HOURS",
                Self::DEFAULT_EXPIRY_HOURS,
            )?,
            cache_dir,
            cleanup_interval: parse_or(
                &lookup,
                "CLEANUP_INTERVAL",
                Self::DEFAULT_CLEANUP_INTERVAL,
            )?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|err: T::Err| ConfigError::Invalid {
                name,
                value,
                reason: err.to_string(),
            }),
    }
}

/// `<directory of the running executable>/cache`
fn default_cache_dir() -> Result<PathBuf, ConfigError> {
    let exe = env::current_exe().map_err(|err| ConfigError::ExecutableDir(err.to_string()))?;
    let dir = exe
        .parent()
        .ok_or_else(|| ConfigError::ExecutableDir(exe.display().to_string()))?;
    Ok(dir.join(CACHE_DIR_NAME))
}
