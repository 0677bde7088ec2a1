/// Client configuration, read from the environment.
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081/v1";
pub const DEFAULT_API_KEY: &str = "dev-secret-key";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRIES: u32 = 3;

/// Fixed cadence for re-fetching a non-terminal scan.
pub const SCAN_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Cadence at which elapsed time is recomputed for display.
pub const ELAPSED_TICK_INTERVAL: Duration = Duration::from_secs(1);

pub const ENV_BASE_URL: &str = "STLVAULT_API_BASE_URL";
pub const ENV_API_KEY: &str = "STLVAULT_API_KEY";
pub const ENV_TIMEOUT_MS: &str = "STLVAULT_API_TIMEOUT_MS";
pub const ENV_RETRIES: &str = "STLVAULT_API_RETRIES";
pub const ENV_SESSION_DIR: &str = "STLVAULT_SESSION_DIR";

/// Connection settings for the backend API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8081/v1`.
    pub base_url: String,
    /// Sent as `X-API-Key` on every request.
    pub api_key: String,
    pub timeout: Duration,
    /// Extra attempts for retryable failures.
    pub retries: u32,
    pub poll_interval: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            poll_interval: SCAN_POLL_INTERVAL,
        }
    }
}

impl ApiConfig {
    /// Build from `STLVAULT_*` environment variables, falling back to the
    /// defaults for anything unset or invalid.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url;
        }
        config.base_url = config.base_url.trim().trim_end_matches('/').to_string();

        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
            config.api_key = key;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout = Duration::from_millis(ms),
                _ => warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_MS, raw),
            }
        }

        if let Some(raw) = lookup(ENV_RETRIES) {
            match raw.trim().parse::<u32>() {
                Ok(n) => config.retries = n,
                Err(_) => warn!("Ignoring invalid {}={:?}", ENV_RETRIES, raw),
            }
        }

        config
    }
}

/// Session directory set through `STLVAULT_SESSION_DIR`.
///
/// `None` means the session lives in a temporary directory that goes away
/// with the process.
pub fn session_dir_override() -> Option<PathBuf> {
    std::env::var_os(ENV_SESSION_DIR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
