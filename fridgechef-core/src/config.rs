//! Client configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend base URL (includes the `/api` prefix).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8183/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API, without a trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Path of the token file used by the disk token store.
    pub token_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `FRIDGECHEF_SERVER_URL`: backend base URL (default: "http://127.0.0.1:8183/api")
    /// - `FRIDGECHEF_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    /// - `FRIDGECHEF_TOKEN_FILE`: token file path (default: "~/.fridgechef/tokens.json")
    pub fn from_env() -> Self {
        let base_url = env::var("FRIDGECHEF_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = env::var("FRIDGECHEF_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let token_file = env::var("FRIDGECHEF_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_token_file());

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            token_file,
        }
    }

    /// Override the base URL, normalizing a trailing slash.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Get the default token file path: ~/.fridgechef/tokens.json
    pub fn default_token_file() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".fridgechef").join("tokens.json"))
            .unwrap_or_else(|| PathBuf::from("data/tokens.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
