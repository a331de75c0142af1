//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use chrono::FixedOffset;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::time_utils;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GoBarber API (no trailing slash required)
    pub api_url: String,
    /// File backing the credential store
    pub credentials_path: PathBuf,
    /// Offset used to display appointment hours and split morning/afternoon
    pub utc_offset: FixedOffset,
    /// Per-request timeout for API calls
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url =
            env::var("GOBARBER_API_URL").map_err(|_| ConfigError::Missing("GOBARBER_API_URL"))?;

        let credentials_path = match env::var("GOBARBER_CREDENTIALS_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_credentials_path()?,
        };

        let utc_offset = match env::var("GOBARBER_UTC_OFFSET_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(time_utils::offset_from_minutes)
                .ok_or(ConfigError::Invalid("GOBARBER_UTC_OFFSET_MINUTES", raw))?,
            Err(_) => time_utils::local_offset(),
        };

        let http_timeout = env::var("GOBARBER_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            credentials_path,
            utc_offset,
            http_timeout: Duration::from_secs(http_timeout),
        })
    }

    /// Deterministic configuration for tests: UTC display offset and a
    /// credential file under the system temp directory.
    pub fn test_default() -> Self {
        Self {
            api_url: "http://localhost:3333".to_string(),
            credentials_path: env::temp_dir().join("gobarber-test-credentials.json"),
            utc_offset: time_utils::utc_offset(),
            http_timeout: Duration::from_secs(5),
        }
    }
}

fn default_credentials_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("gobarber").join("credentials.json"))
        .ok_or(ConfigError::Missing("GOBARBER_CREDENTIALS_PATH"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
