// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. A `.env` file is honored for local
//! development.

use std::env;
use std::fmt;
use std::time::Duration;

/// Default Strava REST base URL.
pub const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
/// Default Strava OAuth token endpoint.
pub const DEFAULT_STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth/token";
/// Number of recent activities pulled per run.
pub const DEFAULT_PAGE_SIZE: u32 = 30;
/// Strava rejects `per_page` above this.
pub const MAX_PAGE_SIZE: u32 = 200;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Where normalized rows are written.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Supabase (PostgREST) REST API, authenticated with the service role key.
    Supabase { url: String, service_role_key: String },
    /// Local SQLite database (`sqlite://path.db` or `sqlite::memory:`).
    Sqlite { database_url: String },
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Supabase { url, .. } => f
                .debug_struct("Supabase")
                .field("url", url)
                .field("service_role_key", &"<redacted>")
                .finish(),
            StoreConfig::Sqlite { database_url } => f
                .debug_struct("Sqlite")
                .field("database_url", database_url)
                .finish(),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    // --- Strava ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Long-lived refresh token of the synced athlete
    pub strava_refresh_token: String,
    pub strava_api_url: String,
    pub strava_oauth_url: String,
    /// Activities requested per run (first page only)
    pub page_size: u32,

    // --- Row store ---
    pub store: StoreConfig,

    // --- Runtime ---
    /// Per-request timeout for every outbound HTTP call
    pub http_timeout: Duration,
    /// Optional in-process sync schedule
    pub sync_interval: Option<Duration>,
    /// Server port
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("strava_client_id", &self.strava_client_id)
            .field("strava_client_secret", &"<redacted>")
            .field("strava_refresh_token", &"<redacted>")
            .field("strava_api_url", &self.strava_api_url)
            .field("strava_oauth_url", &self.strava_oauth_url)
            .field("page_size", &self.page_size)
            .field("store", &self.store)
            .field("http_timeout", &self.http_timeout)
            .field("sync_interval", &self.sync_interval)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store = match env::var("DATABASE_URL") {
            Ok(database_url) if !database_url.trim().is_empty() => StoreConfig::Sqlite {
                database_url: database_url.trim().to_string(),
            },
            _ => StoreConfig::Supabase {
                url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
                service_role_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
            },
        };

        let requested_page_size: u32 = parse_or("STRAVA_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let page_size = requested_page_size.clamp(1, MAX_PAGE_SIZE);
        if page_size != requested_page_size {
            tracing::warn!(
                requested = requested_page_size,
                page_size,
                "STRAVA_PAGE_SIZE out of range, clamped"
            );
        }

        let http_timeout_secs: u64 = parse_or("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        if http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "HTTP_TIMEOUT_SECS",
                reason: "must be at least 1".to_string(),
            });
        }

        let sync_interval = match env::var("SYNC_INTERVAL_SECS") {
            Ok(v) if !v.trim().is_empty() => {
                let secs: u64 = v.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "SYNC_INTERVAL_SECS",
                    reason: format!("not a number: {}", v),
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            strava_client_id: required("STRAVA_CLIENT_ID")?,
            strava_client_secret: required("STRAVA_CLIENT_SECRET")?,
            strava_refresh_token: required("STRAVA_REFRESH_TOKEN")?,
            strava_api_url: env::var("STRAVA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_URL.to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_OAUTH_URL.to_string()),
            page_size,
            store,
            http_timeout: Duration::from_secs(http_timeout_secs),
            sync_interval,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Config for testing only. Points everything at localhost and an
    /// in-memory SQLite store.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            strava_api_url: "http://127.0.0.1:9/api/v3".to_string(),
            strava_oauth_url: "http://127.0.0.1:9/oauth/token".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            store: StoreConfig::Sqlite {
                database_url: "sqlite::memory:".to_string(),
            },
            http_timeout: Duration::from_secs(5),
            sync_interval: None,
            port: 8080,
        }
    }
}

/// Read a required, trimmed, non-empty environment variable.
fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("not a number: {}", v),
        }),
        _ => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
