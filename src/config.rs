/// Configuration management for timeline-service
///
/// Loads configuration from environment variables.
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Feed write/read tuning
    pub feed: FeedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL. When unset the service runs on the in-memory store
    /// (local development and tests only).
    pub url: Option<String>,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Min connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Feed tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Max timeline entries per bulk insert during fan-out
    #[serde(default = "default_fanout_chunk_size")]
    pub fanout_chunk_size: usize,
    /// Attempts for the optimistic-lock like before surfacing a conflict
    #[serde(default = "default_like_max_attempts")]
    pub like_max_attempts: u32,
    /// Base backoff between optimistic-lock retries, doubled per attempt
    #[serde(default = "default_like_backoff_ms")]
    pub like_backoff_ms: u64,
    /// Page size applied when a cursor request omits `size`
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
}

// Default values
fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_fanout_chunk_size() -> usize {
    500
}

fn default_like_max_attempts() -> u32 {
    3
}

fn default_like_backoff_ms() -> u64 {
    40
}

fn default_page_size() -> i64 {
    10
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT", 8080),
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL").ok(),
            max_connections: env_parse("DB_MAX_CONNECTIONS", default_max_connections()),
            min_connections: env_parse("DB_MIN_CONNECTIONS", default_min_connections()),
        };

        let feed = FeedConfig {
            fanout_chunk_size: env_parse("FANOUT_CHUNK_SIZE", default_fanout_chunk_size()),
            like_max_attempts: env_parse("LIKE_MAX_ATTEMPTS", default_like_max_attempts()),
            like_backoff_ms: env_parse("LIKE_BACKOFF_MS", default_like_backoff_ms()),
            default_page_size: env_parse("DEFAULT_PAGE_SIZE", default_page_size()),
        };

        Ok(Config {
            app,
            database,
            feed,
        })
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            fanout_chunk_size: default_fanout_chunk_size(),
            like_max_attempts: default_like_max_attempts(),
            like_backoff_ms: default_like_backoff_ms(),
            default_page_size: default_page_size(),
        }
    }
}
