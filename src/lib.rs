//! Driftline: a horizontally scalable, politeness-respecting web crawler.
//!
//! A pool of stateless workers drains a shared URL frontier, fetches pages
//! over HTTP(S), extracts outbound links, and persists results to a document
//! store. Coordination between workers — across processes, not just tasks —
//! happens entirely through atomic operations on a shared key-value store.

pub mod config;
pub mod crawler;
pub mod kv;
pub mod output;
pub mod robots;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Top-level error type for driftline operations.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("KV store error: {0}")]
    Kv(#[from] redis::RedisError),

    #[error("page store error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load .env file: {0}")]
    Dotenv(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for driftline operations.
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub use config::Config;
