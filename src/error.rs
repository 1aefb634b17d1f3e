use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while talking to the market-data API.
///
/// Only [`PriceSourceError::is_retryable`] errors are retried by the
/// adapter; everything else ends the attempt for that asset.
#[derive(Error, Debug)]
pub enum PriceSourceError {
    #[error("rate limited by price source (HTTP 429)")]
    RateLimited,

    #[error("asset not found or rejected by price source (HTTP {status})")]
    NotFound { status: u16 },

    #[error("price source returned HTTP {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl PriceSourceError {
    /// Whether another attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited => true,
            Self::Status { status } => *status >= 500,
            Self::Transport(err) => err.is_timeout() || err.is_connect(),
            Self::NotFound { .. } | Self::Malformed(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    PriceSource(#[from] PriceSourceError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("channel delivery error: {0}")]
    Channel(String),

    #[error("task error: {0}")]
    Task(String),

    #[error("health check failed: {0}")]
    Unhealthy(String),
}

pub type Result<T> = std::result::Result<T, Error>;
