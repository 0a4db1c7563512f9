//! Contact-Sweep: a concurrent link and contact scanner
//!
//! This crate fetches batches of web pages under a bounded concurrency budget, extracts
//! outbound links, email addresses and phone numbers from each page, and reports the
//! outcome per URL and for the batch as a whole.

pub mod config;
pub mod output;
pub mod scanner;
pub mod server;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Contact-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid scan request: {0}")]
    Request(#[from] RequestError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] scanner::ParseFailure),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors that reject a whole batch before any network activity
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Payload must include a non-empty 'urls' list.")]
    EmptyUrls,

    #[error("'concurrency' must be a positive integer when provided, got {0}.")]
    NonPositiveConcurrency(i64),

    #[error("'timeout' must be a positive number when provided.")]
    InvalidTimeout,

    #[error("Batch of {count} URLs exceeds the limit of {max}.")]
    TooManyUrls { count: usize, max: usize },
}

/// Result type alias for Contact-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use output::{summarize, ScanSummary};
pub use scanner::{extract, BatchOrchestrator, DomainScanner, Extraction, ScanRequest};
pub use state::{DomainResult, ScanStatus};
