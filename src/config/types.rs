use serde::Deserialize;
use std::time::Duration;

/// Hard upper bound for any concurrency setting
pub const MAX_CONCURRENCY_LIMIT: usize = 64;

/// Main configuration structure for Contact-Sweep
///
/// Every section is optional in the TOML file; missing values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub scanner: ScannerConfig,
    pub extractor: ExtractorConfig,
}

/// Listener configuration for the scan service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host/IP to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Batch scanning behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Ceiling for the number of concurrent fetches in one batch
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: usize,

    /// Concurrency used when a request does not ask for one (defaults to the ceiling)
    #[serde(rename = "default-concurrency")]
    pub default_concurrency: Option<usize>,

    /// Per-URL timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Optional deadline for a whole batch (milliseconds)
    #[serde(rename = "batch-timeout-ms")]
    pub batch_timeout_ms: Option<u64>,

    /// Maximum number of redirects followed per URL
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Maximum number of URLs accepted in one batch
    #[serde(rename = "max-urls")]
    pub max_urls: usize,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl ScannerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_ms.map(Duration::from_millis)
    }

    /// Concurrency applied when a request leaves it unspecified
    pub fn effective_default_concurrency(&self) -> usize {
        self.default_concurrency
            .unwrap_or(self.max_concurrency)
            .min(self.max_concurrency)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 32,
            default_concurrency: None,
            request_timeout_ms: 15_000,
            batch_timeout_ms: None,
            max_redirects: 5,
            max_urls: 1_000,
            user_agent: format!("contact-sweep/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Contact extraction tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Shortest digit run accepted as a phone number
    #[serde(rename = "min-phone-digits")]
    pub min_phone_digits: usize,

    /// Longest digit run accepted as a phone number
    #[serde(rename = "max-phone-digits")]
    pub max_phone_digits: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_phone_digits: 7,
            max_phone_digits: 15,
        }
    }
}
