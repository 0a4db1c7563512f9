use crate::config::{ScannerConfig, MAX_CONCURRENCY_LIMIT};
use crate::RequestError;
use std::time::Duration;

/// A validated batch of scan targets
///
/// Invariants: at least one URL, `concurrency >= 1`, and a non-zero per-URL timeout.
/// URLs keep their order and duplicates are kept as separate entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    urls: Vec<String>,
    concurrency: usize,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ScanRequest {
    /// Builds a request, clamping concurrency to [`MAX_CONCURRENCY_LIMIT`]
    pub fn new(
        urls: Vec<String>,
        concurrency: usize,
        timeout: Duration,
    ) -> Result<Self, RequestError> {
        if urls.is_empty() {
            return Err(RequestError::EmptyUrls);
        }
        if concurrency == 0 {
            return Err(RequestError::NonPositiveConcurrency(0));
        }
        if timeout.is_zero() {
            return Err(RequestError::InvalidTimeout);
        }

        Ok(Self {
            urls,
            concurrency: concurrency.min(MAX_CONCURRENCY_LIMIT),
            timeout,
            user_agent: None,
        })
    }

    /// Builds a request from loosely-typed client input
    ///
    /// # Resolution Rules
    ///
    /// - Missing concurrency uses the configured default
    /// - Requested concurrency must be positive and is clamped to `max_concurrency`
    /// - Missing timeout uses the configured per-URL timeout
    /// - Requested timeout (seconds) must be a positive finite number
    /// - The batch may not exceed `max_urls`
    pub fn resolve(
        urls: Vec<String>,
        concurrency: Option<i64>,
        timeout_secs: Option<f64>,
        config: &ScannerConfig,
    ) -> Result<Self, RequestError> {
        if urls.is_empty() {
            return Err(RequestError::EmptyUrls);
        }
        if urls.len() > config.max_urls {
            return Err(RequestError::TooManyUrls {
                count: urls.len(),
                max: config.max_urls,
            });
        }

        let concurrency = match concurrency {
            None => config.effective_default_concurrency(),
            Some(requested) if requested <= 0 => {
                return Err(RequestError::NonPositiveConcurrency(requested))
            }
            Some(requested) => usize::try_from(requested)
                .unwrap_or(usize::MAX)
                .min(config.max_concurrency),
        };

        let timeout = match timeout_secs {
            None => config.request_timeout(),
            Some(secs) if secs > 0.0 => {
                Duration::try_from_secs_f64(secs).map_err(|_| RequestError::InvalidTimeout)?
            }
            Some(_) => return Err(RequestError::InvalidTimeout),
        };

        Self::new(urls, concurrency, timeout)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}
