//! Single-URL scanning: fetch, classify, extract

use crate::config::Config;
use crate::scanner::extractor::Extractor;
use crate::scanner::fetcher::{build_http_client, fetch, FetchOutcome};
use crate::state::DomainResult;
use crate::url::normalize_target;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// Scans one URL into one [`DomainResult`]
///
/// The scanner holds a shared HTTP client and an extractor; both are stateless, so a
/// single scanner can serve any number of concurrent scans.
#[derive(Debug, Clone)]
pub struct DomainScanner {
    client: Client,
    extractor: Extractor,
}

impl DomainScanner {
    /// Creates a scanner with a client built from the configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.scanner)?;
        Ok(Self::with_client(client, Extractor::new(&config.extractor)))
    }

    pub fn with_client(client: Client, extractor: Extractor) -> Self {
        Self { client, extractor }
    }

    /// Scans one URL
    ///
    /// # Example
    ///
    /// ```no_run
    /// use contact_sweep::{Config, DomainScanner};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let scanner = DomainScanner::new(&Config::default())?;
    /// let result = scanner.scan("example.com", Duration::from_secs(10)).await;
    /// println!("{}: {}", result.url(), result.status());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scan(&self, url: &str, timeout: Duration) -> DomainResult {
        self.scan_gated(url, timeout, None, None).await
    }

    /// Scans one URL, holding a permit from `gate` for the duration of the fetch only
    ///
    /// Extraction runs after the permit is released, so the gate bounds in-flight
    /// network operations and nothing else.
    pub async fn scan_gated(
        &self,
        url: &str,
        timeout: Duration,
        user_agent: Option<&str>,
        gate: Option<&Semaphore>,
    ) -> DomainResult {
        let target = match normalize_target(url) {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!("Rejected scan target {:?}: {}", url, e);
                return DomainResult::fetch_error(url.trim(), None, e.to_string());
            }
        };

        let permit = match gate {
            Some(semaphore) => semaphore.acquire().await.ok(),
            None => None,
        };

        let outcome = fetch(&self.client, target.as_str(), timeout, user_agent).await;
        drop(permit);

        let result = self.classify(&target, outcome);
        match result.error() {
            None => tracing::debug!(
                "Scanned {}: {} links, {} emails, {} phones",
                result.url(),
                result.links().len(),
                result.emails().len(),
                result.phones().len()
            ),
            Some(error) => {
                tracing::warn!("Scan of {} ended in {}: {}", result.url(), result.status(), error)
            }
        }
        result
    }

    /// Maps a fetch outcome to a result
    ///
    /// # Mapping
    ///
    /// | Outcome | Status |
    /// |---------|--------|
    /// | `Body` with 2xx | `ok`, or `parse_error` if the body is not markup |
    /// | `Body` with other status | `fetch_error` with the status |
    /// | `HttpError` | `fetch_error` with the status |
    /// | `Timeout` | `timeout` |
    /// | `TransportError` | `fetch_error` with the reason |
    pub fn classify(&self, target: &Url, outcome: FetchOutcome) -> DomainResult {
        let url = target.as_str();

        match outcome {
            FetchOutcome::Body {
                status_code,
                final_url,
                content,
                ..
            } if (200..300).contains(&status_code) => {
                // Relative links resolve against where the redirects ended up
                let base = Url::parse(&final_url).unwrap_or_else(|_| target.clone());
                match self.extractor.extract(&content, &base) {
                    Ok(extraction) => DomainResult::ok(url, status_code, extraction),
                    Err(e) => DomainResult::parse_error(url, e.to_string()),
                }
            }
            FetchOutcome::Body { status_code, .. } | FetchOutcome::HttpError { status_code } => {
                DomainResult::fetch_error(url, Some(status_code), format!("HTTP {}", status_code))
            }
            FetchOutcome::Timeout => DomainResult::timeout(url, "Request timed out"),
            FetchOutcome::TransportError { reason } => DomainResult::fetch_error(url, None, reason),
        }
    }
}
