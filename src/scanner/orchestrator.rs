//! Batch orchestrator - bounded fan-out over a list of URLs
//!
//! Every URL becomes its own task. A semaphore sized to the effective concurrency
//! bounds how many of them hold a network operation at once, and a single collection
//! loop writes each finished result into the slot of its input index. Completion order
//! therefore never affects result order.

use crate::config::Config;
use crate::output::{summarize, ScanSummary};
use crate::scanner::domain_scanner::DomainScanner;
use crate::scanner::request::ScanRequest;
use crate::state::DomainResult;
use crate::url::normalize_target;
use crate::SweepError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A finished batch together with how it ran
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub summary: ScanSummary,

    /// Wall-clock time from first launch to last result
    pub duration: Duration,

    /// Number of fetches allowed in flight at once
    pub effective_concurrency: usize,
}

/// Runs batches of scans under a concurrency bound
///
/// The orchestrator keeps no state between batches; it only carries the process-wide
/// settings it was built with.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    scanner: Arc<DomainScanner>,
    batch_timeout: Option<Duration>,
}

impl BatchOrchestrator {
    /// Creates an orchestrator from process configuration
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOrchestrator)` - Ready to run batches
    /// * `Err(SweepError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, SweepError> {
        let scanner = DomainScanner::new(config)?;
        Ok(Self::with_scanner(scanner, config.scanner.batch_timeout()))
    }

    pub fn with_scanner(scanner: DomainScanner, batch_timeout: Option<Duration>) -> Self {
        Self {
            scanner: Arc::new(scanner),
            batch_timeout,
        }
    }

    /// Runs a batch and returns its summary
    ///
    /// # Example
    ///
    /// ```no_run
    /// use contact_sweep::{BatchOrchestrator, Config, ScanRequest};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let orchestrator = BatchOrchestrator::new(&Config::default())?;
    /// let urls = vec!["https://example.com".to_string(), "example.org".to_string()];
    /// let request = ScanRequest::new(urls, 4, Duration::from_secs(10))?;
    ///
    /// let summary = orchestrator.run(&request).await;
    /// assert_eq!(summary.total, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, request: &ScanRequest) -> ScanSummary {
        self.run_report(request).await.summary
    }

    /// Runs a batch and returns its summary with timing information
    ///
    /// Never returns early on a failed URL. When a batch deadline is configured and
    /// expires, every pending scan is aborted and recorded as `timeout`.
    pub async fn run_report(&self, request: &ScanRequest) -> BatchReport {
        let started = Instant::now();
        let urls = request.urls();
        let effective_concurrency = request.concurrency().min(urls.len()).max(1);

        tracing::info!(
            "Scanning {} URLs with concurrency {}",
            urls.len(),
            effective_concurrency
        );

        let gate = Arc::new(Semaphore::new(effective_concurrency));
        let mut slots: Vec<Option<DomainResult>> = vec![None; urls.len()];
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            let scanner = Arc::clone(&self.scanner);
            let gate = Arc::clone(&gate);
            let url = url.clone();
            let timeout = request.timeout();
            let user_agent = request.user_agent().map(str::to_string);

            tasks.spawn(async move {
                let result = scanner
                    .scan_gated(&url, timeout, user_agent.as_deref(), Some(&gate))
                    .await;
                (index, result)
            });
        }

        // Single writer: only this loop touches the slots
        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, result)) => slots[index] = Some(result),
                    Err(e) => tracing::error!("Scan task ended abnormally: {}", e),
                }
            }
        };

        let finished = match self.batch_timeout {
            Some(limit) => tokio::time::timeout(limit, collect).await.is_ok(),
            None => {
                collect.await;
                true
            }
        };

        if !finished {
            tracing::warn!(
                "Batch deadline exceeded, aborting {} pending scans",
                tasks.len()
            );
            tasks.abort_all();

            // Scans that finished in the meantime still count; aborted ones join as cancelled
            while let Some(joined) = tasks.join_next().await {
                if let Ok((index, result)) = joined {
                    slots[index] = Some(result);
                }
            }
        }

        let results = slots
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| {
                    if finished {
                        DomainResult::fetch_error(display_url(url), None, "scan did not complete")
                    } else {
                        DomainResult::timeout(display_url(url), "batch deadline exceeded")
                    }
                })
            })
            .collect();

        let summary = summarize(results);
        let duration = started.elapsed();

        tracing::info!(
            "Batch finished: {} succeeded, {} failed in {:?}",
            summary.succeeded,
            summary.failed,
            duration
        );

        BatchReport {
            summary,
            duration,
            effective_concurrency,
        }
    }
}

/// The URL as it would appear in a result for this input
fn display_url(input: &str) -> String {
    normalize_target(input)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| input.trim().to_string())
}
