use crate::scanner::BatchReport;
use crate::state::{DomainResult, ScanStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Wire format of a finished batch
#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub summary: SummaryBlock,
    pub results: Vec<DomainResult>,
}

/// Batch-level figures reported next to the per-URL results
#[derive(Debug, Clone, Serialize)]
pub struct SummaryBlock {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub by_status: BTreeMap<ScanStatus, usize>,
    pub duration_ms: f64,
    pub effective_concurrency: usize,
    /// Throughput extrapolated from this batch; None when the batch took no measurable time
    pub requests_per_minute: Option<f64>,
}

impl From<BatchReport> for ScanResponse {
    fn from(report: BatchReport) -> Self {
        let BatchReport {
            summary,
            duration,
            effective_concurrency,
        } = report;

        let secs = duration.as_secs_f64();
        let requests_per_minute = (secs > 0.0).then(|| round2(summary.total as f64 / secs * 60.0));

        Self {
            summary: SummaryBlock {
                total: summary.total,
                succeeded: summary.succeeded,
                failed: summary.failed,
                by_status: summary.status_breakdown(),
                duration_ms: round2(secs * 1000.0),
                effective_concurrency,
                requests_per_minute,
            },
            results: summary.results,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
