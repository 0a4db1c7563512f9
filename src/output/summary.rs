//! Batch summary assembly
//!
//! Reduces the ordered per-URL results of a batch into aggregate counts.

use crate::state::{DomainResult, ScanStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate report over all results of one batch
///
/// `results` is in input order, so `results[i]` belongs to the i-th submitted URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<DomainResult>,
}

impl ScanSummary {
    /// Count of results by status, including statuses that did not occur
    pub fn status_breakdown(&self) -> BTreeMap<ScanStatus, usize> {
        let mut breakdown: BTreeMap<ScanStatus, usize> =
            ScanStatus::all().into_iter().map(|s| (s, 0)).collect();

        for result in &self.results {
            *breakdown.entry(result.status()).or_insert(0) += 1;
        }

        breakdown
    }
}

/// Reduces results into a summary
///
/// `total` is the number of results, `succeeded` the number with status `ok`, and
/// `failed` everything else.
pub fn summarize(results: Vec<DomainResult>) -> ScanSummary {
    let total = results.len();
    let succeeded = results.iter().filter(|r| r.is_ok()).count();

    ScanSummary {
        total,
        succeeded,
        failed: total - succeeded,
        results,
    }
}
