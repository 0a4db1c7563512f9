//! Output module for shaping scan results
//!
//! This module handles:
//! - Reducing per-URL results into batch summaries
//! - The JSON response returned for a batch
//! - Offline self-test of the extractor against a fixture

mod response;
mod selftest;
mod summary;

pub use response::{ScanResponse, SummaryBlock};
pub use selftest::{run_selftest, FixtureCounts, FixtureObservation, SelfTestReport, FIXTURE_BASE_URL};
pub use summary::{summarize, ScanSummary};
