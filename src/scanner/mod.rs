//! Scanner module for fetching pages and extracting contacts
//!
//! This module contains the core scanning logic, including:
//! - HTML parsing and link/contact extraction
//! - HTTP fetching under a deadline
//! - Per-URL outcome classification
//! - Bounded concurrent batch orchestration

mod domain_scanner;
mod extractor;
mod fetcher;
mod orchestrator;
mod request;

pub use domain_scanner::DomainScanner;
pub use extractor::{extract, Extraction, Extractor, ParseFailure};
pub use fetcher::{build_http_client, fetch, FetchOutcome};
pub use orchestrator::{BatchOrchestrator, BatchReport};
pub use request::ScanRequest;
