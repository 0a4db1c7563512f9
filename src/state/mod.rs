//! State module for per-URL scan outcomes
//!
//! # Components
//!
//! - `ScanStatus`: The closed set of outcomes a scanned URL can end in
//! - `DomainResult`: The immutable outcome record for one scanned URL

mod domain_result;
mod scan_status;

// Re-export main types
pub use domain_result::{DomainResult, ResultCounts};
pub use scan_status::ScanStatus;
