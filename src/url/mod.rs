//! URL handling module for Contact-Sweep
//!
//! This module normalizes scan targets, resolves link references found in pages,
//! and compares hosts for internal/external link classification.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use normalize::{normalize_target, resolve_link};
