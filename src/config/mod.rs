//! Configuration module for Contact-Sweep
//!
//! Configuration is assembled once at process start: built-in defaults, then an
//! optional TOML file, then command-line flags. The result is passed explicitly into
//! the batch orchestrator and the HTTP service.
//!
//! # Example
//!
//! ```no_run
//! use contact_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("contact-sweep.toml")).unwrap();
//! println!("Concurrency ceiling: {}", config.scanner.max_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractorConfig, ScannerConfig, ServerConfig, MAX_CONCURRENCY_LIMIT,
};

pub use parser::{load_config, parse_config};
pub use validation::validate;
