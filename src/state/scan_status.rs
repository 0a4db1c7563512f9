/// Scan status definitions for per-URL outcomes
///
/// This module defines every outcome a scanned URL can end in.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the final outcome of scanning one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// Page was fetched with a 2xx status and its content was extracted
    Ok,

    /// Page could not be fetched (transport failure or non-2xx response)
    FetchError,

    /// Per-URL or batch deadline expired before the page was fetched
    Timeout,

    /// Page was fetched but its body could not be processed as markup
    ParseError,
}

impl ScanStatus {
    /// Returns true if this represents a successful scan
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Returns true if an HTTP status code may accompany this status
    pub fn carries_http_status(&self) -> bool {
        matches!(self, Self::Ok | Self::FetchError)
    }

    /// Wire representation used in JSON reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::FetchError => "fetch_error",
            Self::Timeout => "timeout",
            Self::ParseError => "parse_error",
        }
    }

    /// Parses a status from its wire representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "ok" => Some(Self::Ok),
            "fetch_error" => Some(Self::FetchError),
            "timeout" => Some(Self::Timeout),
            "parse_error" => Some(Self::ParseError),
            _ => None,
        }
    }

    /// Returns all possible statuses
    pub fn all() -> [Self; 4] {
        [Self::Ok, Self::FetchError, Self::Timeout, Self::ParseError]
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
