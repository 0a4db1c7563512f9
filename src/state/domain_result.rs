use crate::scanner::Extraction;
use crate::state::ScanStatus;
use crate::url::{extract_domain, same_host};
use serde::Serialize;
use std::collections::BTreeSet;
use url::Url;

/// Size breakdown of a result's extracted sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultCounts {
    pub links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub emails: usize,
    pub phones: usize,
}

/// The outcome record for one scanned URL
///
/// A `DomainResult` can only be built through the per-status constructors, which keep
/// the record consistent: the HTTP status is only present on `ok` and `fetch_error`,
/// and the extracted sets are empty on every non-`ok` result. It is serialized for the
/// wire but never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainResult {
    url: String,
    status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_status: Option<u16>,
    counts: ResultCounts,
    links: BTreeSet<String>,
    emails: BTreeSet<String>,
    phones: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DomainResult {
    /// Builds a successful result from an extraction
    ///
    /// Links are classified as internal when they share the scanned URL's host.
    pub fn ok(url: impl Into<String>, http_status: u16, extraction: Extraction) -> Self {
        let url = url.into();
        let Extraction {
            links,
            emails,
            phones,
        } = extraction;

        let base_host = Url::parse(&url).ok().and_then(|u| extract_domain(&u));
        let internal_links = match &base_host {
            Some(host) => links.iter().filter(|link| same_host(link, host)).count(),
            None => 0,
        };

        let counts = ResultCounts {
            links: links.len(),
            internal_links,
            external_links: links.len() - internal_links,
            emails: emails.len(),
            phones: phones.len(),
        };

        Self {
            url,
            status: ScanStatus::Ok,
            http_status: Some(http_status),
            counts,
            links,
            emails,
            phones,
            error: None,
        }
    }

    /// Builds a fetch failure, with the status code when a response was received
    pub fn fetch_error(
        url: impl Into<String>,
        http_status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::failure(url.into(), ScanStatus::FetchError, http_status, message.into())
    }

    /// Builds a timeout result
    pub fn timeout(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::failure(url.into(), ScanStatus::Timeout, None, message.into())
    }

    /// Builds a parse failure result
    pub fn parse_error(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::failure(url.into(), ScanStatus::ParseError, None, message.into())
    }

    fn failure(url: String, status: ScanStatus, http_status: Option<u16>, message: String) -> Self {
        Self {
            url,
            status,
            http_status,
            counts: ResultCounts::default(),
            links: BTreeSet::new(),
            emails: BTreeSet::new(),
            phones: BTreeSet::new(),
            error: Some(message),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn counts(&self) -> ResultCounts {
        self.counts
    }

    pub fn links(&self) -> &BTreeSet<String> {
        &self.links
    }

    pub fn emails(&self) -> &BTreeSet<String> {
        &self.emails
    }

    pub fn phones(&self) -> &BTreeSet<String> {
        &self.phones
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if the URL was scanned successfully
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }
}
