//! Offline extractor check against an HTML fixture
//!
//! The fixture is extracted as if it had been served from [`FIXTURE_BASE_URL`], and the
//! observation is compared with an expected-result JSON file.

use crate::scanner::{Extraction, Extractor};
use crate::url::{extract_domain, same_host};
use crate::{SweepError, UrlError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use url::Url;

/// Address the fixture pretends to be served from
pub const FIXTURE_BASE_URL: &str = "https://example.com/self-test";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureCounts {
    pub internal_links: usize,
    pub external_links: usize,
    pub emails: usize,
    pub phones: usize,
}

/// What the extractor found in a fixture, with links split by host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureObservation {
    pub counts: FixtureCounts,
    pub internal_links: BTreeSet<String>,
    pub external_links: BTreeSet<String>,
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
}

impl FixtureObservation {
    pub fn from_extraction(extraction: Extraction, base_url: &Url) -> Self {
        let host = extract_domain(base_url).unwrap_or_default();
        let (internal_links, external_links): (BTreeSet<String>, BTreeSet<String>) = extraction
            .links
            .into_iter()
            .partition(|link| same_host(link, &host));

        Self {
            counts: FixtureCounts {
                internal_links: internal_links.len(),
                external_links: external_links.len(),
                emails: extraction.emails.len(),
                phones: extraction.phones.len(),
            },
            internal_links,
            external_links,
            emails: extraction.emails,
            phones: extraction.phones,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfTestReport {
    pub success: bool,
    pub expected: FixtureObservation,
    pub observed: FixtureObservation,
}

/// Extracts a fixture and compares the result with its expectation file
///
/// # Errors
///
/// Fails when either file cannot be read, the expectation is not valid JSON, or the
/// fixture is binary. A mismatch is not an error; it is reported through `success`.
pub fn run_selftest(
    fixture: &Path,
    expected: &Path,
    extractor: &Extractor,
) -> Result<SelfTestReport, SweepError> {
    let html = fs::read_to_string(fixture)?;
    let expected: FixtureObservation = serde_json::from_str(&fs::read_to_string(expected)?)?;

    let base_url = Url::parse(FIXTURE_BASE_URL).map_err(|e| UrlError::Parse(e.to_string()))?;
    let extraction = extractor.extract(&html, &base_url)?;
    let observed = FixtureObservation::from_extraction(extraction, &base_url);

    tracing::debug!(
        "Self-test observed {} internal, {} external links",
        observed.counts.internal_links,
        observed.counts.external_links
    );

    Ok(SelfTestReport {
        success: observed == expected,
        expected,
        observed,
    })
}
