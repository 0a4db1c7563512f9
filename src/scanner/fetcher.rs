//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scanner, including:
//! - Building the shared HTTP client with the configured user agent and redirect limit
//! - GET requests under a hard deadline
//! - Error classification into a closed set of outcomes

use crate::config::ScannerConfig;
use reqwest::{header, redirect::Policy, Client};
use std::time::Duration;

/// Result of a fetch operation
///
/// Fetching never fails to the caller; every failure mode is one of these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A response body was received
    Body {
        /// HTTP status code
        status_code: u16,
        /// Final URL after redirects
        final_url: String,
        /// Content-Type header value, empty when absent
        content_type: String,
        /// Body decoded using the response charset
        content: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// DNS, connect, TLS, redirect-limit, or body read failure
    TransportError {
        /// Error description
        reason: String,
    },

    /// The deadline expired before the body was fully read
    Timeout,
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to `max_redirects`; one more hop is reported as a
/// transport error. No client-level timeout is set: every call to [`fetch`] brings
/// its own deadline.
pub fn build_http_client(config: &ScannerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a hard deadline
///
/// # Outcome Mapping
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | 2xx response, body read | `Body` |
/// | Non-2xx final response | `HttpError` |
/// | Deadline expired (connect, headers, or body) | `Timeout` |
/// | Redirect chain > limit | `TransportError` |
/// | DNS / connection refused / TLS / body decode | `TransportError` |
///
/// The request future is dropped when the deadline expires, which closes the
/// underlying connection; nothing keeps running in the background.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Deadline for the whole exchange
/// * `user_agent` - Optional per-request override of the client's user agent
pub async fn fetch(
    client: &Client,
    url: &str,
    timeout: Duration,
    user_agent: Option<&str>,
) -> FetchOutcome {
    match tokio::time::timeout(timeout, fetch_inner(client, url, user_agent)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::debug!("Fetch of {} exceeded {:?}", url, timeout);
            FetchOutcome::Timeout
        }
    }
}

async fn fetch_inner(client: &Client, url: &str, user_agent: Option<&str>) -> FetchOutcome {
    let mut request = client.get(url);
    if let Some(agent) = user_agent {
        request = request.header(header::USER_AGENT, agent);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match response.text().await {
        Ok(content) => FetchOutcome::Body {
            status_code: status.as_u16(),
            final_url,
            content_type,
            content,
        },
        Err(e) => classify_error(&e),
    }
}

/// Maps a client error to an outcome
fn classify_error(error: &reqwest::Error) -> FetchOutcome {
    if error.is_timeout() {
        FetchOutcome::Timeout
    } else if error.is_redirect() {
        FetchOutcome::TransportError {
            reason: format!("Too many redirects: {}", error),
        }
    } else if error.is_connect() {
        FetchOutcome::TransportError {
            reason: format!("Connection failed: {}", error),
        }
    } else {
        FetchOutcome::TransportError {
            reason: error.to_string(),
        }
    }
}
