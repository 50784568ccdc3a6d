//! Retrieves the monitored page and turns it into a poll result.

use std::time::Duration;

use tracing::debug;

use crate::config::MonitorConfig;
use crate::error::FetchError;
use crate::extract::{extract, PageStatus, RawPage};
use crate::http::{send_with_tls_fallback, HttpRequest, Transport};

/// Outcome of one polling cycle's fetch-and-extract step.
pub type PollResult = Result<PageStatus, FetchError>;

/// Anything the monitor can poll for the current page status.
pub trait StatusSource {
    fn poll(&self) -> PollResult;
}

/// GET `url` with `headers`, falling back to an unverified attempt once.
///
/// Non-2xx answers are errors and are not retried.
pub fn fetch<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    headers: &[(&str, &str)],
    timeout: Duration,
) -> Result<RawPage, FetchError> {
    let request = headers
        .iter()
        .fold(HttpRequest::get(url, timeout), |req, (name, value)| {
            req.header(*name, *value)
        });

    let response = send_with_tls_fallback(transport, &request)?;
    if !response.is_success() {
        return Err(FetchError::HttpStatus {
            status: response.status,
            reason: response.reason().to_string(),
            url: url.to_string(),
        });
    }

    Ok(RawPage {
        url: url.to_string(),
        status: response.status,
        html: response.body,
    })
}

/// Polls a fixed page through a `Transport`.
pub struct Fetcher<T> {
    transport: T,
    url: String,
    user_agent: String,
    timeout: Duration,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, config: &MonitorConfig) -> Self {
        Self {
            transport,
            url: config.website_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.request_timeout,
        }
    }

    pub fn fetch(&self) -> Result<RawPage, FetchError> {
        fetch(
            &self.transport,
            &self.url,
            &[("User-Agent", self.user_agent.as_str())],
            self.timeout,
        )
    }
}

impl<T: Transport> StatusSource for Fetcher<T> {
    fn poll(&self) -> PollResult {
        let page = self.fetch()?;
        let status = extract(&page);
        debug!(
            is_full = status.is_full,
            is_open = status.is_open,
            snippet = %status.snippet,
            "Extracted page status"
        );
        Ok(status)
    }
}
