//! Blocking HTTP plumbing shared by the fetcher and the notifier.
//!
//! Each request is tried once with certificate verification and, if that
//! attempt fails below the HTTP layer, once more with verification disabled.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};

use crate::error::TransportError;

/// Certificate handling for a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// Validate the server chain against the bundled root store.
    Verified,
    /// Accept any certificate.
    Insecure,
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsMode::Verified => write!(f, "verified"),
            TlsMode::Insecure => write!(f, "insecure"),
        }
    }
}

/// A request, independent of the client that sends it.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub json: Option<serde_json::Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            json: None,
            timeout,
        }
    }

    pub fn post_json(url: impl Into<String>, body: serde_json::Value, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            json: Some(body),
            timeout,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status and decoded body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Canonical reason phrase for the status, e.g. "Not Found".
    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
    }
}

/// Something that can perform one HTTP attempt.
///
/// A non-2xx answer is still `Ok`; only failures that prevented a response
/// from arriving are errors.
pub trait Transport {
    fn send(&self, mode: TlsMode, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, mode: TlsMode, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(mode, request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, mode: TlsMode, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(mode, request)
    }
}

/// Performs `request` with verification, falling back to one insecure attempt.
///
/// At most two attempts are made per call.
pub fn send_with_tls_fallback<T: Transport + ?Sized>(
    transport: &T,
    request: &HttpRequest,
) -> Result<HttpResponse, TransportError> {
    match transport.send(TlsMode::Verified, request) {
        Ok(response) => Ok(response),
        Err(err) => {
            warn!(
                url = %request.url,
                error = %err,
                "SSL verification failed, trying without verification"
            );
            transport.send(TlsMode::Insecure, request)
        }
    }
}

/// `Transport` backed by two blocking reqwest clients.
pub struct ReqwestTransport {
    verified: Client,
    insecure: Client,
}

impl ReqwestTransport {
    /// Clients that honor the system proxy settings.
    pub fn new() -> Result<Self> {
        Self::build(true)
    }

    /// Clients that always connect directly, ignoring proxy settings.
    pub fn direct() -> Result<Self> {
        Self::build(false)
    }

    fn build(use_proxy: bool) -> Result<Self> {
        Ok(Self {
            verified: build_client(TlsMode::Verified, use_proxy)?,
            insecure: build_client(TlsMode::Insecure, use_proxy)?,
        })
    }

    fn client(&self, mode: TlsMode) -> &Client {
        match mode {
            TlsMode::Verified => &self.verified,
            TlsMode::Insecure => &self.insecure,
        }
    }
}

fn build_client(mode: TlsMode, use_proxy: bool) -> Result<Client> {
    let mut builder = Client::builder().use_rustls_tls();
    if !use_proxy {
        builder = builder.no_proxy();
    }
    let builder = match mode {
        TlsMode::Verified => builder,
        TlsMode::Insecure => builder.danger_accept_invalid_certs(true),
    };
    builder
        .build()
        .with_context(|| format!("Failed to create {mode} HTTP client"))
}

impl Transport for ReqwestTransport {
    fn send(&self, mode: TlsMode, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, %mode, "Sending request");

        let mut builder = self
            .client(mode)
            .request(request.method.clone(), &request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| TransportError::from_reqwest(e, request.timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::from_reqwest(e, request.timeout))?;

        Ok(HttpResponse { status, body })
    }
}
