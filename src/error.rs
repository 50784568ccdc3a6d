//! Error types for the fetch and notify paths.

use std::time::Duration;

use thiserror::Error;

/// Failure below the HTTP layer: DNS, connect, TLS handshake, timeout, body read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("{0}")]
    Failed(String),
}

impl TransportError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return Self::Timeout(timeout);
        }
        // reqwest's Display drops the underlying cause (e.g. the TLS reason)
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Failed(message)
    }
}

/// Why a page fetch produced no usable page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("HTTP {status} {reason} for url ({url})")]
    HttpStatus {
        status: u16,
        reason: String,
        url: String,
    },
}

/// Why a webhook message was not delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("webhook answered HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}
