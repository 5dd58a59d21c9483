//! Error types for the reconciler
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed settings, or an account that does not own
    /// exactly one zone. Nothing has been touched when this surfaces.
    #[error("configuration error: {0}")]
    Config(String),

    /// Non-2xx answer from the DNS provider; the response body is kept
    /// verbatim for diagnosis.
    #[error("DNS provider error (status {status}): {body}")]
    Provider {
        /// HTTP status code of the failed call
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Non-2xx answer from the notification channel during the flush.
    /// Already-applied DNS updates stay applied.
    #[error("notification error (status {status}): {body}")]
    Notification {
        /// HTTP status code of the failed call
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Current-IP lookup errors (transport, status, decode or parse)
    #[error("IP lookup error: {0}")]
    IpSource(String),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a DNS provider error from a failed response
    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        Self::Provider {
            status,
            body: body.into(),
        }
    }

    /// Create a notification error from a failed response
    pub fn notification(status: u16, body: impl Into<String>) -> Self {
        Self::Notification {
            status,
            body: body.into(),
        }
    }

    /// Create an IP lookup error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}
