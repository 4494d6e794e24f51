//! Transport types
//!
//! Common types shared across transport implementations.

use async_trait::async_trait;

use crate::query::model::QueryRequest;

/// Transport-level failures: the request could not be sent, did not finish
/// in time, or its reply could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, reset, etc.
    #[error("Network error: {0}")]
    Network(String),

    /// Request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Reply body was not a recognizable backend response
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Client could not be built from configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_decode() {
            TransportError::Malformed(err.to_string())
        } else if err.is_builder() {
            TransportError::Configuration(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Malformed(err.to_string())
    }
}

/// Raw HTTP reply: status code plus undecoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Outbound query transport
///
/// Abstraction over the HTTP client so the lifecycle can be driven by
/// `FakeTransport` in tests.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// POST one query and return the raw reply (any status code)
    async fn post_query(&self, request: &QueryRequest) -> Result<HttpReply, TransportError>;
}
