//! Real HTTP transport using reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::query::model::QueryRequest;
use crate::query::transport_types::{HttpReply, QueryTransport, TransportError};

/// Path of the query endpoint below the configured base URL
pub const QUERY_PATH: &str = "query";
/// Path of the health endpoint below the configured base URL
pub const HEALTH_PATH: &str = "health";

/// HTTP transport against the query-translation backend
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport whose requests expire after `timeout`
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `path` below the base URL (keeps any base path prefix)
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// GET the backend's health document
    pub async fn health(&self) -> Result<serde_json::Value, TransportError> {
        let url = self.endpoint(HEALTH_PATH);
        debug!(%url, "health probe");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Network(format!("HTTP {}", status.as_u16())));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    async fn post_query(&self, request: &QueryRequest) -> Result<HttpReply, TransportError> {
        let url = self.endpoint(QUERY_PATH);
        debug!(%url, query_len = request.query.len(), "POST query");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, body_len = body.len(), "query response received");
        Ok(HttpReply { status, body })
    }
}
