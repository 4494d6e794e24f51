//! Result model and wire types
//!
//! Value types only. The backend body is parsed into `WireReply` first and
//! only becomes a `QueryResult` after `classify::judge` accepts it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::transport_types::TransportError;

/// One record of a result set: column name to scalar value.
///
/// Backed by an insertion-ordered map, so key order is the order the backend
/// sent.
pub type Row = serde_json::Map<String, Value>;

/// Outbound request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    /// Trimmed natural-language question
    pub query: String,
    /// Row cap forwarded to the backend (omitted when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, max_rows: Option<u32>) -> Self {
        Self {
            query: query.into(),
            max_rows,
        }
    }
}

/// Accepted query result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// Rows of the result (empty slice when `data` is absent)
    pub fn rows(&self) -> &[Row] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// `row_count` when the backend sent one, otherwise the number of rows
    pub fn effective_row_count(&self) -> u64 {
        self.row_count.unwrap_or(self.rows().len() as u64)
    }
}

/// Response body exactly as the backend may send it
///
/// Every field is optional here; `BackendResponse::parse` decides which
/// shapes are acceptable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WireReply {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub sql_query: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Row>>,
    #[serde(default)]
    pub row_count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
    /// Present on non-2xx replies (string, or a validation error list)
    #[serde(default)]
    pub detail: Option<Value>,
}

/// A well-formed HTTP response from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: WireReply,
}

impl BackendResponse {
    /// Parse a raw HTTP reply
    ///
    /// Fails with `TransportError::Malformed` when the body is not JSON, when
    /// a row is not an object, or when a 2xx body carries neither `success`
    /// nor `error`.
    pub fn parse(status: u16, body: &str) -> Result<Self, TransportError> {
        let reply: WireReply = serde_json::from_str(body)
            .map_err(|e| TransportError::Malformed(e.to_string()))?;

        if is_success_status(status) && reply.success.is_none() && reply.error.is_none() {
            return Err(TransportError::Malformed(
                "response has neither `success` nor `error`".to_string(),
            ));
        }

        Ok(Self {
            status,
            body: reply,
        })
    }

    pub fn is_success_status(&self) -> bool {
        is_success_status(self.status)
    }
}

fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}
