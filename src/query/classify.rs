//! Error classification
//!
//! Maps a failed or degraded backend response to exactly one user-facing
//! message. Precedence, highest first:
//! 1. non-empty `error` field, verbatim
//! 2. non-2xx status with a `detail` field
//! 3. the fixed connectivity message
//!
//! A transport failure (no usable response at all) always yields the
//! connectivity message.

use serde_json::Value;

use crate::query::model::{BackendResponse, QueryResult};
use crate::query::transport_types::TransportError;

/// Fallback shown when the backend is unreachable or misconfigured
pub const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the query backend. Make sure it is running and the endpoint is configured correctly.";

/// Which side of the boundary a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No usable response: connection, timeout, or unparseable body
    Transport,
    /// Well-formed response that reports failure
    Backend,
}

/// Failure of one submission, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl QueryFailure {
    pub fn transport(err: &TransportError) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: classify_transport(err),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Backend,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Choose the message for a response that is not an accepted result
pub fn classify(response: &BackendResponse) -> String {
    structured_message(response).unwrap_or_else(|| CONNECTIVITY_MESSAGE.to_string())
}

/// Rules 1 and 2; `None` means only the fallback applies
fn structured_message(response: &BackendResponse) -> Option<String> {
    if let Some(error) = response.body.error.as_deref() {
        if !error.is_empty() {
            return Some(error.to_string());
        }
    }

    if !response.is_success_status() {
        if let Some(detail) = response.body.detail.as_ref() {
            return Some(detail_text(detail));
        }
    }

    None
}

/// Message for a transport failure (the raw error is never shown)
pub fn classify_transport(_err: &TransportError) -> String {
    CONNECTIVITY_MESSAGE.to_string()
}

/// Accept a response as a `QueryResult`, or classify it as a failure
///
/// Accepted only when the status is 2xx, `success` is `true`, and no
/// non-empty `error` is present.
pub fn judge(response: BackendResponse) -> Result<QueryResult, QueryFailure> {
    let has_error = response
        .body
        .error
        .as_deref()
        .is_some_and(|e| !e.is_empty());

    if response.is_success_status() && response.body.success == Some(true) && !has_error {
        let body = response.body;
        return Ok(QueryResult {
            success: true,
            sql_query: body.sql_query,
            data: body.data,
            row_count: body.row_count,
            error: None,
        });
    }

    match structured_message(&response) {
        Some(message) => Err(QueryFailure::backend(message)),
        // Nothing structured to show: same category as an unreachable backend
        None => Err(QueryFailure {
            kind: FailureKind::Transport,
            message: CONNECTIVITY_MESSAGE.to_string(),
        }),
    }
}

fn detail_text(detail: &Value) -> String {
    match detail {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
