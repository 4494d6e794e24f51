//! Fake transport for testing
//!
//! Replays scripted replies instead of real HTTP calls and records every
//! request it receives.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::query::model::QueryRequest;
use crate::query::transport_types::{HttpReply, QueryTransport, TransportError};

/// One scripted reply, consumed by one `post_query` call
#[derive(Debug)]
pub enum FakeReply {
    /// Resolve immediately with this reply
    Reply(HttpReply),
    /// Resolve immediately with this transport error
    Fail(TransportError),
    /// Resolve when the paired sender fires
    Gated(oneshot::Receiver<Result<HttpReply, TransportError>>),
}

/// Fake transport (scripted replies, recorded calls)
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<FakeReply>>,
    calls: Mutex<Vec<QueryRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fake that answers the first call with `status` and `body`
    pub fn with_reply(status: u16, body: &str) -> Self {
        let fake = Self::new();
        fake.push_reply(status, body);
        fake
    }

    /// Fake whose first call fails at the transport level
    pub fn with_error(err: TransportError) -> Self {
        let fake = Self::new();
        fake.push_error(err);
        fake
    }

    pub fn push_reply(&self, status: u16, body: &str) {
        lock(&self.replies).push_back(FakeReply::Reply(HttpReply::new(status, body)));
    }

    pub fn push_error(&self, err: TransportError) {
        lock(&self.replies).push_back(FakeReply::Fail(err));
    }

    /// Queue a reply that resolves only when the returned sender is used
    pub fn push_gated(&self) -> oneshot::Sender<Result<HttpReply, TransportError>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.replies).push_back(FakeReply::Gated(rx));
        tx
    }

    /// Requests received so far, in call order
    pub fn calls(&self) -> Vec<QueryRequest> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl QueryTransport for FakeTransport {
    async fn post_query(&self, request: &QueryRequest) -> Result<HttpReply, TransportError> {
        lock(&self.calls).push(request.clone());
        let next = lock(&self.replies).pop_front();

        match next {
            Some(FakeReply::Reply(reply)) => Ok(reply),
            Some(FakeReply::Fail(err)) => Err(err),
            Some(FakeReply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".to_string()))),
            None => Err(TransportError::Network("no scripted reply".to_string())),
        }
    }
}
