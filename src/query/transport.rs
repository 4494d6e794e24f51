//! Query transport
//!
//! The lifecycle only sees `QueryTransport`; `HttpTransport` talks to the
//! real backend and `FakeTransport` replays scripted replies.

pub use crate::query::transport_fake::{FakeReply, FakeTransport};
pub use crate::query::transport_http::HttpTransport;
pub use crate::query::transport_types::{HttpReply, QueryTransport, TransportError};
