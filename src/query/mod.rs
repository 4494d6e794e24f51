//! Query lane
//!
//! Everything between the input field and the result state:
//! - `model`: result and wire types
//! - `classify`: failure classification
//! - `transport*`: outbound HTTP call and its fake
//! - `lifecycle`: the Idle/Loading/Success/Error state machine
//! - `input`: the editable query text

pub mod classify;
pub mod input;
pub mod lifecycle;
pub mod model;
pub mod transport;
pub mod transport_fake;
pub mod transport_http;
pub mod transport_types;

pub use classify::{classify, classify_transport, judge, FailureKind, QueryFailure, CONNECTIVITY_MESSAGE};
pub use input::{QueryInput, EXAMPLE_QUERIES};
pub use lifecycle::{Completion, RequestLifecycle, RequestState};
pub use model::{BackendResponse, QueryRequest, QueryResult, Row, WireReply};
pub use transport::{FakeTransport, HttpReply, HttpTransport, QueryTransport, TransportError};
