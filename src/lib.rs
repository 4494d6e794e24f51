//! askdata: natural-language questions against a query-translation backend
//!
//! The library is the client side of the exchange: it validates and submits
//! a question, tracks the request through Idle/Loading/Success/Error, and
//! projects the result into a column-ordered table for display.

pub mod cli;
pub mod config;
pub mod query;
pub mod render;
pub mod ui;

// Re-export the query lane
pub use query::{
    FakeTransport, HttpTransport, QueryFailure, QueryInput, QueryResult, QueryTransport,
    RequestLifecycle, RequestState, Row, TransportError,
};

// Re-export rendering
pub use render::{render, DisplayModel, ResultBody, TableView};

pub use config::{Config, Settings};
