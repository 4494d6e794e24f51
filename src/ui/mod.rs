//! Terminal UI
//!
//! The UI is a surface over the query lane:
//! - the input bar edits a `QueryInput`
//! - Enter routes through `parse_command` to the lifecycle or a local command
//! - every frame draws `render::render(state)`; the UI never mutates state
//!   except through `RequestLifecycle`

pub mod handlers;
pub mod input;
pub mod state;
pub mod view;

// Re-exports
pub use input::{parse_command, render_help, Command};
pub use state::App;
pub use view::render;

/// UI result type
pub type Result<T> = std::result::Result<T, Error>;

/// UI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
