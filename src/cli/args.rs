//! CLI argument parsing
//!
//! ```text
//! askdata [--config PATH] [--endpoint URL] [--json] [tui | ask <question...> | health]
//! ```
//! No subcommand means the terminal UI.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::Result;

/// Parsed CLI arguments
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "askdata",
    version,
    about = "Ask questions about your data in plain language"
)]
pub struct Args {
    /// Config file (default: ./askdata.toml when present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL; overrides config and ASKDATA_API_URL
    #[arg(long, value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Print results as JSON (ask and health modes)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

/// CLI modes
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Mode {
    /// Interactive terminal UI (default)
    Tui,

    /// Ask a single question and print the result
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        question: Vec<String>,
    },

    /// Probe the backend's health endpoint
    Health,
}

impl Args {
    /// Selected mode, defaulting to the terminal UI
    pub fn mode(&self) -> Mode {
        self.mode.clone().unwrap_or(Mode::Tui)
    }
}

impl Mode {
    /// Question text for `ask` mode
    pub fn question(&self) -> Option<String> {
        match self {
            Mode::Ask { question } => Some(question.join(" ")),
            _ => None,
        }
    }
}

/// Parse arguments (first item is the program name)
///
/// `--help` and `--version` surface as `Error::Args`; `main` uses
/// `Args::parse` instead, which prints them and exits.
pub fn parse_args<I, T>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Ok(Args::try_parse_from(args)?)
}
