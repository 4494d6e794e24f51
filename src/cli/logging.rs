//! Log setup
//!
//! The terminal UI owns stdout, so logs go to `askdata.log` in the configured
//! directory. `ASKDATA_LOG` takes an env-filter directive and overrides the
//! configured level.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::cli::{Error, Result};
use crate::config::Settings;

pub const LOG_FILE: &str = "askdata.log";
pub const ENV_LOG: &str = "ASKDATA_LOG";

/// Install the global subscriber; keep the guard alive until exit
pub fn init_logging(settings: &Settings) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&settings.log_dir)?;

    let appender = tracing_appender::rolling::never(&settings.log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(guard)
}
