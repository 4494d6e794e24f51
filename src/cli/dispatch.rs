//! CLI mode dispatch
//!
//! Runs the non-interactive modes:
//! - ask: one submission through the regular lifecycle, printed as text or JSON
//! - health: GET /health and print the document

use std::io::Write;
use std::sync::Arc;

use tokio::runtime::{Handle, Runtime};
use tracing::{error, info};

use crate::cli::{Args, Mode, Result, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
use crate::config::Settings;
use crate::query::{
    HttpTransport, QueryResult, QueryTransport, RequestLifecycle, RequestState,
    CONNECTIVITY_MESSAGE,
};
use crate::render::{render, text::to_plain_text};

/// Exit code wrapper for CLI operations
pub type ExitCode = i32;

/// Run a non-interactive mode and return its exit code
///
/// Called from `main` for every mode except the terminal UI.
pub fn run_cli_mode(args: &Args, settings: &Settings, runtime: &Runtime) -> ExitCode {
    let transport = match HttpTransport::new(settings.base_url.clone(), settings.timeout) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_USAGE;
        }
    };

    let mut stdout = std::io::stdout();
    let outcome = match args.mode() {
        Mode::Ask { .. } => {
            let question = args.mode().question().unwrap_or_default();
            runtime.block_on(run_ask(
                Arc::new(transport),
                settings.max_rows,
                &question,
                args.json,
                &mut stdout,
            ))
        }
        Mode::Health => runtime.block_on(run_health(&transport, args.json, &mut stdout)),
        Mode::Tui => {
            eprintln!("Error: the terminal UI is not a CLI mode");
            return EXIT_USAGE;
        }
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "cli mode failed");
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Ask one question and write the rendered outcome to `out`
///
/// Exit code: 0 on success (including an empty result), 1 on a failed query,
/// 2 when the question is blank.
pub async fn run_ask<W: Write>(
    transport: Arc<dyn QueryTransport>,
    max_rows: Option<u32>,
    question: &str,
    json: bool,
    out: &mut W,
) -> Result<ExitCode> {
    let mut lifecycle = RequestLifecycle::new(transport, Handle::current()).with_max_rows(max_rows);

    if lifecycle.submit(question).is_none() {
        eprintln!("Error: the question is empty");
        return Ok(EXIT_USAGE);
    }
    lifecycle.settle().await;

    let state = lifecycle.state();
    if json {
        let payload = match state {
            RequestState::Success(result) => result.clone(),
            RequestState::Error(failure) => QueryResult {
                success: false,
                error: Some(failure.message.clone()),
                ..Default::default()
            },
            _ => QueryResult::default(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
    } else {
        writeln!(out, "{}", to_plain_text(&render(state)))?;
    }

    let code = match state {
        RequestState::Success(_) => EXIT_SUCCESS,
        _ => EXIT_FAILURE,
    };
    info!(code, state = state.name(), "ask finished");
    Ok(code)
}

/// Probe the backend and write its health document to `out`
pub async fn run_health<W: Write>(
    transport: &HttpTransport,
    json: bool,
    out: &mut W,
) -> Result<ExitCode> {
    match transport.health().await {
        Ok(doc) => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
            } else {
                writeln!(out, "Backend: {}", transport.base_url())?;
                if let Some(fields) = doc.as_object() {
                    for (key, value) in fields {
                        writeln!(out, "  {}: {}", key, crate::render::format_cell(value))?;
                    }
                }
            }
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "health probe failed");
            writeln!(out, "{}", CONNECTIVITY_MESSAGE)?;
            Ok(EXIT_FAILURE)
        }
    }
}
