//! askdata CLI
//!
//! Modes:
//! - (none) / tui: interactive terminal UI
//! - ask <question>: one question, printed result
//! - health: backend health probe
//!
//! EXIT: /quit or Ctrl+C from the terminal UI

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use askdata::cli::{init_logging, run_cli_mode, Args, Mode, EXIT_USAGE};
use askdata::config::{Config, Settings};
use askdata::query::{HttpTransport, RequestLifecycle};
use askdata::ui::{handlers, App};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_USAGE);
        }
    };

    // Logging is best-effort: a read-only log dir must not block queries
    let log_guard = match init_logging(&settings) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: {}", e);
            None
        }
    };
    info!(endpoint = %settings.base_url, "askdata starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match args.mode() {
        Mode::Tui => {
            run_tui_mode(&settings, &runtime)?;
            Ok(())
        }
        _ => {
            let code = run_cli_mode(&args, &settings, &runtime);
            drop(runtime);
            drop(log_guard);
            std::process::exit(code);
        }
    }
}

/// Config file, then environment, then `--endpoint`
fn load_settings(args: &Args) -> askdata::config::Result<Settings> {
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_env()?;
    config.resolve(args.endpoint.as_deref())
}

/// Run the terminal UI until the user quits
fn run_tui_mode(settings: &Settings, runtime: &Runtime) -> anyhow::Result<()> {
    let transport = HttpTransport::new(settings.base_url.clone(), settings.timeout)
        .context("failed to build HTTP client")?;
    let lifecycle = RequestLifecycle::new(Arc::new(transport), runtime.handle().clone())
        .with_max_rows(settings.max_rows);
    let mut app = App::new(lifecycle);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Cleanup runs even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        warn!(error = %e, "terminal loop ended with error");
    }
    result.map_err(Into::into)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> askdata::ui::Result<()> {
    while !app.should_quit() {
        askdata::ui::render(terminal, app)?;

        // Block for input (100ms timeout)
        if poll(Duration::from_millis(100))? {
            if let Event::Key(key) = read()? {
                if key.kind == KeyEventKind::Press {
                    handlers::handle_key_event(app, key);
                }
            }
        }

        // Apply completions that arrived while waiting for input
        app.tick();
    }
    info!("terminal UI closed");
    Ok(())
}
