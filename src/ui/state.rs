//! Application state for the terminal UI
//!
//! State is split between:
//! - Transient UI state (input text, scroll offset, status line, help toggle)
//! - Request state, owned by `RequestLifecycle` and only read here

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::query::{QueryInput, RequestLifecycle, RequestState, EXAMPLE_QUERIES};
use crate::render::{render, DisplayModel};
use crate::ui::input::render_help;

/// Main application state
pub struct App {
    /// Current input text
    pub input: QueryInput,
    lifecycle: RequestLifecycle,
    /// Set by the lifecycle observer on every transition
    state_changed: Arc<AtomicBool>,
    /// First visible result row
    scroll_offset: usize,
    /// First visible result column
    column_offset: usize,
    /// One-line message under the result area
    status: Option<String>,
    /// Help text replaces the result area while set
    help_text: Option<String>,
    should_quit: bool,
}

impl App {
    /// Create the app around a lifecycle
    pub fn new(mut lifecycle: RequestLifecycle) -> Self {
        let state_changed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&state_changed);
        lifecycle.subscribe(move |_| flag.store(true, Ordering::SeqCst));

        Self {
            input: QueryInput::new(),
            lifecycle,
            state_changed,
            scroll_offset: 0,
            column_offset: 0,
            status: None,
            help_text: None,
            should_quit: false,
        }
    }

    /// Current request state (read-only snapshot)
    pub fn request_state(&self) -> &RequestState {
        self.lifecycle.state()
    }

    /// Projection drawn by the view
    pub fn display(&self) -> DisplayModel {
        render(self.lifecycle.state())
    }

    pub fn is_loading(&self) -> bool {
        self.lifecycle.is_loading()
    }

    /// Submit the input text; false when the submit was inert
    pub fn submit(&mut self) -> bool {
        let accepted = self.input.submit(&mut self.lifecycle).is_some();
        if accepted {
            self.help_text = None;
            self.status = None;
        }
        accepted
    }

    /// Stop waiting for the running query
    pub fn abandon(&mut self) -> bool {
        let abandoned = self.lifecycle.abandon();
        if abandoned {
            self.status = Some("Stopped waiting for the previous question".to_string());
        }
        abandoned
    }

    /// Apply arrived completions; called once per event-loop tick
    pub fn tick(&mut self) {
        self.lifecycle.process_events();
        if self.state_changed.swap(false, Ordering::SeqCst) {
            self.scroll_offset = 0;
            self.column_offset = 0;
        }
    }

    /// Seed the input with example `index` (0-based)
    pub fn use_example(&mut self, index: usize) -> bool {
        let loading = self.is_loading();
        let used = self.input.use_example(index, loading);
        if !used && !loading {
            self.status = Some(format!(
                "No example {} (1-{} available)",
                index + 1,
                EXAMPLE_QUERIES.len()
            ));
        }
        used
    }

    /// Put the example list on the status line
    pub fn list_examples(&mut self) {
        let list = EXAMPLE_QUERIES
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}: {}", i + 1, q))
            .collect::<Vec<_>>()
            .join("  |  ");
        self.status = Some(list);
    }

    pub fn show_help(&mut self) {
        self.help_text = Some(render_help());
    }

    pub fn hide_help(&mut self) {
        self.help_text = None;
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let rows = self.display().table().map_or(0, |t| t.rows.len());
        let max = rows.saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn column_offset(&self) -> usize {
        self.column_offset
    }

    /// Shift the table one column right, keeping the last column visible
    pub fn scroll_right(&mut self) {
        let columns = self.display().table().map_or(0, |t| t.columns.len());
        self.column_offset = (self.column_offset + 1).min(columns.saturating_sub(1));
    }

    pub fn scroll_left(&mut self) {
        self.column_offset = self.column_offset.saturating_sub(1);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
