//! Result rendering
//!
//! Pure projection of a `RequestState` into what the screen shows. Nothing
//! here knows about the terminal; `ui::view` draws a `DisplayModel` and
//! `render::text` prints one.
//!
//! Column policy: the columns are the keys of the first row, in the order the
//! backend sent them. Every row is looked up by column name, so a row with a
//! different key order still lines up, a key missing from a row shows the
//! placeholder, and keys that only later rows carry are not shown.

pub mod text;

use serde_json::Value;
use tracing::debug;

use crate::query::{QueryResult, RequestState, Row};

/// Shown for null or missing cells
pub const PLACEHOLDER: &str = "-";

/// What the result area shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayModel {
    /// Nothing submitted yet
    Blank,
    /// Submission in progress; input and submit are locked
    InProgress,
    /// Error panel with the message verbatim
    ErrorPanel { message: String },
    /// Successful result
    Results {
        sql_query: Option<String>,
        body: ResultBody,
    },
}

impl DisplayModel {
    /// Whether the input field and submit control must be disabled
    pub fn input_locked(&self) -> bool {
        matches!(self, DisplayModel::InProgress)
    }

    pub fn table(&self) -> Option<&TableView> {
        match self {
            DisplayModel::Results {
                body: ResultBody::Table(table),
                ..
            } => Some(table),
            _ => None,
        }
    }
}

/// Body of a successful result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultBody {
    /// Neutral empty state (not an error)
    NoRows,
    Table(TableView),
}

/// Column-ordered, display-ready table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count_label: String,
}

/// Project the current state
pub fn render(state: &RequestState) -> DisplayModel {
    match state {
        RequestState::Idle => DisplayModel::Blank,
        RequestState::Loading => DisplayModel::InProgress,
        RequestState::Error(failure) => DisplayModel::ErrorPanel {
            message: failure.message.clone(),
        },
        RequestState::Success(result) => render_result(result),
    }
}

fn render_result(result: &QueryResult) -> DisplayModel {
    let body = match result.rows() {
        [] => ResultBody::NoRows,
        rows => ResultBody::Table(build_table(rows, result.effective_row_count())),
    };

    DisplayModel::Results {
        sql_query: result.sql_query.clone(),
        body,
    }
}

fn build_table(rows: &[Row], row_count: u64) -> TableView {
    let columns: Vec<String> = rows
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();

    let cells = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let extra = row.keys().filter(|k| !columns.contains(*k)).count();
            if extra > 0 {
                debug!(row = index, extra, "row has keys outside the column set");
            }
            columns
                .iter()
                .map(|column| row.get(column).map_or_else(|| PLACEHOLDER.to_string(), format_cell))
                .collect()
        })
        .collect();

    TableView {
        columns,
        rows: cells,
        row_count_label: row_count_label(row_count),
    }
}

/// Display text for one cell value
///
/// null → placeholder; objects and arrays → compact JSON; anything else → its
/// plain string form (strings unquoted).
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// "1 row" or "N rows"
pub fn row_count_label(count: u64) -> String {
    if count == 1 {
        "1 row".to_string()
    } else {
        format!("{} rows", count)
    }
}
