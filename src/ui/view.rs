//! Panel rendering
//!
//! Layout, top to bottom:
//! - Input bar (3 lines)
//! - Generated SQL panel (only when the result carries SQL)
//! - Result area: blank hint, progress, error panel, empty state, or table
//! - Status line (1 line)

use ratatui::style::Stylize;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};

use crate::render::{DisplayModel, ResultBody, TableView};
use crate::ui::state::App;

/// Widest a column is drawn before its text is cut off
const MAX_COLUMN_WIDTH: usize = 40;
/// Gap between table columns
const COLUMN_SPACING: u16 = 2;
/// Rows the result area keeps when the SQL panel grows
const MIN_RESULT_HEIGHT: u16 = 5;
/// Input bar and status line
const FIXED_HEIGHT: u16 = 4;

/// Render the main UI
pub fn render<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> std::io::Result<()> {
    terminal.draw(|f| draw(f, app))?;
    Ok(())
}

/// Draw one frame
pub fn draw(f: &mut Frame, app: &App) {
    let display = app.display();
    let sql = match &display {
        DisplayModel::Results {
            sql_query: Some(sql),
            ..
        } => Some(sql.as_str()),
        _ => None,
    };
    let sql_height = sql.map_or(0, |s| sql_panel_height(s, f.area()));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(sql_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_input_bar(f, app, &display, chunks[0]);
    if let Some(sql) = sql {
        render_sql_panel(f, sql, chunks[1]);
    }
    match app.help_text() {
        Some(help) => render_help_panel(f, help, chunks[2]),
        None => render_result_area(f, app, &display, chunks[2]),
    }
    render_status_line(f, app, chunks[3]);
}

fn render_input_bar(f: &mut Frame, app: &App, display: &DisplayModel, area: Rect) {
    let locked = display.input_locked();
    let (title, style) = if locked {
        (" Your question (analyzing...) ", Style::default().fg(Color::DarkGray))
    } else {
        (" Your question ", Style::default().fg(Color::White))
    };

    let mut spans = vec![Span::styled(app.input.raw(), style)];
    if !locked {
        spans.push(Span::styled("█", Style::default().fg(Color::Magenta)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if locked {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Magenta)
            }),
    );
    f.render_widget(input, area);
}

fn sql_text(sql: &str) -> Paragraph<'_> {
    let lines: Vec<Line> = sql
        .lines()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Green))))
        .collect();
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

/// Wrapped SQL line count at `width` (inside the borders)
fn sql_line_count(sql: &str, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    sql_text(sql).line_count(width).min(u16::MAX as usize) as u16
}

/// Panel height for the whole wrapped SQL, leaving room for the results
fn sql_panel_height(sql: &str, screen: Rect) -> u16 {
    let wanted = sql_line_count(sql, screen.width.saturating_sub(2)).saturating_add(2);
    let room = screen.height.saturating_sub(FIXED_HEIGHT + MIN_RESULT_HEIGHT);
    wanted.min(room)
}

/// SQL is drawn exactly as received, wrapped to the panel width
fn render_sql_panel(f: &mut Frame, sql: &str, area: Rect) {
    let needed = sql_line_count(sql, area.width.saturating_sub(2));
    let title = if needed > area.height.saturating_sub(2) {
        " Generated SQL (truncated: enlarge the window or use `askdata ask`) "
    } else {
        " Generated SQL "
    };
    let panel = sql_text(sql).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(panel, area);
}

fn render_result_area(f: &mut Frame, app: &App, display: &DisplayModel, area: Rect) {
    match display {
        DisplayModel::Blank => {
            let hint = Paragraph::new(vec![
                Line::from("Ask a question about your data and press Enter."),
                Line::from(Span::styled(
                    "/examples for ideas, /help for commands",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Results "));
            f.render_widget(hint, area);
        }
        DisplayModel::InProgress => {
            let progress = Paragraph::new(Line::from(Span::styled(
                "Analyzing...",
                Style::default().fg(Color::Yellow),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Results "));
            f.render_widget(progress, area);
        }
        DisplayModel::ErrorPanel { message } => {
            let panel = Paragraph::new(vec![
                Line::from(Span::styled("Error", Style::default().fg(Color::Red).bold())),
                Line::from(""),
                Line::from(Span::styled(message.as_str(), Style::default().fg(Color::LightRed))),
            ])
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Error ")
                    .border_style(Style::default().fg(Color::Red)),
            );
            f.render_widget(panel, area);
        }
        DisplayModel::Results {
            body: ResultBody::NoRows,
            ..
        } => {
            let empty = Paragraph::new(vec![
                Line::from(Span::styled(
                    "No results found",
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    "Try a different question",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Results ")
                    .border_style(Style::default().fg(Color::Yellow)),
            );
            f.render_widget(empty, area);
        }
        DisplayModel::Results {
            body: ResultBody::Table(table),
            ..
        } => render_table(f, table, app.scroll_offset(), app.column_offset(), area),
    }
}

fn render_table(
    f: &mut Frame,
    table: &TableView,
    row_offset: usize,
    column_offset: usize,
    area: Rect,
) {
    let first = column_offset.min(table.columns.len().saturating_sub(1));

    let widths: Vec<u16> = (first..table.columns.len())
        .map(|i| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(table.columns[i].chars().count()))
                .max()
                .unwrap_or(1);
            widest.min(MAX_COLUMN_WIDTH) as u16
        })
        .collect();

    // Columns that fit inside the borders, starting at `first`
    let inner = area.width.saturating_sub(2);
    let mut used = 0u16;
    let mut fitting = 0usize;
    for width in &widths {
        let next = used
            .saturating_add(*width)
            .saturating_add(if fitting > 0 { COLUMN_SPACING } else { 0 });
        if next > inner && fitting > 0 {
            break;
        }
        used = next;
        fitting += 1;
    }
    let last = first + fitting;

    let header = Row::new(table.columns[first..last].iter().map(|c| {
        Cell::from(c.to_uppercase()).style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = table.rows.iter().skip(row_offset).map(|row| {
        Row::new(
            row.iter()
                .skip(first)
                .take(fitting)
                .map(|cell| Cell::from(clip_cell(cell))),
        )
    });

    let title = if first == 0 && last == table.columns.len() {
        format!(" Results ({}) ", table.row_count_label)
    } else {
        format!(
            " Results ({}, columns {}-{} of {}, Left/Right to scroll) ",
            table.row_count_label,
            first + 1,
            last,
            table.columns.len()
        )
    };
    let constraints = widths[..fitting].iter().map(|w| Constraint::Length(*w));
    let widget = Table::new(rows, constraints)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, area);
}

/// Cut a cell to the column cap, marking the cut with an ellipsis
fn clip_cell(cell: &str) -> String {
    if cell.chars().count() <= MAX_COLUMN_WIDTH {
        return cell.to_string();
    }
    let mut clipped: String = cell.chars().take(MAX_COLUMN_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}

fn render_help_panel(f: &mut Frame, help: &str, area: Rect) {
    let lines: Vec<Line> = help.lines().map(|l| Line::from(l.to_string())).collect();
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (Esc to close) "),
        );
    f.render_widget(panel, area);
}

fn render_status_line(f: &mut Frame, app: &App, area: Rect) {
    let state = app.request_state().name();
    let mut spans = vec![Span::styled(
        format!("[{}] ", state),
        Style::default().fg(Color::Cyan),
    )];
    match app.status() {
        Some(status) => spans.push(Span::raw(status)),
        None => spans.push(Span::styled(
            "Enter: submit  Esc: stop/clear  /help  Ctrl+C: quit",
            Style::default().fg(Color::DarkGray),
        )),
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
