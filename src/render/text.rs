//! Plain-text rendering for the one-shot `ask` mode

use crate::render::{DisplayModel, ResultBody, TableView};

/// Message for the neutral empty state
pub const NO_ROWS_MESSAGE: &str = "No results found. Try a different question.";

/// Render a display model as plain text (no trailing newline)
pub fn to_plain_text(model: &DisplayModel) -> String {
    match model {
        DisplayModel::Blank => String::new(),
        DisplayModel::InProgress => "Analyzing...".to_string(),
        DisplayModel::ErrorPanel { message } => format!("Error: {}", message),
        DisplayModel::Results { sql_query, body } => {
            let mut out = Vec::new();
            if let Some(sql) = sql_query {
                out.push("Generated SQL:".to_string());
                out.push(sql.clone());
                out.push(String::new());
            }
            match body {
                ResultBody::NoRows => out.push(NO_ROWS_MESSAGE.to_string()),
                ResultBody::Table(table) => out.push(table_text(table)),
            }
            out.join("\n")
        }
    }
}

/// Left-aligned, space-padded table with a header rule and a count footer
pub fn table_text(table: &TableView) -> String {
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            table
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(table.rows.len() + 3);
    lines.push(format_line(&table.columns, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &table.rows {
        lines.push(format_line(row, &widths));
    }
    lines.push(format!("({})", table.row_count_label));
    lines.join("\n")
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableView {
        TableView {
            columns: vec!["city".to_string(), "n".to_string()],
            rows: vec![
                vec!["Berlin".to_string(), "12".to_string()],
                vec!["Ulm".to_string(), "-".to_string()],
            ],
            row_count_label: "2 rows".to_string(),
        }
    }

    #[test]
    fn test_table_text_layout() {
        let text = table_text(&table());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "city   | n");
        assert_eq!(lines[1], "-------+---");
        assert_eq!(lines[2], "Berlin | 12");
        assert_eq!(lines[3], "Ulm    | -");
        assert_eq!(lines[4], "(2 rows)");
    }

    #[test]
    fn test_results_include_sql_verbatim() {
        let model = DisplayModel::Results {
            sql_query: Some("SELECT *\n  FROM \"sales\" WHERE x < 3".to_string()),
            body: ResultBody::NoRows,
        };
        let text = to_plain_text(&model);
        assert!(text.contains("SELECT *\n  FROM \"sales\" WHERE x < 3"));
        assert!(text.ends_with(NO_ROWS_MESSAGE));
    }

    #[test]
    fn test_error_text() {
        let model = DisplayModel::ErrorPanel {
            message: "bad column".to_string(),
        };
        assert_eq!(to_plain_text(&model), "Error: bad column");
    }
}
