//! Command parsing for the input bar
//!
//! INPUT ROUTING:
//! A) COMMAND: input starts with "/" and is handled locally
//!    - /quit, /q, /exit, /help, /examples, /example <n>, /clear
//! B) QUERY: anything else is submitted as a question
//!
//! Blank input parses to `Command::None` and is never submitted.

/// Parsed command result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,           // /quit, /q, /exit
    Help,           // /help, /h
    Examples,       // /examples
    Example(usize), // /example <n> (1-based on input, 0-based here)
    Clear,          // /clear
    Submit,         // Default: send the input text as a question
}

/// Parse input text into a Command
///
/// # Examples
/// ```
/// use askdata::ui::input::{parse_command, Command};
///
/// assert_eq!(parse_command("/quit"), Command::Quit);
/// assert_eq!(parse_command("/example 2"), Command::Example(1));
/// assert_eq!(parse_command("how many orders?"), Command::Submit);
/// assert_eq!(parse_command("   "), Command::None);
/// ```
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::None;
    }

    if !input.starts_with('/') {
        return Command::Submit;
    }

    let rest = &input[1..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return Command::None;
    }

    let parts: Vec<&str> = rest.splitn(2, char::is_whitespace).collect();
    let arg = parts.get(1).map(|a| a.trim()).filter(|a| !a.is_empty());

    match (parts[0], arg) {
        ("quit" | "q" | "exit", None) => Command::Quit,
        ("help" | "h", None) => Command::Help,
        ("examples", None) => Command::Examples,
        ("example", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Example(n - 1),
            _ => Command::None,
        },
        ("clear", None) => Command::Clear,
        _ => Command::None,
    }
}

/// Help text for the terminal UI
pub fn render_help() -> String {
    r#"askdata: ask questions about your data in plain language

INPUT:
    Type a question and press Enter to run it
    The generated SQL and the result table appear below

KEYBOARD SHORTCUTS:
    Enter               Submit question / run command
    Esc                 Stop waiting for a running query, or clear input
    Up/Down             Scroll result rows 1 line
    PageUp/PageDown     Scroll result rows 10 lines
    Left/Right          Scroll result columns
    Home                Jump to first row
    Ctrl+C              Exit immediately

COMMANDS (start with "/"):
    /quit, /q, /exit    Quit
    /examples           List example questions
    /example <n>        Put example <n> into the input
    /clear              Clear the input
    /help               Show this help message
"#
    .to_string()
}
