//! Command and key handlers
//!
//! Input editing and submit are ignored while a query is loading; only Esc
//! (abandon), scrolling and Ctrl+C stay live.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::ui::input::{parse_command, Command};
use crate::ui::state::App;

/// Execute a parsed command
pub fn execute_command(app: &mut App, cmd: Command) {
    debug!(?cmd, "execute command");
    match cmd {
        Command::None => {}
        Command::Quit => app.quit(),
        Command::Help => app.show_help(),
        Command::Examples => {
            app.hide_help();
            app.list_examples();
        }
        Command::Example(index) => {
            app.input.clear();
            if !app.use_example(index) {
                return;
            }
            app.hide_help();
        }
        Command::Clear => app.input.clear(),
        Command::Submit => {
            app.submit();
        }
    }
}

/// Handle one key press
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ctrl+C exits from any state
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    let loading = app.is_loading();
    // Ctrl or Alt chords are shortcuts, never text. Both together is AltGr on
    // Windows keyboards and still produces a character.
    let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
    let chord = key.modifiers.intersects(altgr) && !key.modifiers.contains(altgr);
    match key.code {
        KeyCode::Char(c) if !loading && !chord => app.input.push_char(c),
        KeyCode::Backspace if !loading => app.input.backspace(),
        KeyCode::Enter if !loading => {
            let cmd = parse_command(app.input.raw());
            match cmd {
                // A submitted question stays in the field
                Command::Submit | Command::Example(_) => {}
                Command::None => {
                    let text = app.input.trimmed().to_string();
                    if text.starts_with('/') {
                        app.set_status(format!("Unknown command: {} (try /help)", text));
                    }
                }
                _ => app.input.clear(),
            }
            execute_command(app, cmd);
        }
        KeyCode::Esc => {
            if loading {
                app.abandon();
            } else if app.help_text().is_some() {
                app.hide_help();
            } else {
                app.input.clear();
            }
        }
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::Left => app.scroll_left(),
        KeyCode::Right => app.scroll_right(),
        _ => {}
    }
}
