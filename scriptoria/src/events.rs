//! Event handling for the studio TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use scriptoria_core::{ArtifactKey, ExportFormat, View};

use crate::app::{App, InputMode, Overlay};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.move_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.move_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    match app.overlay() {
        Some(Overlay::NamePrompt) => return handle_name_prompt(app, key),
        Some(Overlay::Help) => return handle_help_key(app, key),
        None => {}
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Insert => handle_insert_mode(app, key),
    }
}

/// Handle keys in NORMAL mode (views and hotkeys)
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('i') => {
            if app.session.active_view() != View::Input {
                app.show_input();
            }
            app.input_mode = InputMode::Insert;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            app.generate();
            EventResult::NeedsRedraw
        }

        // Views
        KeyCode::Char('0') => {
            app.show_input();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = (c as u8 - b'1') as usize;
            app.select_view(ArtifactKey::ALL[index]);
            EventResult::NeedsRedraw
        }
        KeyCode::Tab => {
            app.cycle_view(true);
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab => {
            app.cycle_view(false);
            EventResult::NeedsRedraw
        }

        // Scrolling / shot selection
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.move_down(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.move_up(10);
            EventResult::NeedsRedraw
        }

        // Deliverable actions
        KeyCode::Char('s') | KeyCode::Enter if app.showing_shot_cards() => {
            app.shot_action();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('t') => export(app, ExportFormat::Txt),
        KeyCode::Char('p') => export(app, ExportFormat::Pdf),
        KeyCode::Char('d') => export(app, ExportFormat::Docx),

        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => EventResult::Quit,

        _ => EventResult::Continue,
    }
}

fn export(app: &mut App, format: ExportFormat) -> EventResult {
    // Export actions live on the deliverable views
    if app.session.active_view() == View::Input {
        return EventResult::Continue;
    }
    app.export(format);
    EventResult::NeedsRedraw
}

/// Handle keys in INSERT mode (story editing)
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    if let (KeyCode::Char('s'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        app.generate();
        return EventResult::NeedsRedraw;
    }

    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.type_char('\n');
            EventResult::NeedsRedraw
        }
        KeyCode::Left => {
            app.cursor_left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.cursor_home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Delete => {
            app.delete();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle keys in the welcome modal
fn handle_name_prompt(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Enter => {
            app.confirm_name();
            EventResult::NeedsRedraw
        }
        KeyCode::Esc => {
            app.skip_name();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.name_backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.type_name_char(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle key when the help overlay is open
fn handle_help_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
