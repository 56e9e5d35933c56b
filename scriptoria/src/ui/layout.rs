//! Screen layout for the studio TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the deliverables sidebar
const SIDEBAR_WIDTH: u16 = 30;

/// Areas of the main screen
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub top_bar: Rect,
    pub sidebar: Rect,
    pub main: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
}

impl AppLayout {
    pub fn calculate(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Top bar
                Constraint::Min(8),    // Sidebar + main
                Constraint::Length(1), // Status / toast
                Constraint::Length(1), // Hotkeys
            ])
            .split(area);

        let sidebar_width = SIDEBAR_WIDTH.min(rows[1].width / 3);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
            .split(rows[1]);

        Self {
            top_bar: rows[0],
            sidebar: columns[0],
            main: columns[1],
            status_bar: rows[2],
            hotkey_bar: rows[3],
        }
    }
}

/// Split the main pane into the prompt editor and the progress tracker.
pub fn split_prompt(area: Rect, tracker_visible: bool) -> (Rect, Option<Rect>) {
    if !tracker_visible {
        return (area, None);
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(8)])
        .split(area);
    (chunks[0], Some(chunks[1]))
}

/// Split the main pane into the deliverable body and the export panel.
pub fn split_artifact(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(area);
    (chunks[0], chunks[1])
}

/// A rectangle of at most `width` x `height`, centered in `area`.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
