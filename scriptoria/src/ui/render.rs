//! Render orchestration for the studio TUI

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use scriptoria_core::{ArtifactKey, RenderedArtifact, View};

use crate::app::{App, InputMode, Overlay};
use crate::ui::layout::{centered_rect_fixed, split_artifact, split_prompt, AppLayout};
use crate::ui::widgets::{
    ArtifactWidget, ExportPanelWidget, HotkeyBarWidget, ProgressTrackerWidget, ShotCardWidget,
    SidebarWidget, StatusBarWidget, StoryInputWidget, CARD_HEIGHT,
};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);

    render_top_bar(frame, app, layout.top_bar);

    let sidebar = SidebarWidget::new(app.session.store(), &app.theme)
        .active(app.session.active_view())
        .unlocked(app.session.navigator().is_unlocked());
    frame.render_widget(sidebar, layout.sidebar);

    match app.session.active_view() {
        View::Input => render_prompt(frame, app, layout.main),
        View::Artifact(key) => render_artifact(frame, app, key, layout.main),
    }

    let status = StatusBarWidget::new(app.input_mode, &app.theme)
        .message(app.status_message())
        .toast(app.toast());
    frame.render_widget(status, layout.status_bar);

    let hotkeys = HotkeyBarWidget::new(app.session.active_view(), app.input_mode, &app.theme)
        .shot_cards(app.showing_shot_cards());
    frame.render_widget(hotkeys, layout.hotkey_bar);

    match app.overlay() {
        Some(Overlay::Help) => render_help_overlay(frame, app, area),
        Some(Overlay::NamePrompt) => render_name_overlay(frame, app, area),
        None => {}
    }
}

/// Title, greeting and the status dot
fn render_top_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.session.status();
    let line = Line::from(vec![
        Span::styled(" 🎬 Scriptoria ", app.theme.accent_style()),
        Span::styled("| ", app.theme.dim_style()),
        Span::styled(
            format!("Welcome, {} ", app.session.greeting()),
            app.theme.text_style(),
        ),
        Span::styled("| ", app.theme.dim_style()),
        Span::styled("● ", Style::default().fg(app.theme.status_color(status))),
        Span::styled(status.label().to_string(), app.theme.text_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Story editor with the progress tracker underneath once a run has started
fn render_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let generation = app.session.generation();
    let (editor_area, tracker_area) = split_prompt(area, generation.tracker_visible());

    let placeholder = if generation.is_running() {
        "Generating..."
    } else {
        "Describe your story, then press 'g' to generate the production package"
    };
    let editor = StoryInputWidget::new(app.story(), &app.theme)
        .cursor_position(app.cursor_position())
        .active(app.input_mode == InputMode::Insert)
        .placeholder(placeholder);
    frame.render_widget(editor, editor_area);

    if let Some(tracker_area) = tracker_area {
        let tracker =
            ProgressTrackerWidget::new(generation, &app.theme).animation_frame(app.animation_frame);
        frame.render_widget(tracker, tracker_area);
    }
}

/// A deliverable's body (or shot cards) and its export actions
fn render_artifact(frame: &mut Frame, app: &App, key: ArtifactKey, area: Rect) {
    let (body_area, export_area) = split_artifact(area);

    if app.showing_shot_cards() {
        render_shot_cards(frame, app, body_area);
    } else {
        // Views are rendered on activation; fall back for anything else
        let fallback;
        let rendered = match app.session.rendered(key) {
            Some(rendered) => Some(rendered),
            None => {
                fallback = app
                    .session
                    .store()
                    .get(key)
                    .map(|content| RenderedArtifact::render(key, content));
                fallback.as_ref()
            }
        };

        match rendered {
            Some(rendered) => {
                let widget = ArtifactWidget::new(rendered, &app.theme).scroll(app.scroll);
                frame.render_widget(widget, body_area);
            }
            None => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(app.theme.border_style(false));
                let empty = Paragraph::new(Span::styled(
                    "This deliverable was not produced in the last run.",
                    app.theme.dim_style(),
                ))
                .block(block);
                frame.render_widget(empty, body_area);
            }
        }
    }

    if let Some(panel) = app.session.export_panel() {
        frame.render_widget(ExportPanelWidget::new(&panel, &app.theme), export_area);
    }
}

/// A window of shot cards that keeps the selected card visible
fn render_shot_cards(frame: &mut Frame, app: &App, area: Rect) {
    let shots = app.session.shots();
    let visible = (area.height / CARD_HEIGHT).max(1) as usize;
    let first = app.shot_cursor.saturating_sub(visible - 1);

    for (slot, (index, description)) in shots
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .enumerate()
    {
        let card_area = Rect {
            x: area.x,
            y: area.y + slot as u16 * CARD_HEIGHT,
            width: area.width,
            height: CARD_HEIGHT.min(area.height),
        };
        let status = app.session.shot_status(index);
        let card = ShotCardWidget::new(index, description, &status, &app.theme)
            .selected(index == app.shot_cursor);
        frame.render_widget(card, card_area);
    }
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(56, 24, area);
    frame.render_widget(Clear, popup_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::UNDERLINED),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " Scriptoria - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Story prompt:"),
        Line::from("  i         Write (INSERT mode)"),
        Line::from("  Esc       Back to NORMAL mode"),
        Line::from("  g         Generate the production package"),
        Line::from("  Ctrl+s    Generate while writing"),
        Line::from(""),
        heading("Views:"),
        Line::from("  0         Story prompt"),
        Line::from("  1-5       Screenplay .. Shot List"),
        Line::from("  Tab       Next view (after generating)"),
        Line::from("  j/k       Scroll, or pick a shot card"),
        Line::from(""),
        heading("Deliverables:"),
        Line::from("  s         Generate / regenerate / retry a shot's frame"),
        Line::from("  t/p/d     Export as TXT / PDF / DOCX"),
        Line::from(""),
        Line::from(format!(
            "  Exports are saved to {}",
            app.session.download_dir().display()
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup_area);
}

/// Render the welcome modal
fn render_name_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(48, 9, area);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(
            "Welcome to the studio!",
            app.theme.accent_style(),
        )),
        Line::from(""),
        Line::from("What should we call you, Director?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", app.theme.accent_style()),
            Span::raw(app.name_buffer().to_string()),
            Span::styled("▌", app.theme.accent_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to continue, Esc to skip",
            app.theme.dim_style(),
        )),
    ];

    let block = Block::default()
        .title(" Scriptoria ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
