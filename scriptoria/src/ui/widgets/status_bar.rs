//! Status line and hotkey bar widgets

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use scriptoria_core::{Notice, View};

use crate::app::InputMode;
use crate::ui::theme::StudioTheme;

/// Mode badge plus either the current toast or the status message
pub struct StatusBarWidget<'a> {
    input_mode: InputMode,
    theme: &'a StudioTheme,
    message: Option<&'a str>,
    toast: Option<&'a Notice>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(input_mode: InputMode, theme: &'a StudioTheme) -> Self {
        Self {
            input_mode,
            theme,
            message: None,
            toast: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }

    pub fn toast(mut self, toast: Option<&'a Notice>) -> Self {
        self.toast = toast;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (mode, mode_style) = match self.input_mode {
            InputMode::Normal => (" NORMAL ", Style::default().fg(self.theme.muted)),
            InputMode::Insert => (" INSERT ", self.theme.accent_style()),
        };

        let mut spans = vec![
            Span::styled(mode, mode_style.add_modifier(Modifier::REVERSED)),
            Span::raw(" "),
        ];
        if let Some(notice) = self.toast {
            spans.push(Span::styled(
                notice.to_string(),
                self.theme.notice_style(notice.level),
            ));
        } else if let Some(message) = self.message {
            spans.push(Span::styled(message, self.theme.dim_style()));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Hotkeys for the current view and mode
pub struct HotkeyBarWidget<'a> {
    view: View,
    input_mode: InputMode,
    shot_cards: bool,
    theme: &'a StudioTheme,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(view: View, input_mode: InputMode, theme: &'a StudioTheme) -> Self {
        Self {
            view,
            input_mode,
            shot_cards: false,
            theme,
        }
    }

    pub fn shot_cards(mut self, shot_cards: bool) -> Self {
        self.shot_cards = shot_cards;
        self
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match (self.input_mode, self.view) {
            (InputMode::Insert, _) => &[("Esc", "done"), ("Enter", "new line"), ("Ctrl+s", "generate")],
            (InputMode::Normal, View::Input) => &[
                ("i", "write"),
                ("g", "generate"),
                ("1-5", "deliverables"),
                ("?", "help"),
                ("q", "quit"),
            ],
            (InputMode::Normal, View::Artifact(_)) if self.shot_cards => &[
                ("j/k", "select shot"),
                ("s", "storyboard"),
                ("t/p/d", "export"),
                ("0", "prompt"),
                ("?", "help"),
            ],
            (InputMode::Normal, View::Artifact(_)) => &[
                ("j/k", "scroll"),
                ("Tab", "next"),
                ("t/p/d", "export"),
                ("0", "prompt"),
                ("?", "help"),
            ],
        }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (key, action) in self.hints() {
            spans.push(Span::styled(format!(" {key} "), self.theme.accent_style()));
            spans.push(Span::styled(format!("{action} "), self.theme.dim_style()));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
