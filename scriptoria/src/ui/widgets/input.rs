//! Story prompt editor widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use scriptoria_core::StoryLength;

use crate::ui::theme::StudioTheme;

/// Multi-line editor for the story prompt
pub struct StoryInputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a StudioTheme,
    placeholder: &'a str,
    is_active: bool,
}

impl<'a> StoryInputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a StudioTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            placeholder: "Describe your story...",
            is_active: false,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    fn lines(&self) -> (Vec<Line<'static>>, usize) {
        let cursor_style = Style::default()
            .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
            .fg(self.theme.accent);

        let mut lines = Vec::new();
        let mut current = Vec::new();
        let mut cursor_line = 0;

        for (i, c) in self.content.chars().enumerate() {
            let at_cursor = self.is_active && i == self.cursor_position;
            if c == '\n' {
                if at_cursor {
                    current.push(Span::styled(" ", cursor_style));
                    cursor_line = lines.len();
                }
                lines.push(Line::from(std::mem::take(&mut current)));
                continue;
            }
            if at_cursor {
                current.push(Span::styled(c.to_string(), cursor_style));
                cursor_line = lines.len();
            } else {
                current.push(Span::raw(c.to_string()));
            }
        }

        if self.is_active && self.cursor_position >= self.content.chars().count() {
            current.push(Span::styled(" ", cursor_style));
            cursor_line = lines.len();
        }
        lines.push(Line::from(current));

        (lines, cursor_line)
    }
}

impl Widget for StoryInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let length = StoryLength::of(self.content);
        let counter = format!(" {} / {} ", length.chars, length.limit);

        let block = Block::default()
            .title(Span::styled(
                " Your Story ",
                self.theme.title_style(self.is_active),
            ))
            .title_bottom(Line::from(Span::styled(
                counter,
                self.theme.counter_style(length.is_over()),
            )).right_aligned())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.content.is_empty() && !self.is_active {
            Paragraph::new(Line::from(Span::styled(
                self.placeholder,
                self.theme.dim_style(),
            )))
            .render(inner, buf);
            return;
        }

        // Keep the cursor line in view
        let (lines, cursor_line) = self.lines();
        let visible = inner.height as usize;
        let scroll = cursor_line.saturating_sub(visible.saturating_sub(1));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
