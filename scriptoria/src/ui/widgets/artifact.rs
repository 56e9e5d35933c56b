//! Deliverable body widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use scriptoria_core::RenderedArtifact;

use crate::ui::theme::StudioTheme;

/// Scrollable view of one rendered deliverable
pub struct ArtifactWidget<'a> {
    artifact: &'a RenderedArtifact,
    scroll: usize,
    theme: &'a StudioTheme,
}

impl<'a> ArtifactWidget<'a> {
    pub fn new(artifact: &'a RenderedArtifact, theme: &'a StudioTheme) -> Self {
        Self {
            artifact,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for ArtifactWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = self.theme.artifact_color(self.artifact.key);
        let block = Block::default()
            .title(Span::styled(
                format!(" {} {} ", self.artifact.icon, self.artifact.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(
                Line::from(Span::styled(
                    format!(" {} ", self.artifact.word_count_label()),
                    self.theme.dim_style(),
                ))
                .right_aligned(),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .artifact
            .body
            .lines()
            .map(|l| Line::from(Span::styled(l, self.theme.text_style())))
            .collect();

        // Wrapped height is unknown here; count source lines
        let visible_height = inner.height as usize;
        let total_lines = lines.len();
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false })
            .render(inner, buf);

        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);
        }
    }
}
