//! Storyboard shot card widget

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use scriptoria_core::ShotStatus;

use crate::ui::theme::StudioTheme;

/// Rows a card takes on screen, borders included
pub const CARD_HEIGHT: u16 = 7;

/// One shot description with its storyboard frame
pub struct ShotCardWidget<'a> {
    index: usize,
    description: &'a str,
    status: &'a ShotStatus,
    theme: &'a StudioTheme,
    selected: bool,
}

impl<'a> ShotCardWidget<'a> {
    pub fn new(
        index: usize,
        description: &'a str,
        status: &'a ShotStatus,
        theme: &'a StudioTheme,
    ) -> Self {
        Self {
            index,
            description,
            status,
            theme,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn action_hint(&self) -> Line<'static> {
        let label = match self.status {
            ShotStatus::Idle => "Generate Image",
            ShotStatus::Loading { .. } => return Line::from(""),
            ShotStatus::Success { .. } => "Regenerate",
            ShotStatus::Error { .. } => "Retry",
        };
        let style = if self.selected {
            self.theme.accent_style()
        } else {
            self.theme.dim_style()
        };
        Line::from(Span::styled(format!("[s] {label}"), style))
    }
}

impl Widget for ShotCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(
                format!(" Shot {} ", self.index + 1),
                self.theme.title_style(self.selected),
            ))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.selected));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Description
                Constraint::Length(2), // Frame status
                Constraint::Min(0),    // Action
            ])
            .split(inner);

        Paragraph::new(self.description)
            .style(self.theme.text_style())
            .wrap(Wrap { trim: true })
            .render(chunks[0], buf);

        match self.status {
            ShotStatus::Idle => {
                Paragraph::new(Span::styled("No frame yet", self.theme.dim_style()))
                    .render(chunks[1], buf);
            }
            ShotStatus::Loading { stage, .. } => {
                Gauge::default()
                    .gauge_style(Style::default().fg(self.theme.accent))
                    .percent(u16::from(stage.fill_percent()))
                    .label(format!("{}...", stage.label()))
                    .render(Rect { height: 1, ..chunks[1] }, buf);
            }
            ShotStatus::Success { image_url, prompt } => {
                let lines = vec![
                    Line::from(vec![
                        Span::styled("🖼  ", Style::default().fg(self.theme.success)),
                        Span::styled(
                            image_url.clone(),
                            Style::default()
                                .fg(self.theme.success)
                                .add_modifier(Modifier::UNDERLINED),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("Prompt: {prompt}"),
                        self.theme.dim_style(),
                    )),
                ];
                Paragraph::new(lines).render(chunks[1], buf);
            }
            ShotStatus::Error { message } => {
                Paragraph::new(Span::styled(
                    format!("❌ {message}"),
                    Style::default().fg(self.theme.error),
                ))
                .render(chunks[1], buf);
            }
        }

        Paragraph::new(self.action_hint()).render(chunks[2], buf);
    }
}
