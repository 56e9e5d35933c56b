//! Generation progress tracker widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use scriptoria_core::artifacts::meta;
use scriptoria_core::{GenerationRun, ProgressMark, RunStatus};

use crate::ui::theme::StudioTheme;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// One row per deliverable with its progress mark
pub struct ProgressTrackerWidget<'a> {
    run: &'a GenerationRun,
    theme: &'a StudioTheme,
    frame: u8,
}

impl<'a> ProgressTrackerWidget<'a> {
    pub fn new(run: &'a GenerationRun, theme: &'a StudioTheme) -> Self {
        Self {
            run,
            theme,
            frame: 0,
        }
    }

    pub fn animation_frame(mut self, frame: u8) -> Self {
        self.frame = frame;
        self
    }
}

impl Widget for ProgressTrackerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.run.status() {
            RunStatus::Running => " Generating... ",
            RunStatus::Succeeded => " Package complete ",
            RunStatus::Failed => " Generation failed ",
            RunStatus::Idle => " Progress ",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.run.is_running()));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .run
            .marks()
            .map(|(key, mark)| {
                let icon = match mark {
                    ProgressMark::InProgress => SPINNER[(self.frame / 2) as usize % SPINNER.len()],
                    other => other.icon(),
                };
                let meta = meta(key);
                Line::from(vec![
                    Span::styled(format!(" {icon} "), self.theme.mark_style(mark)),
                    Span::styled(meta.title, self.theme.mark_style(mark)),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
