//! Export actions widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use scriptoria_core::artifacts::meta;
use scriptoria_core::navigation::ExportPanel;
use scriptoria_core::ExportFormat;

use crate::ui::theme::StudioTheme;

/// Hotkey for each export format
fn format_hotkey(format: ExportFormat) -> char {
    match format {
        ExportFormat::Txt => 't',
        ExportFormat::Pdf => 'p',
        ExportFormat::Docx => 'd',
    }
}

pub struct ExportPanelWidget<'a> {
    panel: &'a ExportPanel,
    theme: &'a StudioTheme,
}

impl<'a> ExportPanelWidget<'a> {
    pub fn new(panel: &'a ExportPanel, theme: &'a StudioTheme) -> Self {
        Self { panel, theme }
    }
}

impl Widget for ExportPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Export {} ", meta(self.panel.current).title);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut spans = Vec::new();
        for format in self.panel.formats() {
            spans.push(Span::styled(
                format!("[{}] ", format_hotkey(format)),
                self.theme.accent_style(),
            ));
            spans.push(Span::styled(
                format!("{}  ", format.description()),
                self.theme.text_style(),
            ));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}
