//! Deliverables sidebar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use scriptoria_core::artifacts::meta;
use scriptoria_core::{ArtifactKey, ArtifactStore, View};

use crate::ui::theme::StudioTheme;

/// View list: the story prompt followed by the five deliverables
pub struct SidebarWidget<'a> {
    store: &'a ArtifactStore,
    active: View,
    unlocked: bool,
    theme: &'a StudioTheme,
}

impl<'a> SidebarWidget<'a> {
    pub fn new(store: &'a ArtifactStore, theme: &'a StudioTheme) -> Self {
        Self {
            store,
            active: View::Input,
            unlocked: false,
            theme,
        }
    }

    pub fn active(mut self, view: View) -> Self {
        self.active = view;
        self
    }

    pub fn unlocked(mut self, unlocked: bool) -> Self {
        self.unlocked = unlocked;
        self
    }

    fn entry(&self, hotkey: usize, label: String, color: Style, view: View) -> Line<'static> {
        let is_active = self.active == view;
        let marker = if is_active { "▶ " } else { "  " };
        let label_style = if is_active {
            color.add_modifier(Modifier::BOLD)
        } else {
            self.theme.text_style()
        };

        Line::from(vec![
            Span::styled(marker, color),
            Span::styled(format!("{hotkey} "), self.theme.dim_style()),
            Span::styled(label, label_style),
        ])
    }
}

impl Widget for SidebarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Studio ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            self.entry(
                0,
                "✍️ Story Prompt".to_string(),
                self.theme.accent_style(),
                View::Input,
            ),
            Line::from(""),
            Line::from(Span::styled("Deliverables", self.theme.dim_style())),
        ];

        for (i, key) in ArtifactKey::ALL.into_iter().enumerate() {
            let meta = meta(key);
            let color = Style::default().fg(self.theme.artifact_color(key));
            let mut line = self.entry(
                i + 1,
                format!("{} {}", meta.icon, meta.title),
                color,
                View::Artifact(key),
            );
            if !self.unlocked {
                line = line.style(self.theme.dim_style());
                line.spans.push(Span::raw(" 🔒"));
            } else if !self.store.contains(key) {
                line.spans.push(Span::styled(" (empty)", self.theme.dim_style()));
            }
            lines.push(line);
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
