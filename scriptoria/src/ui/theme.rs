//! Color theme and styling for the studio TUI

use ratatui::style::{Color, Modifier, Style};
use scriptoria_core::{ArtifactKey, NoticeLevel, ProgressMark, StatusIndicator};

/// Studio UI color theme
#[derive(Debug, Clone)]
pub struct StudioTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,
    pub muted: Color,

    // Feedback colors
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // One accent per deliverable, in sidebar order
    pub artifact_colors: [Color; 5],
}

impl Default for StudioTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Rgb(212, 175, 55),
            accent: Color::Rgb(212, 175, 55),
            muted: Color::Gray,

            info: Color::LightBlue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::LightRed,

            artifact_colors: [
                Color::Rgb(212, 175, 55),
                Color::Rgb(0, 180, 216),
                Color::Rgb(155, 89, 182),
                Color::Rgb(46, 204, 113),
                Color::Rgb(231, 76, 60),
            ],
        }
    }
}

impl StudioTheme {
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::DIM)
    }

    pub fn accent_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Accent color of a deliverable
    pub fn artifact_color(&self, key: ArtifactKey) -> Color {
        self.artifact_colors[key.index()]
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    pub fn title_style(&self, focused: bool) -> Style {
        if focused {
            self.accent_style()
        } else {
            self.text_style()
        }
    }

    pub fn notice_style(&self, level: NoticeLevel) -> Style {
        let color = match level {
            NoticeLevel::Info => self.info,
            NoticeLevel::Success => self.success,
            NoticeLevel::Warning => self.warning,
            NoticeLevel::Error => self.error,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn mark_style(&self, mark: ProgressMark) -> Style {
        match mark {
            ProgressMark::Pending => self.dim_style(),
            ProgressMark::InProgress => Style::default().fg(self.accent),
            ProgressMark::Done => Style::default().fg(self.success),
            ProgressMark::Error => Style::default().fg(self.error),
        }
    }

    /// Color of the status dot in the top bar
    pub fn status_color(&self, status: &StatusIndicator) -> Color {
        match status {
            StatusIndicator::Idle => self.muted,
            StatusIndicator::Loading(_) => self.warning,
            StatusIndicator::Active(_) => self.success,
            StatusIndicator::Error(_) => self.error,
        }
    }

    /// Character counter color against the soft limit
    pub fn counter_style(&self, over_limit: bool) -> Style {
        if over_limit {
            Style::default().fg(self.error).add_modifier(Modifier::BOLD)
        } else {
            self.dim_style()
        }
    }
}
