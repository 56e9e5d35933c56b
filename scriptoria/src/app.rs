//! Main application state and logic

use std::collections::VecDeque;

use scriptoria_core::{
    ArtifactKey, ExportFormat, NavOutcome, Notice, Session, ShotAction, Submission, View,
};

use crate::ui::theme::StudioTheme;

/// How long a toast stays up, in ticks of the 100ms poll loop.
const TOAST_TICKS: u16 = 30;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - editing the story prompt
    Insert,
}

/// Overlay types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
    /// The welcome modal asking for a display name.
    NamePrompt,
}

/// Main application state
pub struct App {
    pub session: Session,

    // UI state
    pub theme: StudioTheme,
    pub input_mode: InputMode,
    overlay: Option<Overlay>,
    viewed: View,

    // Story prompt editor
    story: String,
    cursor_position: usize,

    // Name modal
    name_buffer: String,
    /// Name waiting to be sent to the backend by the main loop.
    pub pending_name: Option<String>,

    // Deliverable views
    pub shot_cursor: usize,
    pub scroll: usize,

    // Notices
    toasts: VecDeque<Notice>,
    toast_age: u16,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,

    // Animation
    pub animation_frame: u8,
}

impl App {
    /// Create the app over a bootstrapped session.
    ///
    /// A name given on the command line is registered on the first pass of
    /// the main loop; without one, a fresh session opens the name prompt.
    pub fn new(session: Session, name: Option<String>) -> Self {
        let needs_name = session.user_name().is_none();
        let overlay = match (&name, needs_name) {
            (None, true) => Some(Overlay::NamePrompt),
            _ => None,
        };
        let viewed = session.active_view();

        Self {
            session,
            theme: StudioTheme::default(),
            input_mode: InputMode::Normal,
            overlay,
            viewed,
            story: String::new(),
            cursor_position: 0,
            name_buffer: String::new(),
            pending_name: name.filter(|_| needs_name),
            shot_cursor: 0,
            scroll: 0,
            toasts: VecDeque::new(),
            toast_age: 0,
            status_message: Some("Press 'i' to write your story, 'g' to generate, '?' for help".to_string()),
            should_quit: false,
            animation_frame: 0,
        }
    }

    /// Apply everything background work has reported since the last frame.
    pub fn pump_session(&mut self) {
        while let Some(event) = self.session.try_next_event() {
            self.session.handle(event);
        }
        self.collect_notices();

        if self.session.take_focus_request() {
            self.input_mode = InputMode::Insert;
        }

        // Auto-navigation can switch views under us
        let active = self.session.active_view();
        if active != self.viewed {
            self.viewed = active;
            self.scroll = 0;
            self.shot_cursor = 0;
        }
    }

    fn collect_notices(&mut self) {
        self.toasts.extend(self.session.drain_notices());
    }

    /// Register a display name with the backend.
    pub async fn submit_name(&mut self, name: &str) {
        match self.session.enter_name(name).await {
            Ok(stored) => {
                self.close_overlay();
                self.name_buffer.clear();
                self.set_status(format!("Welcome to the studio, {stored}"));
            }
            Err(_) => {
                // Notice already queued; let them try again
                self.overlay = Some(Overlay::NamePrompt);
                self.clear_status();
            }
        }
        self.collect_notices();
    }

    // =========================================================================
    // Generation and shots
    // =========================================================================

    /// Submit the story prompt.
    pub fn generate(&mut self) {
        match self.session.run_generation(&self.story) {
            Ok(Submission::Started { .. }) => {
                self.input_mode = InputMode::Normal;
                self.set_status("Generating your production package...");
            }
            Ok(Submission::AlreadyRunning) => self.set_status("Generation already in progress"),
            Err(_) => self.clear_status(),
        }
        self.collect_notices();
    }

    /// Run the selected shot card's button.
    pub fn shot_action(&mut self) {
        let count = self.session.shots().len();
        if count == 0 {
            return;
        }
        let index = self.shot_cursor.min(count - 1);

        let result = match self.session.shot_board().action(index) {
            None => {
                self.set_status(format!("Shot {} is already rendering", index + 1));
                return;
            }
            Some(ShotAction::Retry) => self.session.retry_shot(index),
            Some(_) => self.session.generate_shot(index),
        };
        if result.is_ok() {
            self.set_status(format!("Storyboarding shot {}...", index + 1));
        }
        self.collect_notices();
    }

    /// Export the deliverable the export panel targets.
    pub fn export(&mut self, format: ExportFormat) {
        if self.session.export_panel().is_none() {
            self.set_status("Nothing to export yet");
            return;
        }
        let _ = self.session.export_current(format);
        self.collect_notices();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch to a deliverable's view.
    pub fn select_view(&mut self, key: ArtifactKey) {
        match self.session.select(key) {
            NavOutcome::Locked => {
                self.set_status("Generate a package first to unlock the deliverables");
            }
            NavOutcome::Activated { .. } => {
                self.viewed = self.session.active_view();
                self.scroll = 0;
                self.shot_cursor = 0;
                self.clear_status();
            }
        }
    }

    /// Back to the story prompt.
    pub fn show_input(&mut self) {
        self.session.go_to_input();
        self.viewed = View::Input;
        self.scroll = 0;
    }

    /// Step through the views in sidebar order.
    pub fn cycle_view(&mut self, forward: bool) {
        if !self.session.navigator().is_unlocked() {
            return;
        }
        let order: Vec<View> = std::iter::once(View::Input)
            .chain(ArtifactKey::ALL.into_iter().map(View::Artifact))
            .collect();
        let current = order
            .iter()
            .position(|v| *v == self.session.active_view())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        match order[next] {
            View::Input => self.show_input(),
            View::Artifact(key) => self.select_view(key),
        }
    }

    /// Whether the shot list is showing as shot cards.
    pub fn showing_shot_cards(&self) -> bool {
        self.session.active_view() == View::Artifact(ArtifactKey::ShotList)
            && !self.session.shots().is_empty()
    }

    pub fn move_down(&mut self, lines: usize) {
        if self.showing_shot_cards() {
            let last = self.session.shots().len().saturating_sub(1);
            self.shot_cursor = (self.shot_cursor + lines).min(last);
        } else {
            self.scroll = self.scroll.saturating_add(lines);
        }
    }

    pub fn move_up(&mut self, lines: usize) {
        if self.showing_shot_cards() {
            self.shot_cursor = self.shot_cursor.saturating_sub(lines);
        } else {
            self.scroll = self.scroll.saturating_sub(lines);
        }
    }

    // =========================================================================
    // Story editing
    // =========================================================================

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = byte_index(&self.story, self.cursor_position);
        self.story.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.story.char_indices().nth(self.cursor_position) {
                self.story.replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.story.char_indices().nth(self.cursor_position) {
            self.story.replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.story.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.story.chars().count();
    }

    /// Replace the story prompt and move the cursor to the end.
    pub fn set_story(&mut self, content: impl Into<String>) {
        self.story = content.into();
        self.cursor_end();
    }

    pub fn story(&self) -> &str {
        &self.story
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    // =========================================================================
    // Name prompt
    // =========================================================================

    pub fn name_buffer(&self) -> &str {
        &self.name_buffer
    }

    pub fn type_name_char(&mut self, c: char) {
        self.name_buffer.push(c);
    }

    pub fn name_backspace(&mut self) {
        self.name_buffer.pop();
    }

    /// Queue the typed name for registration.
    pub fn confirm_name(&mut self) {
        self.pending_name = Some(self.name_buffer.clone());
    }

    /// Enter the studio without a name.
    pub fn skip_name(&mut self) {
        self.close_overlay();
        self.name_buffer.clear();
    }

    // =========================================================================
    // Overlays, toasts and status
    // =========================================================================

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn toggle_help(&mut self) {
        if self.overlay == Some(Overlay::Help) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// The notice currently on screen.
    pub fn toast(&self) -> Option<&Notice> {
        self.toasts.front()
    }

    /// Tick for animations and toast expiry
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);

        if self.toasts.is_empty() {
            self.toast_age = 0;
            return;
        }
        self.toast_age += 1;
        if self.toast_age >= TOAST_TICKS {
            self.toasts.pop_front();
            self.toast_age = 0;
        }
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
