//! Which deliverable views are reachable and which one is on screen.

use std::collections::BTreeMap;

use crate::artifacts::{ArtifactStore, RenderedArtifact};
use crate::{ArtifactKey, ExportFormat};

/// A view in the studio's main pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// The story prompt entry. Always reachable.
    #[default]
    Input,
    Artifact(ArtifactKey),
}

/// Result of [`Navigator::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Views are still locked; nothing changed.
    Locked,
    /// The view is now active. `first_render` is set when its content was
    /// projected from the store on this visit.
    Activated { first_render: bool },
}

/// Lock state, active view and per-view render cache.
///
/// Unlocking is all-or-nothing: the first successful run (or a restored
/// session) opens every deliverable at once, and nothing locks them again.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    unlocked: bool,
    active: View,
    rendered: BTreeMap<ArtifactKey, (u64, RenderedArtifact)>,
    current_export: Option<ArtifactKey>,
    focus_requested: bool,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlock_all(&mut self) {
        self.unlocked = true;
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn is_locked(&self, _key: ArtifactKey) -> bool {
        !self.unlocked
    }

    pub fn active(&self) -> View {
        self.active
    }

    /// Activate the view for `key`.
    ///
    /// The body is rendered from the store on first visit and reused on
    /// later visits until the store revision changes.
    pub fn select(&mut self, key: ArtifactKey, store: &ArtifactStore) -> NavOutcome {
        if self.is_locked(key) {
            return NavOutcome::Locked;
        }
        self.active = View::Artifact(key);

        let Some(content) = store.get(key) else {
            return NavOutcome::Activated {
                first_render: false,
            };
        };
        self.current_export = Some(key);

        let cached = matches!(self.rendered.get(&key), Some((rev, _)) if *rev == store.revision());
        if !cached {
            self.rendered
                .insert(key, (store.revision(), RenderedArtifact::render(key, content)));
        }
        NavOutcome::Activated {
            first_render: !cached,
        }
    }

    /// Return to the prompt entry and ask the display to focus it.
    pub fn go_to_input(&mut self) {
        self.active = View::Input;
        self.focus_requested = true;
    }

    /// Consume a pending focus request for the prompt entry.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Cached projection for `key`, if it was rendered for the current store.
    pub fn rendered(&self, key: ArtifactKey, store: &ArtifactStore) -> Option<&RenderedArtifact> {
        self.rendered
            .get(&key)
            .filter(|(rev, _)| *rev == store.revision())
            .map(|(_, r)| r)
    }

    /// The artifact the export panel currently targets.
    pub fn current_export(&self) -> Option<ArtifactKey> {
        self.current_export
    }

    pub fn set_current_export(&mut self, key: ArtifactKey) {
        self.current_export = Some(key);
    }

    /// Build the export panel for the current store contents.
    ///
    /// Returns `None` when nothing has been generated yet.
    pub fn export_panel(&self, store: &ArtifactStore) -> Option<ExportPanel> {
        let available: Vec<ArtifactKey> = store.keys().collect();
        let first = *available.first()?;
        let current = self
            .current_export
            .filter(|k| store.contains(*k))
            .unwrap_or(first);
        Some(ExportPanel { current, available })
    }
}

/// Export actions offered next to the active deliverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPanel {
    pub current: ArtifactKey,
    pub available: Vec<ArtifactKey>,
}

impl ExportPanel {
    pub fn formats(&self) -> [ExportFormat; 3] {
        ExportFormat::ALL
    }
}
