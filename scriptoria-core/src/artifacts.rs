//! The artifact store: the single source of truth for generated deliverables.

use crate::{ArtifactKey, Artifacts};

/// Presentation metadata for a deliverable. Never used for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactMeta {
    pub icon: &'static str,
    pub title: &'static str,
}

/// Look up the display metadata for a key.
pub fn meta(key: ArtifactKey) -> ArtifactMeta {
    match key {
        ArtifactKey::Screenplay => ArtifactMeta {
            icon: "📜",
            title: "Screenplay",
        },
        ArtifactKey::Characters => ArtifactMeta {
            icon: "👤",
            title: "Character Profiles",
        },
        ArtifactKey::SoundDesign => ArtifactMeta {
            icon: "🎵",
            title: "Sound Design Plan",
        },
        ArtifactKey::ScriptBreakdown => ArtifactMeta {
            icon: "📋",
            title: "Script Breakdown",
        },
        ArtifactKey::ShotList => ArtifactMeta {
            icon: "🎬",
            title: "Shot List",
        },
    }
}

/// Generated text keyed by deliverable.
///
/// A key is present exactly when that artifact has been produced and not yet
/// replaced. The only mutation is [`ArtifactStore::replace`], which swaps the
/// whole mapping at once and bumps the revision.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    entries: Artifacts,
    revision: u64,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry with `artifacts`. Keys absent from `artifacts` are gone afterwards.
    pub(crate) fn replace(&mut self, artifacts: Artifacts) {
        self.entries = artifacts;
        self.revision += 1;
    }

    pub fn get(&self, key: ArtifactKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: ArtifactKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Stored keys in presentation order.
    pub fn keys(&self) -> impl Iterator<Item = ArtifactKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Incremented on every replacement; zero means nothing was ever stored.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn as_map(&self) -> &Artifacts {
        &self.entries
    }
}

/// Display projection of one stored artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub key: ArtifactKey,
    pub icon: &'static str,
    pub title: &'static str,
    pub word_count: usize,
    pub body: String,
}

impl RenderedArtifact {
    pub fn render(key: ArtifactKey, content: &str) -> Self {
        let meta = meta(key);
        Self {
            key,
            icon: meta.icon,
            title: meta.title,
            word_count: content.split_whitespace().count(),
            body: content.to_string(),
        }
    }

    /// "1,234 words generated"
    pub fn word_count_label(&self) -> String {
        format!("{} words generated", group_thousands(self.word_count))
    }
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
