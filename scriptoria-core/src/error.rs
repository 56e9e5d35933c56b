//! Error types for the studio core.

use crate::{ArtifactKey, BackendError};
use thiserror::Error;

/// Input problems caught locally. These never reach the network.
///
/// The `Display` text is the notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your story concept first.")]
    EmptyStory,

    #[error("Please provide more detail about your story.")]
    StoryTooShort { min_chars: usize },

    #[error("Please enter your name.")]
    EmptyName,

    #[error("No content to export. Please generate first.")]
    MissingArtifact(ArtifactKey),

    #[error("No shot {0} in the current shot list.")]
    UnknownShot(usize),
}

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export failed: {0}")]
    Export(String),
}

/// Why an export did not produce a file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("Could not save file: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Message for the "Export failed: ..." notice.
    pub fn user_message(&self) -> String {
        match self {
            ExportError::Backend(e) => e.user_message(crate::export::EXPORT_FALLBACK),
            ExportError::Io(e) => format!("Could not save file: {e}"),
        }
    }
}
