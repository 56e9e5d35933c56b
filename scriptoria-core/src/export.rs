//! Turning a stored deliverable into a downloaded document.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::artifacts::ArtifactStore;
use crate::backend::Backend;
use crate::error::{ExportError, ValidationError};
use crate::{ArtifactKey, ExportFormat};

/// Shown when an export fails without a server message.
pub const EXPORT_FALLBACK: &str = "Export failed";

/// `scriptoria_<key>.<format>`
pub fn file_name(key: ArtifactKey, format: ExportFormat) -> String {
    format!("scriptoria_{}.{}", key.as_str(), format.extension())
}

/// Validates export requests against the store and prepares jobs.
#[derive(Debug, Clone)]
pub struct ExportDispatcher {
    download_dir: PathBuf,
}

impl ExportDispatcher {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Snapshot the artifact text into a job.
    ///
    /// Fails without touching the network when the store has no such artifact.
    pub fn prepare(
        &self,
        store: &ArtifactStore,
        key: ArtifactKey,
        format: ExportFormat,
    ) -> Result<ExportJob, ValidationError> {
        let content = store
            .get(key)
            .filter(|c| !c.is_empty())
            .ok_or(ValidationError::MissingArtifact(key))?;

        Ok(ExportJob {
            key,
            format,
            content: content.to_string(),
            destination: self.download_dir.join(file_name(key, format)),
        })
    }
}

/// One export request, detached from the store.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub key: ArtifactKey,
    pub format: ExportFormat,
    pub content: String,
    pub destination: PathBuf,
}

impl ExportJob {
    /// Request the document and save it. Returns the path written.
    pub async fn run(self, backend: &dyn Backend) -> Result<PathBuf, ExportError> {
        debug!(key = %self.key, format = %self.format, "requesting export");
        let bytes = backend.export(self.key, self.format, &self.content, "").await?;

        if let Some(parent) = self.destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.destination, &bytes).await?;

        info!(path = %self.destination.display(), bytes = bytes.len(), "export saved");
        Ok(self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name(ArtifactKey::SoundDesign, ExportFormat::Docx),
            "scriptoria_sound_design.docx"
        );
        assert_eq!(
            file_name(ArtifactKey::ShotList, ExportFormat::Txt),
            "scriptoria_shot_list.txt"
        );
    }

    #[test]
    fn test_prepare_requires_content() {
        let dispatcher = ExportDispatcher::new("/tmp/downloads");
        let err = dispatcher
            .prepare(&ArtifactStore::new(), ArtifactKey::Screenplay, ExportFormat::Pdf)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingArtifact(ArtifactKey::Screenplay));
        assert_eq!(err.to_string(), "No content to export. Please generate first.");
    }

    #[test]
    fn test_prepare_snapshots_content() {
        let mut store = ArtifactStore::new();
        store.replace(
            [(ArtifactKey::Characters, "MARA, 40s".to_string())]
                .into_iter()
                .collect(),
        );
        let job = ExportDispatcher::new("/tmp/downloads")
            .prepare(&store, ArtifactKey::Characters, ExportFormat::Txt)
            .unwrap();
        assert_eq!(job.content, "MARA, 40s");
        assert_eq!(
            job.destination,
            PathBuf::from("/tmp/downloads/scriptoria_characters.txt")
        );
    }
}
