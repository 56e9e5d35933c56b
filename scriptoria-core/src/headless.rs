//! Headless studio interface for programmatic use.
//!
//! This module wraps a [`Session`] in an API where every call waits for the
//! work it scheduled to finish. It's designed for:
//! - Script-driven production runs
//! - Integration tests against a real backend
//! - The `--headless` mode of the `scriptoria` binary
//!
//! # Example
//!
//! ```ignore
//! use scriptoria_core::headless::{HeadlessConfig, HeadlessStudio};
//! use scriptoria_core::{ArtifactKey, ExportFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HeadlessConfig::from_env().with_name("Ada");
//!     let mut studio = HeadlessStudio::new(config).await?;
//!
//!     studio.submit_story("A lighthouse keeper finds a map in a bottle.").await?;
//!     for shot in 0..studio.shots().len() {
//!         studio.generate_shot(shot).await?;
//!     }
//!
//!     let path = studio.export(ArtifactKey::Screenplay, ExportFormat::Pdf).await?;
//!     println!("saved {}", path.display());
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use scriptoria_client::Client;

use crate::backend::Backend;
use crate::error::SessionError;
use crate::generation::RunStatus;
use crate::notice::Notice;
use crate::session::{Session, SessionConfig, Submission};
use crate::shots::ShotStatus;
use crate::{ArtifactKey, ExportFormat};

/// Configuration for a headless studio.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Backend URL; `None` reads `SCRIPTORIA_URL`.
    pub base_url: Option<String>,
    /// Name to register when the backend has no user for this session.
    pub name: Option<String>,
    /// Session settings.
    pub session: SessionConfig,
}

impl HeadlessConfig {
    /// Configuration from the environment with no name.
    pub fn from_env() -> Self {
        Self {
            base_url: None,
            name: None,
            session: SessionConfig::from_env(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}

/// Outcome of a headless generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Succeeded { artifacts: usize },
    Failed { message: String },
    /// Another run was in flight.
    Skipped,
}

/// A studio session driven without a display.
pub struct HeadlessStudio {
    session: Session,
}

impl HeadlessStudio {
    /// Connect, restore any previous session and register the configured name.
    pub async fn new(config: HeadlessConfig) -> Result<Self, SessionError> {
        let client = match &config.base_url {
            Some(url) => Client::new(url.clone())?,
            None => Client::from_env()?,
        };
        Self::with_backend(Arc::new(client), config).await
    }

    /// Like [`HeadlessStudio::new`] over any backend.
    pub async fn with_backend(
        backend: Arc<dyn Backend>,
        config: HeadlessConfig,
    ) -> Result<Self, SessionError> {
        let mut session = Session::new(backend, config.session);
        session.bootstrap().await;

        if session.user_name().is_none() {
            if let Some(name) = &config.name {
                session.enter_name(name).await?;
            }
        }
        Ok(Self { session })
    }

    /// Generate the full package for `story` and wait for the outcome.
    pub async fn submit_story(&mut self, story: &str) -> Result<RunReport, SessionError> {
        let submission = self.session.run_generation(story)?;
        self.session.settle().await;

        if submission == Submission::AlreadyRunning {
            return Ok(RunReport::Skipped);
        }
        let generation = self.session.generation();
        Ok(match generation.status() {
            RunStatus::Succeeded => RunReport::Succeeded {
                artifacts: self.session.store().len(),
            },
            _ => RunReport::Failed {
                message: generation.last_error().unwrap_or_default().to_string(),
            },
        })
    }

    /// Generate (or regenerate) the image for shot `index` and wait for it.
    pub async fn generate_shot(&mut self, index: usize) -> Result<ShotStatus, SessionError> {
        self.session.generate_shot(index)?;
        self.session.settle().await;
        Ok(self.session.shot_status(index))
    }

    /// Retry shot `index` with its previous description.
    pub async fn retry_shot(&mut self, index: usize) -> Result<ShotStatus, SessionError> {
        self.session.retry_shot(index)?;
        self.session.settle().await;
        Ok(self.session.shot_status(index))
    }

    /// Export and wait for the file to be written.
    pub async fn export(
        &mut self,
        key: ArtifactKey,
        format: ExportFormat,
    ) -> Result<PathBuf, SessionError> {
        self.session.export(key, format)?;
        self.session.settle().await;

        match self.session.last_export() {
            Some(Ok(path)) => Ok(path.clone()),
            Some(Err(message)) => Err(SessionError::Export(message.clone())),
            None => Err(SessionError::Export("no result reported".to_string())),
        }
    }

    /// Segmented shots of the current shot list.
    pub fn shots(&self) -> Vec<String> {
        self.session.shots()
    }

    /// Text of a stored artifact.
    pub fn artifact(&self, key: ArtifactKey) -> Option<&str> {
        self.session.store().get(key)
    }

    pub fn notices(&mut self) -> Vec<Notice> {
        self.session.drain_notices()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_artifacts, Endpoint, MockBackend, MockReply, SAMPLE_STORY};

    fn config() -> HeadlessConfig {
        HeadlessConfig {
            base_url: None,
            name: Some("Ada".to_string()),
            session: SessionConfig::new(std::env::temp_dir().join("scriptoria-headless")),
        }
    }

    #[tokio::test]
    async fn test_new_registers_name_for_fresh_session() {
        let backend = Arc::new(MockBackend::new());
        let studio = HeadlessStudio::with_backend(backend.clone(), config())
            .await
            .unwrap();
        assert_eq!(studio.session().greeting(), "Ada");
        assert_eq!(backend.payloads(Endpoint::SetUser), vec!["Ada".to_string()]);
    }

    #[tokio::test]
    async fn test_restored_session_skips_registration() {
        let backend = Arc::new(
            MockBackend::new()
                .with_user("Grace")
                .with_saved_results(sample_artifacts()),
        );
        let studio = HeadlessStudio::with_backend(backend.clone(), config())
            .await
            .unwrap();
        assert_eq!(studio.session().greeting(), "Grace");
        assert_eq!(backend.calls(Endpoint::SetUser), 0);
        assert_eq!(studio.shots().len(), 3);
    }

    #[tokio::test]
    async fn test_submit_story_reports_outcome() {
        let backend = Arc::new(
            MockBackend::new().with_reply(Endpoint::Generate, MockReply::fail(400, "Story too vague")),
        );
        let mut studio = HeadlessStudio::with_backend(backend, config()).await.unwrap();

        assert_eq!(
            studio.submit_story(SAMPLE_STORY).await.unwrap(),
            RunReport::Failed {
                message: "Story too vague".to_string()
            }
        );
        assert_eq!(
            studio.submit_story(SAMPLE_STORY).await.unwrap(),
            RunReport::Succeeded { artifacts: 5 }
        );
    }
}
