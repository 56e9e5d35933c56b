//! The seam between the session controller and the studio backend.

use async_trait::async_trait;
use scriptoria_client::Client;

use crate::{ArtifactKey, Artifacts, BackendError, ExportFormat, ShotImage};

/// The six request contracts the studio relies on.
///
/// Implemented by [`scriptoria_client::Client`] for real use and by
/// [`crate::testing::MockBackend`] for tests.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_user(&self) -> Result<Option<String>, BackendError>;

    async fn get_results(&self) -> Result<Artifacts, BackendError>;

    async fn set_user(&self, name: &str) -> Result<String, BackendError>;

    async fn generate(&self, story: &str) -> Result<Artifacts, BackendError>;

    async fn generate_shot_image(&self, shot_description: &str) -> Result<ShotImage, BackendError>;

    async fn export(
        &self,
        artifact: ArtifactKey,
        format: ExportFormat,
        content: &str,
        story: &str,
    ) -> Result<Vec<u8>, BackendError>;
}

#[async_trait]
impl Backend for Client {
    async fn get_user(&self) -> Result<Option<String>, BackendError> {
        Client::get_user(self).await
    }

    async fn get_results(&self) -> Result<Artifacts, BackendError> {
        Client::get_results(self).await
    }

    async fn set_user(&self, name: &str) -> Result<String, BackendError> {
        Client::set_user(self, name).await
    }

    async fn generate(&self, story: &str) -> Result<Artifacts, BackendError> {
        Client::generate(self, story).await
    }

    async fn generate_shot_image(&self, shot_description: &str) -> Result<ShotImage, BackendError> {
        Client::generate_shot_image(self, shot_description).await
    }

    async fn export(
        &self,
        artifact: ArtifactKey,
        format: ExportFormat,
        content: &str,
        story: &str,
    ) -> Result<Vec<u8>, BackendError> {
        Client::export(self, artifact, format, content, story).await
    }
}
