//! Testing utilities for the studio.
//!
//! This module provides tools for integration testing:
//! - `MockBackend` for deterministic testing without a running server
//! - `TestHarness` for driving a `Session` through scripted scenarios
//! - Sample artifacts with a well-formed shot list

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::error::SessionError;
use crate::session::{Session, SessionConfig, Submission};
use crate::{ArtifactKey, Artifacts, BackendError, ExportFormat, ShotImage};

/// A story long enough to pass validation.
pub const SAMPLE_STORY: &str =
    "A lighthouse keeper finds a map in a bottle that leads to her missing brother.";

/// A full production package whose shot list splits into three shots.
pub fn sample_artifacts() -> Artifacts {
    [
        (
            ArtifactKey::Screenplay,
            "FADE IN:\n\nEXT. LIGHTHOUSE - NIGHT\n\nWaves hammer the rocks. MARA (40s) climbs the stairs.",
        ),
        (
            ArtifactKey::Characters,
            "MARA - 40s, keeper of the Gull Point light. Stubborn, quiet, loyal.",
        ),
        (
            ArtifactKey::SoundDesign,
            "Constant low surf. The lamp motor hums. A bottle clinks against stone.",
        ),
        (
            ArtifactKey::ScriptBreakdown,
            "Scene 1: EXT. LIGHTHOUSE - NIGHT. Cast: Mara. Props: bottle, map.",
        ),
        (
            ArtifactKey::ShotList,
            "SHOT 1: Wide establishing shot of the lighthouse in the storm.\n\n\
             SHOT 2: Close-up of Mara's hands prying the cork from the bottle.\n\n\
             SHOT 3: Insert of the map unrolling under the sweeping lamp light.",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k, v.to_string()))
    .collect()
}

/// The backend operations, for counting calls and scripting replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    GetUser,
    GetResults,
    SetUser,
    Generate,
    GenerateShotImage,
    Export,
}

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Results(Artifacts),
    Image(ShotImage),
    Document(Vec<u8>),
    /// Non-2xx response; `message` becomes the `{ "error": ... }` payload.
    Fail { status: u16, message: Option<String> },
    Network(String),
}

impl MockReply {
    pub fn image(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        MockReply::Image(ShotImage {
            image_url: url.into(),
            image_prompt: prompt.into(),
        })
    }

    pub fn fail(status: u16, message: impl Into<String>) -> Self {
        MockReply::Fail {
            status,
            message: Some(message.into()),
        }
    }

    fn into_error(self) -> BackendError {
        match self {
            MockReply::Fail {
                status,
                message: Some(message),
            } => BackendError::Service { status, message },
            MockReply::Fail { status, .. } => BackendError::Status { status },
            MockReply::Network(message) => BackendError::Network(message),
            other => BackendError::Parse(format!("reply does not fit endpoint: {other:?}")),
        }
    }
}

/// One recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    /// The main payload: story, shot description, name or export content.
    pub payload: String,
}

#[derive(Default)]
struct MockState {
    replies: BTreeMap<Endpoint, VecDeque<MockReply>>,
    calls: Vec<RecordedCall>,
}

/// A backend that answers from scripts instead of the network.
///
/// Unscripted calls succeed with sensible defaults: generation returns
/// [`sample_artifacts`], shot images are derived from the description and
/// exports echo the content as bytes.
#[derive(Default)]
pub struct MockBackend {
    user: Option<String>,
    saved_results: Artifacts,
    delays: BTreeMap<Endpoint, Duration>,
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the session already belongs to `name`.
    pub fn with_user(mut self, name: impl Into<String>) -> Self {
        self.user = Some(name.into());
        self
    }

    /// Artifacts returned by `/get_results`.
    pub fn with_saved_results(mut self, artifacts: Artifacts) -> Self {
        self.saved_results = artifacts;
        self
    }

    /// Make every call to `endpoint` take `delay`.
    pub fn with_delay(mut self, endpoint: Endpoint, delay: Duration) -> Self {
        self.delays.insert(endpoint, delay);
        self
    }

    /// Queue a reply for the next unscripted call to `endpoint`.
    pub fn with_reply(self, endpoint: Endpoint, reply: MockReply) -> Self {
        self.queue_reply(endpoint, reply);
        self
    }

    /// Queue a reply on a backend that is already shared.
    pub fn queue_reply(&self, endpoint: Endpoint, reply: MockReply) {
        self.lock()
            .replies
            .entry(endpoint)
            .or_default()
            .push_back(reply);
    }

    /// Number of calls made to `endpoint`.
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    /// Payloads sent to `endpoint`, oldest first.
    pub fn payloads(&self, endpoint: Endpoint) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .map(|c| c.payload.clone())
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call, wait out the delay and hand back any scripted reply.
    async fn call(&self, endpoint: Endpoint, payload: &str) -> Option<MockReply> {
        let reply = {
            let mut state = self.lock();
            state.calls.push(RecordedCall {
                endpoint,
                payload: payload.to_string(),
            });
            state.replies.get_mut(&endpoint).and_then(VecDeque::pop_front)
        };
        if let Some(delay) = self.delays.get(&endpoint) {
            tokio::time::sleep(*delay).await;
        }
        reply
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn get_user(&self) -> Result<Option<String>, BackendError> {
        match self.call(Endpoint::GetUser, "").await {
            None => Ok(self.user.clone()),
            Some(reply) => Err(reply.into_error()),
        }
    }

    async fn get_results(&self) -> Result<Artifacts, BackendError> {
        match self.call(Endpoint::GetResults, "").await {
            None => Ok(self.saved_results.clone()),
            Some(MockReply::Results(artifacts)) => Ok(artifacts),
            Some(reply) => Err(reply.into_error()),
        }
    }

    async fn set_user(&self, name: &str) -> Result<String, BackendError> {
        match self.call(Endpoint::SetUser, name).await {
            None => Ok(name.to_string()),
            Some(reply) => Err(reply.into_error()),
        }
    }

    async fn generate(&self, story: &str) -> Result<Artifacts, BackendError> {
        match self.call(Endpoint::Generate, story).await {
            None => Ok(sample_artifacts()),
            Some(MockReply::Results(artifacts)) => Ok(artifacts),
            Some(reply) => Err(reply.into_error()),
        }
    }

    async fn generate_shot_image(&self, shot_description: &str) -> Result<ShotImage, BackendError> {
        match self.call(Endpoint::GenerateShotImage, shot_description).await {
            None => Ok(ShotImage {
                image_url: format!("/static/shots/{}.png", shot_description.len()),
                image_prompt: format!("Storyboard frame: {shot_description}"),
            }),
            Some(MockReply::Image(image)) => Ok(image),
            Some(reply) => Err(reply.into_error()),
        }
    }

    async fn export(
        &self,
        _artifact: ArtifactKey,
        _format: ExportFormat,
        content: &str,
        _story: &str,
    ) -> Result<Vec<u8>, BackendError> {
        match self.call(Endpoint::Export, content).await {
            None => Ok(content.as_bytes().to_vec()),
            Some(MockReply::Document(bytes)) => Ok(bytes),
            Some(reply) => Err(reply.into_error()),
        }
    }
}

/// Test harness for running studio scenarios.
pub struct TestHarness {
    /// The mock backend, shared with the session.
    pub backend: Arc<MockBackend>,
    /// The session under test.
    pub session: Session,
}

impl TestHarness {
    /// Create a harness over an unscripted backend.
    pub fn new() -> Self {
        Self::with_backend(MockBackend::new())
    }

    /// Create a harness over a scripted backend.
    pub fn with_backend(backend: MockBackend) -> Self {
        let download_dir = std::env::temp_dir().join("scriptoria-tests");
        Self::with_config(backend, SessionConfig::new(download_dir))
    }

    pub fn with_config(backend: MockBackend, config: SessionConfig) -> Self {
        let backend = Arc::new(backend);
        let session = Session::new(backend.clone(), config);
        Self { backend, session }
    }

    /// Submit a story and wait for everything it scheduled to settle.
    pub async fn generate(&mut self, story: &str) -> Result<Submission, SessionError> {
        let submission = self.session.run_generation(story)?;
        self.session.settle().await;
        Ok(submission)
    }

    /// Queued notice messages, oldest first.
    pub fn notices(&mut self) -> Vec<String> {
        self.session
            .drain_notices()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    pub fn download_dir(&self) -> PathBuf {
        self.session.download_dir().to_path_buf()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
