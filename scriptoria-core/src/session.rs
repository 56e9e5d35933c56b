//! Session - the primary public API for the studio.
//!
//! A [`Session`] owns every state machine (artifact store, generation run,
//! shot board, navigator) and the backend handle. Operations validate and
//! update state synchronously, then schedule network work on tokio tasks.
//! Those tasks never touch session state: they post [`SessionEvent`]s back,
//! and [`Session::handle`] applies them one at a time. All mutation therefore
//! happens in a single cooperative context, the caller's.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use scriptoria_client::Client;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::artifacts::{ArtifactStore, RenderedArtifact};
use crate::backend::Backend;
use crate::error::{SessionError, ValidationError};
use crate::export::ExportDispatcher;
use crate::generation::{
    validate_story_len, GenerationEvent, GenerationRun, GENERATION_FALLBACK, MIN_STORY_CHARS,
};
use crate::navigation::{ExportPanel, NavOutcome, Navigator, View};
use crate::notice::{Notice, StatusIndicator};
use crate::segmenter::segment;
use crate::shots::{ShotBoard, ShotStage, ShotStatus, SHOT_FALLBACK};
use crate::timer::Ticker;
use crate::{ArtifactKey, Artifacts, ExportFormat, ShotImage};

/// Greeting used before the user has given a name.
pub const DEFAULT_GREETING: &str = "Director";

/// Soft limit for the story prompt, shown as a hint only.
pub const STORY_SOFT_LIMIT: usize = 2700;

const GENERATION_SUCCESS: &str =
    "Production package generated! Select a deliverable from the sidebar.";
const NAME_FAILURE: &str = "Could not save name. Please try again.";

/// Cadences of the cosmetic animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Interval between steps of the simulated generation feed.
    pub feed_interval: Duration,
    /// Interval between shot loading stages.
    pub shot_stage_interval: Duration,
    /// Delay before jumping to the screenplay after a successful run.
    pub auto_navigate_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            feed_interval: Duration::from_secs(2),
            shot_stage_interval: Duration::from_millis(3500),
            auto_navigate_delay: Duration::from_millis(800),
        }
    }
}

impl Timings {
    pub fn with_feed_interval(mut self, interval: Duration) -> Self {
        self.feed_interval = interval;
        self
    }

    pub fn with_shot_stage_interval(mut self, interval: Duration) -> Self {
        self.shot_stage_interval = interval;
        self
    }

    pub fn with_auto_navigate_delay(mut self, delay: Duration) -> Self {
        self.auto_navigate_delay = delay;
        self
    }
}

/// Configuration for a studio session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where exported documents are saved.
    pub download_dir: PathBuf,

    /// Animation cadences.
    pub timings: Timings,

    /// Minimum trimmed story length accepted for generation.
    pub min_story_chars: usize,
}

impl SessionConfig {
    /// Create a config that saves exports into `download_dir`.
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            timings: Timings::default(),
            min_story_chars: MIN_STORY_CHARS,
        }
    }

    /// Read `SCRIPTORIA_DOWNLOAD_DIR`, falling back to the user's download
    /// directory and then the working directory.
    pub fn from_env() -> Self {
        let download_dir = std::env::var_os("SCRIPTORIA_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(download_dir)
    }

    /// Set the export directory.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Set the animation cadences.
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Set the minimum story length.
    pub fn with_min_story_chars(mut self, chars: usize) -> Self {
        self.min_story_chars = chars;
        self
    }
}

/// Completions and timer ticks posted back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    GenerationTick {
        run: u64,
    },
    GenerationFinished {
        run: u64,
        outcome: Result<Artifacts, String>,
    },
    AutoNavigate {
        run: u64,
    },
    ShotTick {
        index: usize,
        attempt: u64,
    },
    ShotFinished {
        index: usize,
        attempt: u64,
        outcome: Result<ShotImage, String>,
    },
    ExportFinished {
        key: ArtifactKey,
        format: ExportFormat,
        outcome: Result<PathBuf, String>,
    },
}

/// Result of asking for a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Started { run: u64 },
    /// A run was already in flight; nothing happened.
    AlreadyRunning,
}

/// Character count of a story prompt against the soft limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryLength {
    pub chars: usize,
    pub limit: usize,
}

impl StoryLength {
    pub fn of(story: &str) -> Self {
        Self {
            chars: story.chars().count(),
            limit: STORY_SOFT_LIMIT,
        }
    }

    pub fn is_over(&self) -> bool {
        self.chars > self.limit
    }
}

/// Posts the outcome of a generation run exactly once.
///
/// If the request task ends without calling [`RunGuard::finish`] (panic or
/// abort), dropping the guard reports a failure so the run never stays
/// `Running`.
struct RunGuard {
    run: u64,
    events: UnboundedSender<SessionEvent>,
    finished: bool,
}

impl RunGuard {
    fn new(run: u64, events: UnboundedSender<SessionEvent>) -> Self {
        Self {
            run,
            events,
            finished: false,
        }
    }

    fn finish(mut self, outcome: Result<Artifacts, String>) {
        self.finished = true;
        let _ = self.events.send(SessionEvent::GenerationFinished {
            run: self.run,
            outcome,
        });
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.events.send(SessionEvent::GenerationFinished {
                run: self.run,
                outcome: Err(GENERATION_FALLBACK.to_string()),
            });
        }
    }
}

/// A studio session.
///
/// This is the main entry point. It manages:
/// - The artifact store and the single generation run
/// - Storyboard image tasks for the current shot list
/// - View locking, navigation and exports
/// - User-facing notices and the status indicator
pub struct Session {
    backend: Arc<dyn Backend>,
    config: SessionConfig,
    store: ArtifactStore,
    generation: GenerationRun,
    shots: ShotBoard,
    navigator: Navigator,
    exporter: ExportDispatcher,
    status: StatusIndicator,
    user_name: Option<String>,
    notices: VecDeque<Notice>,
    last_export: Option<Result<PathBuf, String>>,
    exports_pending: usize,
    pending_navigation: Option<(u64, Ticker)>,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
}

impl Session {
    /// Create a session over any backend.
    pub fn new(backend: Arc<dyn Backend>, config: SessionConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let exporter = ExportDispatcher::new(config.download_dir.clone());
        Self {
            backend,
            config,
            store: ArtifactStore::new(),
            generation: GenerationRun::new(),
            shots: ShotBoard::new(),
            navigator: Navigator::new(),
            exporter,
            status: StatusIndicator::Idle,
            user_name: None,
            notices: VecDeque::new(),
            last_export: None,
            exports_pending: 0,
            pending_navigation: None,
            events_tx,
            events_rx,
        }
    }

    /// Create a session talking to the backend named by `SCRIPTORIA_URL`.
    pub fn from_env(config: SessionConfig) -> Result<Self, SessionError> {
        let client = Client::from_env()?;
        Ok(Self::new(Arc::new(client), config))
    }

    // ========================================================================
    // Startup and identity
    // ========================================================================

    /// Restore a previous session, if the backend remembers one.
    ///
    /// Looks up the session's user and, when there is one, its stored
    /// artifacts. A non-empty restore unlocks every view. Any failure leaves
    /// the session as if this were a first visit. Returns `true` when
    /// artifacts were restored.
    pub async fn bootstrap(&mut self) -> bool {
        let name = match self.backend.get_user().await {
            Ok(Some(name)) => name,
            Ok(None) => return false,
            Err(e) => {
                debug!(error = %e, "no session to restore");
                return false;
            }
        };
        self.user_name = Some(name);

        let artifacts = match self.backend.get_results().await {
            Ok(artifacts) => artifacts,
            Err(e) => {
                debug!(error = %e, "could not restore results");
                return false;
            }
        };
        if artifacts.is_empty() {
            return false;
        }

        info!(count = artifacts.len(), "restored previous results");
        self.replace_store(artifacts);
        self.navigator.unlock_all();
        if let Some(first) = self.store.keys().next() {
            self.navigator.set_current_export(first);
        }
        self.status = StatusIndicator::Active("Ready".to_string());
        true
    }

    /// Register the user's display name with the backend.
    pub async fn enter_name(&mut self, name: &str) -> Result<String, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(ValidationError::EmptyName));
        }

        match self.backend.set_user(name).await {
            Ok(stored) => {
                info!(name = %stored, "user entered the studio");
                self.user_name = Some(stored.clone());
                Ok(stored)
            }
            Err(e) => {
                warn!(error = %e, "failed to save name");
                self.notices.push_back(Notice::warning(NAME_FAILURE));
                Err(e.into())
            }
        }
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Name shown in the top bar.
    pub fn greeting(&self) -> &str {
        self.user_name.as_deref().unwrap_or(DEFAULT_GREETING)
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Start the "generate everything" run for `story`.
    ///
    /// Only one run is ever in flight; a call while running is a no-op.
    /// Invalid stories are rejected locally with a notice and send nothing.
    pub fn run_generation(&mut self, story: &str) -> Result<Submission, SessionError> {
        if self.generation.is_running() {
            debug!("generation already running, ignoring submission");
            return Ok(Submission::AlreadyRunning);
        }
        let story = match validate_story_len(story, self.config.min_story_chars) {
            Ok(story) => story.to_string(),
            Err(e) => return Err(self.reject(e)),
        };

        let run = self.generation.run_id() + 1;
        self.generation.apply(GenerationEvent::Started { run });
        self.status = StatusIndicator::Loading("Generating...".to_string());
        self.pending_navigation = None;
        info!(run, story_len = story.len(), "generation started");

        let backend = self.backend.clone();
        let events = self.events_tx.clone();
        let feed_interval = self.config.timings.feed_interval;
        tokio::spawn(async move {
            let guard = RunGuard::new(run, events.clone());
            let feed = Ticker::spawn(feed_interval, ArtifactKey::ALL.len(), move |_| {
                events.send(SessionEvent::GenerationTick { run }).is_ok()
            });

            let outcome = backend.generate(&story).await.map_err(|e| {
                warn!(run, error = %e, "generation request failed");
                e.user_message(GENERATION_FALLBACK)
            });

            feed.cancel();
            guard.finish(outcome);
        });

        Ok(Submission::Started { run })
    }

    pub fn generation(&self) -> &GenerationRun {
        &self.generation
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_running()
    }

    // ========================================================================
    // Shots
    // ========================================================================

    /// Shot descriptions segmented from the stored shot list.
    ///
    /// Empty when there is no shot list or nothing usable could be split out;
    /// the display then shows the raw text as one block.
    pub fn shots(&self) -> Vec<String> {
        self.store
            .get(ArtifactKey::ShotList)
            .map(segment)
            .unwrap_or_default()
    }

    pub fn shot_board(&self) -> &ShotBoard {
        &self.shots
    }

    pub fn shot_status(&self, index: usize) -> ShotStatus {
        self.shots.status(index)
    }

    /// Request a storyboard image for shot `index` of the current shot list.
    ///
    /// Returns the attempt id, or `None` if that shot is already loading.
    pub fn generate_shot(&mut self, index: usize) -> Result<Option<u64>, SessionError> {
        let description = self
            .shots()
            .into_iter()
            .nth(index)
            .ok_or(ValidationError::UnknownShot(index))?;
        Ok(self.generate_shot_at(index, &description))
    }

    /// Re-run shot `index` with the description of its previous attempt.
    pub fn retry_shot(&mut self, index: usize) -> Result<Option<u64>, SessionError> {
        let description = self
            .shots
            .task(index)
            .map(|t| t.description().to_string())
            .ok_or(ValidationError::UnknownShot(index))?;
        Ok(self.generate_shot_at(index, &description))
    }

    /// Request an image for `(index, description)`.
    pub fn generate_shot_at(&mut self, index: usize, description: &str) -> Option<u64> {
        self.shots.sync(self.store.revision());
        let attempt = self.shots.begin(index, description)?;
        debug!(index, attempt, "shot image requested");

        let backend = self.backend.clone();
        let events = self.events_tx.clone();
        let description = description.to_string();
        let stage_interval = self.config.timings.shot_stage_interval;
        tokio::spawn(async move {
            let tick_events = events.clone();
            let stages = Ticker::spawn(stage_interval, ShotStage::ALL.len() - 1, move |_| {
                tick_events
                    .send(SessionEvent::ShotTick { index, attempt })
                    .is_ok()
            });

            let outcome = backend
                .generate_shot_image(&description)
                .await
                .map_err(|e| {
                    warn!(index, attempt, error = %e, "shot image request failed");
                    e.user_message(SHOT_FALLBACK)
                });

            stages.cancel();
            let _ = events.send(SessionEvent::ShotFinished {
                index,
                attempt,
                outcome,
            });
        });

        Some(attempt)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Activate the view for `key`. Locked views are a no-op.
    pub fn select(&mut self, key: ArtifactKey) -> NavOutcome {
        let outcome = self.navigator.select(key, &self.store);
        debug!(%key, ?outcome, "select view");
        outcome
    }

    /// Return to the story prompt. Always allowed.
    pub fn go_to_input(&mut self) {
        self.navigator.go_to_input();
    }

    pub fn active_view(&self) -> View {
        self.navigator.active()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Consume a pending request to focus the prompt entry.
    pub fn take_focus_request(&mut self) -> bool {
        self.navigator.take_focus_request()
    }

    /// Rendered body of `key` if its view has been visited for the current store.
    pub fn rendered(&self, key: ArtifactKey) -> Option<&RenderedArtifact> {
        self.navigator.rendered(key, &self.store)
    }

    pub fn export_panel(&self) -> Option<ExportPanel> {
        self.navigator.export_panel(&self.store)
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Export `key` as `format` into the download directory.
    pub fn export(&mut self, key: ArtifactKey, format: ExportFormat) -> Result<(), SessionError> {
        let job = match self.exporter.prepare(&self.store, key, format) {
            Ok(job) => job,
            Err(e) => return Err(self.reject(e)),
        };

        self.notices.push_back(Notice::info(format!(
            "Preparing {} download...",
            format.label()
        )));
        self.exports_pending += 1;

        let backend = self.backend.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = job.run(backend.as_ref()).await.map_err(|e| {
                warn!(%key, %format, error = %e, "export failed");
                e.user_message()
            });
            let _ = events.send(SessionEvent::ExportFinished {
                key,
                format,
                outcome,
            });
        });
        Ok(())
    }

    /// Export whatever the export panel currently targets.
    pub fn export_current(&mut self, format: ExportFormat) -> Result<(), SessionError> {
        let key = self
            .export_panel()
            .map(|p| p.current)
            .unwrap_or(ArtifactKey::Screenplay);
        self.export(key, format)
    }

    /// Outcome of the most recently finished export.
    pub fn last_export(&self) -> Option<&Result<PathBuf, String>> {
        self.last_export.as_ref()
    }

    pub fn download_dir(&self) -> &std::path::Path {
        self.exporter.download_dir()
    }

    // ========================================================================
    // Event loop
    // ========================================================================

    /// Apply one event. Returns `false` when it was stale and ignored.
    pub fn handle(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::GenerationTick { run } => {
                self.generation.apply(GenerationEvent::Tick { run })
            }
            SessionEvent::GenerationFinished { run, outcome } => {
                self.finish_generation(run, outcome)
            }
            SessionEvent::AutoNavigate { run } => match self.pending_navigation.take() {
                Some((pending, _timer)) if pending == run => {
                    self.navigator.select(ArtifactKey::Screenplay, &self.store);
                    true
                }
                other => {
                    self.pending_navigation = other;
                    false
                }
            },
            SessionEvent::ShotTick { index, attempt } => self.shots.tick(index, attempt),
            SessionEvent::ShotFinished {
                index,
                attempt,
                outcome,
            } => {
                let applied = self.shots.resolve(index, attempt, outcome);
                if !applied {
                    debug!(index, attempt, "ignoring stale shot result");
                }
                applied
            }
            SessionEvent::ExportFinished {
                key,
                format,
                outcome,
            } => {
                self.exports_pending = self.exports_pending.saturating_sub(1);
                match &outcome {
                    Ok(_) => self
                        .notices
                        .push_back(Notice::success(format!("{} downloaded!", format.label()))),
                    Err(message) => self
                        .notices
                        .push_back(Notice::error(format!("Export failed: {message}"))),
                }
                debug!(%key, "export settled");
                self.last_export = Some(outcome);
                true
            }
        }
    }

    fn finish_generation(&mut self, run: u64, outcome: Result<Artifacts, String>) -> bool {
        match outcome {
            Ok(artifacts) => {
                if !self.generation.apply(GenerationEvent::Succeeded { run }) {
                    return false;
                }
                info!(run, count = artifacts.len(), "generation succeeded");
                self.replace_store(artifacts);
                self.navigator.unlock_all();
                self.navigator.set_current_export(ArtifactKey::ALL[0]);
                self.status = StatusIndicator::Active("Complete".to_string());
                self.notices.push_back(Notice::success(GENERATION_SUCCESS));

                let events = self.events_tx.clone();
                let timer = Ticker::once(self.config.timings.auto_navigate_delay, move || {
                    let _ = events.send(SessionEvent::AutoNavigate { run });
                });
                self.pending_navigation = Some((run, timer));
                true
            }
            Err(message) => {
                if !self.generation.apply(GenerationEvent::Failed {
                    run,
                    message: message.clone(),
                }) {
                    return false;
                }
                info!(run, "generation failed");
                self.status = StatusIndicator::Error("Error".to_string());
                self.notices.push_back(Notice::error(message));
                true
            }
        }
    }

    /// Wait for the next event without applying it.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Whether any scheduled work has yet to report back.
    pub fn is_busy(&self) -> bool {
        self.generation.is_running()
            || self.shots.loading_count() > 0
            || self.exports_pending > 0
            || self.pending_navigation.is_some()
    }

    /// Apply events until every scheduled operation has settled.
    pub async fn settle(&mut self) {
        loop {
            while let Some(event) = self.try_next_event() {
                self.handle(event);
            }
            if !self.is_busy() {
                break;
            }
            match self.next_event().await {
                Some(event) => {
                    self.handle(event);
                }
                None => break,
            }
        }
    }

    // ========================================================================
    // State queries
    // ========================================================================

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn status(&self) -> &StatusIndicator {
        &self.status
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn story_length(&self, story: &str) -> StoryLength {
        StoryLength::of(story)
    }

    fn replace_store(&mut self, artifacts: Artifacts) {
        self.store.replace(artifacts);
        self.shots.sync(self.store.revision());
    }

    fn reject(&mut self, error: ValidationError) -> SessionError {
        debug!(%error, "rejected locally");
        self.notices.push_back(Notice::warning(error.to_string()));
        error.into()
    }
}
