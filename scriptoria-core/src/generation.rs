//! State machine for the single "generate all artifacts" run.
//!
//! At most one run is `Running` at a time. The progress tracker shown while a
//! run is in flight is purely simulated: a feed marks one artifact as in
//! progress every couple of seconds, independent of what the backend is
//! actually doing, and is cancelled the moment the real outcome arrives.

use crate::error::ValidationError;
use crate::ArtifactKey;

/// Stories shorter than this (after trimming) are rejected locally.
pub const MIN_STORY_CHARS: usize = 20;

/// Shown when the backend fails without saying why.
pub const GENERATION_FALLBACK: &str = "Generation failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Per-artifact mark in the progress tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMark {
    #[default]
    Pending,
    InProgress,
    Done,
    Error,
}

impl ProgressMark {
    pub fn icon(&self) -> &'static str {
        match self {
            ProgressMark::Pending => "⏳",
            ProgressMark::InProgress => "◌",
            ProgressMark::Done => "✅",
            ProgressMark::Error => "❌",
        }
    }
}

/// Inputs to [`GenerationRun::apply`]. Every event names the run it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    Started { run: u64 },
    /// One step of the simulated feed.
    Tick { run: u64 },
    Succeeded { run: u64 },
    Failed { run: u64, message: String },
}

/// State of the most recent generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationRun {
    run: u64,
    status: RunStatus,
    marks: [ProgressMark; 5],
    fed: usize,
    last_error: Option<String>,
    tracker_visible: bool,
}

impl GenerationRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Id of the current (or last) run; zero before the first run.
    pub fn run_id(&self) -> u64 {
        self.run
    }

    pub fn mark(&self, key: ArtifactKey) -> ProgressMark {
        self.marks[key.index()]
    }

    /// Marks in presentation order.
    pub fn marks(&self) -> impl Iterator<Item = (ArtifactKey, ProgressMark)> + '_ {
        ArtifactKey::ALL.into_iter().zip(self.marks.iter().copied())
    }

    /// How many artifacts the simulated feed has advanced through.
    pub fn fed(&self) -> usize {
        self.fed
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the progress tracker has been shown since startup.
    pub fn tracker_visible(&self) -> bool {
        self.tracker_visible
    }

    /// Apply one event. Returns `false` when the event was ignored.
    ///
    /// Events for any run other than the current one are stale and ignored,
    /// as is anything other than `Started` once the run has left `Running`.
    pub fn apply(&mut self, event: GenerationEvent) -> bool {
        match event {
            GenerationEvent::Started { run } => {
                if self.is_running() || run <= self.run {
                    return false;
                }
                *self = Self {
                    run,
                    status: RunStatus::Running,
                    tracker_visible: true,
                    ..Self::default()
                };
                true
            }
            GenerationEvent::Tick { run } => {
                if !self.is_current(run) || self.fed >= self.marks.len() {
                    return false;
                }
                self.marks[self.fed] = ProgressMark::InProgress;
                self.fed += 1;
                true
            }
            GenerationEvent::Succeeded { run } => {
                if !self.is_current(run) {
                    return false;
                }
                self.marks = [ProgressMark::Done; 5];
                self.status = RunStatus::Succeeded;
                true
            }
            GenerationEvent::Failed { run, message } => {
                if !self.is_current(run) {
                    return false;
                }
                self.marks = [ProgressMark::Error; 5];
                self.status = RunStatus::Failed;
                self.last_error = Some(message);
                true
            }
        }
    }

    fn is_current(&self, run: u64) -> bool {
        self.is_running() && run == self.run
    }
}

/// Trim and check a story prompt before anything touches the network.
pub fn validate_story(story: &str) -> Result<&str, ValidationError> {
    validate_story_len(story, MIN_STORY_CHARS)
}

pub(crate) fn validate_story_len(story: &str, min_chars: usize) -> Result<&str, ValidationError> {
    let trimmed = story.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyStory);
    }
    if trimmed.chars().count() < min_chars {
        return Err(ValidationError::StoryTooShort { min_chars });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(run: u64) -> GenerationRun {
        let mut state = GenerationRun::new();
        assert!(state.apply(GenerationEvent::Started { run }));
        state
    }

    #[test]
    fn test_start_resets_marks() {
        let mut state = running(1);
        state.apply(GenerationEvent::Tick { run: 1 });
        state.apply(GenerationEvent::Failed {
            run: 1,
            message: "boom".into(),
        });

        assert!(state.apply(GenerationEvent::Started { run: 2 }));
        assert_eq!(state.status(), RunStatus::Running);
        assert!(state.marks().all(|(_, m)| m == ProgressMark::Pending));
        assert_eq!(state.last_error(), None);
        assert_eq!(state.fed(), 0);
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let mut state = running(1);
        assert!(!state.apply(GenerationEvent::Started { run: 2 }));
        assert_eq!(state.run_id(), 1);
    }

    #[test]
    fn test_feed_advances_one_key_per_tick() {
        let mut state = running(1);
        assert!(state.apply(GenerationEvent::Tick { run: 1 }));
        assert!(state.apply(GenerationEvent::Tick { run: 1 }));

        assert_eq!(state.mark(ArtifactKey::Screenplay), ProgressMark::InProgress);
        assert_eq!(state.mark(ArtifactKey::Characters), ProgressMark::InProgress);
        assert_eq!(state.mark(ArtifactKey::SoundDesign), ProgressMark::Pending);
    }

    #[test]
    fn test_feed_stops_after_last_key() {
        let mut state = running(1);
        for _ in 0..5 {
            assert!(state.apply(GenerationEvent::Tick { run: 1 }));
        }
        assert!(!state.apply(GenerationEvent::Tick { run: 1 }));
        assert_eq!(state.fed(), 5);
    }

    #[test]
    fn test_success_marks_everything_done() {
        let mut state = running(1);
        state.apply(GenerationEvent::Tick { run: 1 });
        assert!(state.apply(GenerationEvent::Succeeded { run: 1 }));
        assert_eq!(state.status(), RunStatus::Succeeded);
        assert!(state.marks().all(|(_, m)| m == ProgressMark::Done));
    }

    #[test]
    fn test_failure_marks_everything_error() {
        let mut state = running(1);
        assert!(state.apply(GenerationEvent::Failed {
            run: 1,
            message: "Story input is required".into(),
        }));
        assert_eq!(state.status(), RunStatus::Failed);
        assert!(state.marks().all(|(_, m)| m == ProgressMark::Error));
        assert_eq!(state.last_error(), Some("Story input is required"));
    }

    #[test]
    fn test_tick_after_terminal_is_ignored() {
        let mut state = running(1);
        state.apply(GenerationEvent::Succeeded { run: 1 });
        assert!(!state.apply(GenerationEvent::Tick { run: 1 }));
        assert!(state.marks().all(|(_, m)| m == ProgressMark::Done));
    }

    #[test]
    fn test_stale_run_events_are_ignored() {
        let mut state = running(1);
        state.apply(GenerationEvent::Failed {
            run: 1,
            message: "x".into(),
        });
        state.apply(GenerationEvent::Started { run: 2 });

        assert!(!state.apply(GenerationEvent::Tick { run: 1 }));
        assert!(!state.apply(GenerationEvent::Succeeded { run: 1 }));
        assert_eq!(state.status(), RunStatus::Running);
    }

    #[test]
    fn test_validate_story() {
        assert_eq!(validate_story("   "), Err(ValidationError::EmptyStory));
        assert_eq!(
            validate_story("  too short story  "),
            Err(ValidationError::StoryTooShort { min_chars: 20 })
        );
        assert_eq!(
            validate_story("  A keeper finds a map in a bottle. "),
            Ok("A keeper finds a map in a bottle.")
        );
        // Exactly twenty characters is enough.
        assert!(validate_story("abcdefghijklmnopqrst").is_ok());
    }
}
