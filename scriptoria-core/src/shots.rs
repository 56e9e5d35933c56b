//! Per-shot storyboard image tasks.
//!
//! Every shot card owns one task, keyed by its index in the current shot list.
//! Tasks are independent: any number may be loading at once, and each one can
//! be retried on its own. While a request is in flight the card plays a
//! three-stage animation that only illustrates progress; it says nothing about
//! when the image will actually arrive.

use std::collections::BTreeMap;

use crate::ShotImage;

/// Shown when image generation fails without a server message.
pub const SHOT_FALLBACK: &str = "Image generation failed";

/// Illustrative stages of the per-shot loading animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShotStage {
    Analyzing,
    CraftingPrompt,
    Rendering,
}

impl ShotStage {
    pub const ALL: [ShotStage; 3] = [
        ShotStage::Analyzing,
        ShotStage::CraftingPrompt,
        ShotStage::Rendering,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The following stage; the last stage holds.
    pub fn next(self) -> Self {
        match self {
            ShotStage::Analyzing => ShotStage::CraftingPrompt,
            ShotStage::CraftingPrompt | ShotStage::Rendering => ShotStage::Rendering,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShotStage::Analyzing => "Analyzing shot",
            ShotStage::CraftingPrompt => "Crafting prompt",
            ShotStage::Rendering => "Rendering frame",
        }
    }

    /// Width of the fill bar: 12% baseline plus 42% per stage reached.
    pub fn fill_percent(&self) -> u8 {
        12 + 42 * self.index() as u8
    }
}

/// Lifecycle of one shot's image. Exactly one variant holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShotStatus {
    #[default]
    Idle,
    Loading {
        attempt: u64,
        stage: ShotStage,
    },
    Success {
        image_url: String,
        prompt: String,
    },
    Error {
        message: String,
    },
}

impl ShotStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ShotStatus::Loading { .. })
    }
}

/// What the shot card's button does right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotAction {
    Generate,
    Regenerate,
    Retry,
}

impl ShotAction {
    pub fn label(&self) -> &'static str {
        match self {
            ShotAction::Generate => "Generate Image",
            ShotAction::Regenerate => "Regenerate",
            ShotAction::Retry => "Retry",
        }
    }
}

/// One shot card's task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotTask {
    description: String,
    status: ShotStatus,
}

impl ShotTask {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> &ShotStatus {
        &self.status
    }

    /// The enabled action, or `None` while a request is in flight.
    pub fn action(&self) -> Option<ShotAction> {
        action_for(&self.status)
    }
}

fn action_for(status: &ShotStatus) -> Option<ShotAction> {
    match status {
        ShotStatus::Idle => Some(ShotAction::Generate),
        ShotStatus::Loading { .. } => None,
        ShotStatus::Success { .. } => Some(ShotAction::Regenerate),
        ShotStatus::Error { .. } => Some(ShotAction::Retry),
    }
}

/// All shot tasks for the shot list currently on screen.
///
/// The board remembers which store revision it was built for. When the shot
/// list text is replaced by a new generation run, [`ShotBoard::sync`] drops
/// every task, so images from an older shot list never show against new
/// shots. Attempt ids keep increasing across resets, which lets late
/// responses for dropped tasks be recognised and ignored.
#[derive(Debug, Clone, Default)]
pub struct ShotBoard {
    revision: u64,
    tasks: BTreeMap<usize, ShotTask>,
    last_attempt: u64,
}

impl ShotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all tasks if the store revision changed. Returns `true` on reset.
    pub fn sync(&mut self, revision: u64) -> bool {
        if revision == self.revision {
            return false;
        }
        self.revision = revision;
        self.tasks.clear();
        true
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn task(&self, index: usize) -> Option<&ShotTask> {
        self.tasks.get(&index)
    }

    /// Status for `index`; shots never touched are idle.
    pub fn status(&self, index: usize) -> ShotStatus {
        self.tasks
            .get(&index)
            .map(|t| t.status.clone())
            .unwrap_or_default()
    }

    pub fn action(&self, index: usize) -> Option<ShotAction> {
        action_for(&self.status(index))
    }

    pub fn loading_count(&self) -> usize {
        self.tasks.values().filter(|t| t.status.is_loading()).count()
    }

    /// Move `index` to loading for a new attempt.
    ///
    /// Returns the attempt id, or `None` if that shot is already loading.
    /// Any previous image, prompt or error is cleared.
    pub fn begin(&mut self, index: usize, description: &str) -> Option<u64> {
        if self.status(index).is_loading() {
            return None;
        }
        self.last_attempt += 1;
        let attempt = self.last_attempt;
        self.tasks.insert(
            index,
            ShotTask {
                description: description.to_string(),
                status: ShotStatus::Loading {
                    attempt,
                    stage: ShotStage::Analyzing,
                },
            },
        );
        Some(attempt)
    }

    /// Advance the loading animation of `index` by one stage.
    pub fn tick(&mut self, index: usize, attempt: u64) -> bool {
        match self.loading_task(index, attempt) {
            Some(task) => {
                if let ShotStatus::Loading { stage, .. } = &mut task.status {
                    let next = stage.next();
                    let changed = next != *stage;
                    *stage = next;
                    changed
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Settle `index` with the outcome of `attempt`. Stale outcomes are ignored.
    pub fn resolve(&mut self, index: usize, attempt: u64, outcome: Result<ShotImage, String>) -> bool {
        let Some(task) = self.loading_task(index, attempt) else {
            return false;
        };
        task.status = match outcome {
            Ok(image) => ShotStatus::Success {
                image_url: image.image_url,
                prompt: image.image_prompt,
            },
            Err(message) => ShotStatus::Error { message },
        };
        true
    }

    fn loading_task(&mut self, index: usize, attempt: u64) -> Option<&mut ShotTask> {
        self.tasks.get_mut(&index).filter(|t| {
            matches!(t.status, ShotStatus::Loading { attempt: a, .. } if a == attempt)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str) -> ShotImage {
        ShotImage {
            image_url: url.to_string(),
            image_prompt: format!("prompt for {url}"),
        }
    }

    #[test]
    fn test_stage_progression_holds_at_last() {
        assert_eq!(ShotStage::Analyzing.next(), ShotStage::CraftingPrompt);
        assert_eq!(ShotStage::CraftingPrompt.next(), ShotStage::Rendering);
        assert_eq!(ShotStage::Rendering.next(), ShotStage::Rendering);
    }

    #[test]
    fn test_fill_percent() {
        let fills: Vec<u8> = ShotStage::ALL.iter().map(|s| s.fill_percent()).collect();
        assert_eq!(fills, vec![12, 54, 96]);
    }

    #[test]
    fn test_lifecycle_success() {
        let mut board = ShotBoard::new();
        assert_eq!(board.action(0), Some(ShotAction::Generate));

        let attempt = board.begin(0, "SHOT 1").unwrap();
        assert!(board.status(0).is_loading());
        assert_eq!(board.action(0), None);

        assert!(board.tick(0, attempt));
        assert!(board.tick(0, attempt));
        assert!(!board.tick(0, attempt), "final stage holds");

        assert!(board.resolve(0, attempt, Ok(image("/a.png"))));
        assert_eq!(
            board.status(0),
            ShotStatus::Success {
                image_url: "/a.png".into(),
                prompt: "prompt for /a.png".into()
            }
        );
        assert_eq!(board.action(0), Some(ShotAction::Regenerate));
    }

    #[test]
    fn test_retry_after_error_passes_through_loading() {
        let mut board = ShotBoard::new();
        let first = board.begin(2, "SHOT 3").unwrap();
        board.resolve(2, first, Err("GPU busy".into()));
        assert_eq!(board.action(2), Some(ShotAction::Retry));

        let second = board.begin(2, "SHOT 3").unwrap();
        assert!(second > first);
        assert_eq!(
            board.status(2),
            ShotStatus::Loading {
                attempt: second,
                stage: ShotStage::Analyzing
            }
        );
        assert_eq!(board.task(2).unwrap().description(), "SHOT 3");
    }

    #[test]
    fn test_begin_rejected_while_loading() {
        let mut board = ShotBoard::new();
        assert!(board.begin(1, "SHOT 2").is_some());
        assert!(board.begin(1, "SHOT 2").is_none());
    }

    #[test]
    fn test_tasks_are_independent() {
        let mut board = ShotBoard::new();
        let a = board.begin(0, "A").unwrap();
        let b = board.begin(1, "B").unwrap();
        assert_eq!(board.loading_count(), 2);

        board.resolve(1, b, Err("nope".into()));
        assert!(board.status(0).is_loading());
        assert!(board.tick(0, a));
        assert!(!board.tick(1, b));
    }

    #[test]
    fn test_sync_resets_and_ignores_late_results() {
        let mut board = ShotBoard::new();
        board.sync(1);
        let attempt = board.begin(0, "old shot").unwrap();

        assert!(board.sync(2));
        assert_eq!(board.status(0), ShotStatus::Idle);
        assert!(!board.resolve(0, attempt, Ok(image("/stale.png"))));
        assert_eq!(board.status(0), ShotStatus::Idle);

        assert!(!board.sync(2));
    }

    #[test]
    fn test_mismatched_attempt_ignored() {
        let mut board = ShotBoard::new();
        let first = board.begin(0, "A").unwrap();
        board.resolve(0, first, Err("x".into()));
        let second = board.begin(0, "A").unwrap();

        assert!(!board.resolve(0, first, Ok(image("/late.png"))));
        assert!(!board.tick(0, first));
        assert!(board.resolve(0, second, Ok(image("/fresh.png"))));
    }
}
