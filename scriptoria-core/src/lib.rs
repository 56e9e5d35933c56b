//! Generation and artifact orchestration engine for the Scriptoria studio.
//!
//! This crate provides:
//! - The artifact store and its display projection
//! - A layered shot segmenter for generated shot lists
//! - The exclusive "generate everything" run with a simulated progress feed
//! - Independent, retryable storyboard image tasks per shot
//! - Navigation locking and the export dispatcher
//! - A [`Session`] controller that owns all of the above
//!
//! # Quick Start
//!
//! ```ignore
//! use scriptoria_core::{Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::from_env(SessionConfig::from_env())?;
//!     session.bootstrap().await;
//!
//!     session.run_generation("A lighthouse keeper finds a map in a bottle.")?;
//!     session.settle().await;
//!
//!     for notice in session.drain_notices() {
//!         println!("{notice}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod artifacts;
pub mod backend;
pub mod error;
pub mod export;
pub mod generation;
pub mod headless;
pub mod navigation;
pub mod notice;
pub mod segmenter;
pub mod session;
pub mod shots;
pub mod testing;
pub mod timer;

// Wire types shared with the HTTP client
pub use scriptoria_client::{ArtifactKey, Artifacts, Client, ExportFormat, ShotImage};

/// Errors reported by a [`Backend`].
pub type BackendError = scriptoria_client::Error;

// Primary public API
pub use artifacts::{ArtifactStore, RenderedArtifact};
pub use backend::Backend;
pub use error::{ExportError, SessionError, ValidationError};
pub use generation::{GenerationRun, ProgressMark, RunStatus};
pub use headless::{HeadlessConfig, HeadlessStudio};
pub use navigation::{NavOutcome, Navigator, View};
pub use notice::{Notice, NoticeLevel, StatusIndicator};
pub use segmenter::{segment, Tier};
pub use session::{Session, SessionConfig, SessionEvent, StoryLength, Submission, Timings};
pub use shots::{ShotAction, ShotBoard, ShotStage, ShotStatus};
pub use testing::{Endpoint, MockBackend, MockReply, TestHarness};
