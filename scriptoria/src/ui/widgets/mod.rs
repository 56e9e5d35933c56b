//! TUI widgets for the studio

pub mod artifact;
pub mod export_panel;
pub mod input;
pub mod progress;
pub mod shot_card;
pub mod sidebar;
pub mod status_bar;

pub use artifact::ArtifactWidget;
pub use export_panel::ExportPanelWidget;
pub use input::StoryInputWidget;
pub use progress::ProgressTrackerWidget;
pub use shot_card::{ShotCardWidget, CARD_HEIGHT};
pub use sidebar::SidebarWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
