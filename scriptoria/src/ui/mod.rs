//! UI module for the studio TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;
