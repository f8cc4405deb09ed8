//! Application state modules
//!
//! This module contains grouped state structs owned by HackHereApp.
//! The selection controller is the single source of truth for filtering;
//! the map and UI states only hold view-local data.

mod map;
mod selection;
mod ui;

pub use map::MapState;
pub use selection::{RegionFill, SelectionController};
pub use ui::UiState;

/// Events that state poll methods can return.
/// These communicate results back to HackHereApp without direct mutation.
#[derive(Debug)]
pub enum StateEvent {
    /// Update the status message
    StatusMessage(String),

    /// Log an error message
    LogError(String),

    /// Log an info message
    LogInfo(String),
}
