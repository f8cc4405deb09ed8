//! UI modules for HackHere
//!
//! Each panel of the window is rendered by its own module. Render
//! functions read from and write to `HackHereApp`; none of them keep
//! state of their own beyond egui's memory.

mod components;
mod detail;
mod map_view;
mod sidebar;
pub mod theme;

pub use components::{render_about_dialog, render_footer, render_header};
pub use detail::render_event_detail;
pub use map_view::render_map;
pub use sidebar::render_sidebar;
