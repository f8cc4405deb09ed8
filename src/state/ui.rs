//! UI-related application state

use egui_commonmark::CommonMarkCache;

use crate::ui::theme::{Theme, ThemePreset};

/// UI-related state
pub struct UiState {
    /// Cache for markdown rendering of event descriptions
    pub markdown_cache: CommonMarkCache,
    /// Current theme preset
    pub theme_preset: ThemePreset,
    /// Colors of the current preset
    pub current_theme: Theme,
    /// Whether theme needs to be applied
    pub theme_dirty: bool,
    /// Whether to show the About dialog
    pub show_about_dialog: bool,
    /// List row to bring into view on the next frame
    pub scroll_to_row: Option<usize>,
}

impl UiState {
    /// Create a new UiState with the given theme
    pub fn new(preset: ThemePreset) -> Self {
        Self {
            markdown_cache: CommonMarkCache::default(),
            theme_preset: preset,
            current_theme: preset.theme(),
            theme_dirty: true, // Apply theme on first frame
            show_about_dialog: false,
            scroll_to_row: None,
        }
    }

    /// Switch presets; returns false if it was already active
    pub fn set_theme(&mut self, preset: ThemePreset) -> bool {
        if self.theme_preset == preset {
            return false;
        }
        self.theme_preset = preset;
        self.current_theme = preset.theme();
        self.theme_dirty = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_theme_marks_dirty() {
        let mut ui = UiState::new(ThemePreset::Midnight);
        ui.theme_dirty = false;

        assert!(!ui.set_theme(ThemePreset::Midnight));
        assert!(!ui.theme_dirty);

        assert!(ui.set_theme(ThemePreset::Ember));
        assert!(ui.theme_dirty);
        assert_eq!(ui.theme_preset, ThemePreset::Ember);
    }
}
