use eframe::egui::{self, Color32, Stroke, Visuals};
use serde::{Deserialize, Serialize};

use crate::state::RegionFill;

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Midnight,
    Ember,
    Ocean,
}

impl ThemePreset {
    /// Get all available presets
    pub fn all() -> &'static [ThemePreset] {
        &[ThemePreset::Midnight, ThemePreset::Ember, ThemePreset::Ocean]
    }

    /// Get display name for the preset
    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Midnight => "Midnight",
            ThemePreset::Ember => "Ember",
            ThemePreset::Ocean => "Ocean",
        }
    }

    /// Get the theme colors for this preset
    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Midnight => Theme::midnight(),
            ThemePreset::Ember => Theme::ember(),
            ThemePreset::Ocean => Theme::ocean(),
        }
    }
}

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    // Semantic colors
    pub error: Color32,

    // UI element colors
    pub border: Color32,
    pub selection: Color32,

    // Map fills
    pub map_default: Color32,
    pub map_has_events: Color32,
    pub map_has_events_hover: Color32,
    pub map_active: Color32,
    /// Opacity multiplier applied to `map_default` for dimmed states
    pub map_dim_factor: f32,
    pub map_stroke: Color32,
}

impl Theme {
    /// Midnight theme - dark slate with blue highlights
    pub fn midnight() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(3, 7, 18),    // Gray-950
            bg_dark: Color32::from_rgb(17, 24, 39),     // Gray-900
            bg_medium: Color32::from_rgb(31, 41, 55),   // Gray-800
            bg_light: Color32::from_rgb(55, 65, 81),    // Gray-700

            text_primary: Color32::from_rgb(255, 255, 255),
            text_secondary: Color32::from_rgb(209, 213, 219), // Gray-300
            text_muted: Color32::from_rgb(156, 163, 175),     // Gray-400

            accent: Color32::from_rgb(96, 165, 250),        // Blue-400
            accent_hover: Color32::from_rgb(147, 197, 253), // Blue-300
            accent_muted: Color32::from_rgb(37, 99, 235),   // Blue-600

            error: Color32::from_rgb(248, 113, 113), // Red-400

            border: Color32::from_rgb(35, 35, 38),
            selection: Color32::from_rgb(96, 165, 250).gamma_multiply(0.3),

            map_default: Color32::from_rgb(30, 41, 57),
            map_has_events: Color32::from_rgb(34, 88, 161),
            map_has_events_hover: Color32::from_rgb(67, 122, 198),
            map_active: Color32::from_rgb(59, 130, 246),
            map_dim_factor: 0.3,
            map_stroke: Color32::from_rgb(18, 18, 18),
        }
    }

    /// Ember theme - charcoal with orange highlights
    pub fn ember() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(14, 12, 11),
            bg_dark: Color32::from_rgb(23, 20, 18),
            bg_medium: Color32::from_rgb(35, 30, 27),
            bg_light: Color32::from_rgb(54, 46, 41),

            text_primary: Color32::from_rgb(252, 247, 242),
            text_secondary: Color32::from_rgb(214, 204, 195),
            text_muted: Color32::from_rgb(150, 138, 128),

            accent: Color32::from_rgb(251, 146, 60),       // Orange-400
            accent_hover: Color32::from_rgb(253, 186, 116), // Orange-300
            accent_muted: Color32::from_rgb(194, 65, 12),  // Orange-700

            error: Color32::from_rgb(248, 113, 113),

            border: Color32::from_rgb(58, 50, 45),
            selection: Color32::from_rgb(251, 146, 60).gamma_multiply(0.25),

            map_default: Color32::from_rgb(48, 42, 38),
            map_has_events: Color32::from_rgb(154, 52, 18),
            map_has_events_hover: Color32::from_rgb(234, 88, 12),
            map_active: Color32::from_rgb(251, 146, 60),
            map_dim_factor: 0.3,
            map_stroke: Color32::from_rgb(10, 9, 8),
        }
    }

    /// Ocean theme - deep navy with teal highlights
    pub fn ocean() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(4, 15, 26),
            bg_dark: Color32::from_rgb(8, 24, 40),
            bg_medium: Color32::from_rgb(14, 36, 58),
            bg_light: Color32::from_rgb(26, 54, 82),

            text_primary: Color32::from_rgb(236, 248, 252),
            text_secondary: Color32::from_rgb(186, 214, 226),
            text_muted: Color32::from_rgb(120, 152, 170),

            accent: Color32::from_rgb(45, 212, 191),       // Teal-400
            accent_hover: Color32::from_rgb(94, 234, 212), // Teal-300
            accent_muted: Color32::from_rgb(15, 118, 110), // Teal-700

            error: Color32::from_rgb(251, 113, 133),

            border: Color32::from_rgb(30, 58, 84),
            selection: Color32::from_rgb(45, 212, 191).gamma_multiply(0.25),

            map_default: Color32::from_rgb(20, 44, 68),
            map_has_events: Color32::from_rgb(17, 94, 89),
            map_has_events_hover: Color32::from_rgb(13, 148, 136),
            map_active: Color32::from_rgb(45, 212, 191),
            map_dim_factor: 0.35,
            map_stroke: Color32::from_rgb(2, 8, 14),
        }
    }

    /// Fill color for a map region
    pub fn region_fill(&self, fill: RegionFill) -> Color32 {
        match fill {
            RegionFill::Active => self.map_active,
            RegionFill::Dimmed => self.map_default.gamma_multiply(self.map_dim_factor),
            RegionFill::HasEventsHover => self.map_has_events_hover,
            RegionFill::HasEvents => self.map_has_events,
            RegionFill::Default => self.map_default,
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.window_fill = self.bg_medium;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;
        visuals.hyperlink_color = self.accent;
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.popup_shadow = egui::epaint::Shadow::NONE;
        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        // (fill, outline, text) per interaction state
        let states = [
            (&mut visuals.widgets.noninteractive, self.bg_medium, self.border, self.text_secondary),
            (&mut visuals.widgets.inactive, self.bg_light, self.border, self.text_primary),
            (&mut visuals.widgets.hovered, self.bg_light, self.accent, self.text_primary),
            (&mut visuals.widgets.active, self.accent_muted, self.accent_hover, self.text_primary),
            (&mut visuals.widgets.open, self.bg_light, self.accent, self.text_primary),
        ];
        for (widget, fill, outline, text) in states {
            widget.bg_fill = fill;
            widget.weak_bg_fill = fill;
            widget.bg_stroke = Stroke::new(1.0, outline);
            widget.fg_stroke = Stroke::new(1.0, text);
        }

        ctx.set_visuals(visuals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip_names() {
        for preset in ThemePreset::all() {
            let encoded = serde_json::to_string(preset).unwrap();
            let decoded: ThemePreset = serde_json::from_str(&encoded).unwrap();
            assert_eq!(*preset, decoded);
        }
        assert_eq!(serde_json::to_string(&ThemePreset::Midnight).unwrap(), "\"midnight\"");
    }

    #[test]
    fn test_region_fill_colors() {
        let theme = Theme::midnight();
        assert_eq!(theme.region_fill(RegionFill::Active), Color32::from_rgb(59, 130, 246));
        assert_eq!(theme.region_fill(RegionFill::HasEvents), Color32::from_rgb(34, 88, 161));
        assert_eq!(theme.region_fill(RegionFill::Default), theme.map_default);

        // Dimmed is the default tint, faded
        let dimmed = theme.region_fill(RegionFill::Dimmed);
        assert_ne!(dimmed, theme.map_default);
        assert!(dimmed.a() < theme.map_default.a());
    }
}
