//! Application data embedded from TOML/JSON files at compile time.
//!
//! This module provides access to application-level constants that are:
//! - Embedded at compile time via `include_str!`
//! - Parsed lazily on first access via `OnceLock`
//! - Immutable at runtime (not user-configurable)
//!
//! This is distinct from `config.rs` which handles user preferences.
//! App data defines *what the application shows* (region table, project links,
//! the bundled event catalog), while config defines *user choices* (theme,
//! map source, an external catalog file).
//!
//! Data files are located in `embedded/`:
//! - `app.toml` - titles, links, map defaults and the region table
//! - `events.json` - the bundled conference catalog

use serde::Deserialize;
use std::sync::OnceLock;

// Embed data files at compile time
const APP_TOML: &str = include_str!("../embedded/app.toml");
const EVENTS_JSON: &str = include_str!("../embedded/events.json");

/// Top-level structure of `app.toml`
#[derive(Debug, Deserialize)]
pub struct AppData {
    pub app: AppInfo,
    pub map: MapDefaults,
    pub regions: Vec<RegionInfo>,
}

/// Product name, titles and project links
#[derive(Debug, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub title: String,
    pub sidebar_title: String,
    pub repository_url: String,
    pub author: String,
}

impl AppInfo {
    /// Title of the About window
    pub fn about_title(&self) -> String {
        format!("Sobre o {}", self.name)
    }
}

/// Defaults for the map geometry source
#[derive(Debug, Deserialize)]
pub struct MapDefaults {
    pub geojson_url: String,
    pub cache_file: String,
    pub simplify_tolerance: f64,
}

/// One federative unit: code, display name and tile-grid cell
#[derive(Debug, Deserialize)]
pub struct RegionInfo {
    pub code: String,
    pub name: String,
    /// `[column, row]` in the fallback tile layout
    pub tile: [u8; 2],
}

/// Get the embedded application data (lazy-loaded)
pub fn app_data() -> &'static AppData {
    static DATA: OnceLock<AppData> = OnceLock::new();
    DATA.get_or_init(|| {
        toml::from_str(APP_TOML).unwrap_or_else(|e| {
            panic!("Failed to parse app.toml: {}", e);
        })
    })
}

/// Raw JSON of the bundled event catalog
pub fn embedded_events_json() -> &'static str {
    EVENTS_JSON
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_app_data_parses() {
        let data = app_data();
        assert_eq!(data.app.name, "HackHere");
        assert!(data.map.geojson_url.starts_with("https://"));
        assert!(data.map.simplify_tolerance > 0.0);
    }

    #[test]
    fn test_about_title_uses_app_name() {
        let info = &app_data().app;
        assert_eq!(info.about_title(), "Sobre o HackHere");
        assert_ne!(info.name, info.title);
    }

    #[test]
    fn test_region_table_has_all_units() {
        let regions = &app_data().regions;
        assert_eq!(regions.len(), 27);

        let codes: HashSet<&str> = regions.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes.len(), 27);
        assert!(regions.iter().all(|r| r.code.len() == 2));
    }

    #[test]
    fn test_tile_cells_are_unique() {
        let cells: HashSet<[u8; 2]> = app_data().regions.iter().map(|r| r.tile).collect();
        assert_eq!(cells.len(), 27);
    }
}
