use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app_data::app_data;
use crate::ui::theme::ThemePreset;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Appearance settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color theme preset
    #[serde(default)]
    pub theme: ThemePreset,
}

/// Map geometry source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// GeoJSON FeatureCollection with one feature per state
    #[serde(default = "default_geojson_url")]
    pub geojson_url: String,
    /// Download the GeoJSON on startup when no cached copy exists
    #[serde(default = "default_true")]
    pub fetch_on_startup: bool,
    /// Keep a copy of the downloaded GeoJSON in the cache directory
    #[serde(default = "default_true")]
    pub cache_geojson: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            geojson_url: default_geojson_url(),
            fetch_on_startup: true,
            cache_geojson: true,
        }
    }
}

fn default_geojson_url() -> String {
    app_data().map.geojson_url.clone()
}

fn default_true() -> bool {
    true
}

/// Event catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional JSON file replacing the bundled catalog
    #[serde(default)]
    pub path: Option<String>,
}

/// Platform directories for this application
pub fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("br", "hackhere", "HackHere")
        .ok_or_else(|| anyhow::anyhow!("Could not determine application directories"))
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, using defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ui.theme, ThemePreset::Midnight);
        assert!(config.map.fetch_on_startup);
        assert!(config.map.cache_geojson);
        assert_eq!(config.map.geojson_url, app_data().map.geojson_url);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[map]\nfetch_on_startup = false\n").unwrap();
        assert!(!config.map.fetch_on_startup);
        assert!(config.map.cache_geojson);
        assert_eq!(config.map.geojson_url, app_data().map.geojson_url);
        assert_eq!(config.ui.theme, ThemePreset::Midnight);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.ui.theme = ThemePreset::Ember;
        config.catalog.path = Some("/tmp/events.json".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.theme, ThemePreset::Ember);
        assert_eq!(loaded.catalog.path.as_deref(), Some("/tmp/events.json"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui\ntheme = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
