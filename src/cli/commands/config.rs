//! Configuration management commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{print_formatted, print_success, OutputFormat};
use crate::config::Config;
use crate::ui::theme::ThemePreset;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Get a specific config value
    Get {
        /// Config key (e.g., "ui.theme", "map.fetch_on_startup")
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., "ui.theme", "catalog.path")
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[derive(Serialize)]
struct ConfigPathResult {
    path: String,
    exists: bool,
}

pub async fn run(command: ConfigCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => show(format),
        ConfigCommands::Get { key } => get(&key, format),
        ConfigCommands::Set { key, value } => set(&key, &value, quiet),
        ConfigCommands::Path => path(format),
    }
}

fn show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => println!("{}", toml::to_string_pretty(&config)?),
    }

    Ok(())
}

fn get(key: &str, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let value = get_config_value(&config, key)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&value)?),
        OutputFormat::Text => println!("{}", value),
    }

    Ok(())
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["ui", "theme"] => Ok(theme_key(config.ui.theme)?),
        ["map", "geojson_url"] => Ok(config.map.geojson_url.clone()),
        ["map", "fetch_on_startup"] => Ok(config.map.fetch_on_startup.to_string()),
        ["map", "cache_geojson"] => Ok(config.map.cache_geojson.to_string()),
        ["catalog", "path"] => Ok(config
            .catalog
            .path
            .clone()
            .unwrap_or_else(|| "<bundled>".to_string())),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

fn set(key: &str, value: &str, quiet: bool) -> Result<()> {
    let mut config = Config::load()?;

    set_config_value(&mut config, key, value)?;
    config.save()?;

    print_success(&format!("Set {} = {}", key, value), quiet);
    Ok(())
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["ui", "theme"] => {
            config.ui.theme = parse_theme(value)?;
        }
        ["map", "geojson_url"] => {
            config.map.geojson_url = value.to_string();
        }
        ["map", "fetch_on_startup"] => {
            config.map.fetch_on_startup = value.parse()?;
        }
        ["map", "cache_geojson"] => {
            config.map.cache_geojson = value.parse()?;
        }
        ["catalog", "path"] => {
            config.catalog.path = (!value.is_empty()).then(|| value.to_string());
        }
        _ => anyhow::bail!("Unknown config key: {}", key),
    }

    Ok(())
}

/// The name a preset is stored under in the config file
fn theme_key(preset: ThemePreset) -> Result<String> {
    match serde_json::to_value(preset)? {
        serde_json::Value::String(name) => Ok(name),
        other => anyhow::bail!("Unexpected theme encoding: {}", other),
    }
}

fn parse_theme(value: &str) -> Result<ThemePreset> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_lowercase())).map_err(|_| {
        let names: Vec<String> = ThemePreset::all()
            .iter()
            .filter_map(|preset| theme_key(*preset).ok())
            .collect();
        anyhow::anyhow!("Unknown theme '{}' (expected one of: {})", value, names.join(", "))
    })
}

fn path(format: OutputFormat) -> Result<()> {
    let path = Config::config_path()?;
    let exists = path.exists();

    let result = ConfigPathResult {
        path: path.to_string_lossy().to_string(),
        exists,
    };

    print_formatted(&result, format, |r| {
        format!("{}{}", r.path, if r.exists { "" } else { " (not found)" })
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_keys() {
        let config = Config::default();
        assert_eq!(get_config_value(&config, "ui.theme").unwrap(), "midnight");
        assert_eq!(get_config_value(&config, "catalog.path").unwrap(), "<bundled>");
        assert!(get_config_value(&config, "map.fetch_on_startup").is_ok());
        assert!(get_config_value(&config, "ui.font").is_err());
    }

    #[test]
    fn test_set_values() {
        let mut config = Config::default();

        set_config_value(&mut config, "ui.theme", "Ember").unwrap();
        assert_eq!(config.ui.theme, ThemePreset::Ember);

        set_config_value(&mut config, "map.cache_geojson", "false").unwrap();
        assert!(!config.map.cache_geojson);

        set_config_value(&mut config, "catalog.path", "/tmp/events.json").unwrap();
        assert_eq!(config.catalog.path.as_deref(), Some("/tmp/events.json"));
        set_config_value(&mut config, "catalog.path", "").unwrap();
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(set_config_value(&mut config, "ui.theme", "neon").is_err());
        assert!(set_config_value(&mut config, "map.fetch_on_startup", "maybe").is_err());
        assert!(set_config_value(&mut config, "nope", "1").is_err());
    }
}
