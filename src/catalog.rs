//! Conference event catalog.
//!
//! The catalog is loaded once at startup, either from the bundled
//! `embedded/events.json` or from a user-supplied file, and is read-only
//! afterwards. Catalog order is the order of the unfiltered list.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app_data;
use crate::config::CatalogConfig;
use crate::regions::StateCode;

/// Shown for events without a usable date
pub const DATE_TBD: &str = "Data a definir";

const MONTHS_PT: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

/// Errors that can occur while loading a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Social network links of an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl Socials {
    /// Present links as (label, url) pairs, in display order
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Twitter", self.twitter.as_deref()),
            ("Telegram", self.telegram.as_deref()),
            ("Instagram", self.instagram.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.filter(|u| !u.is_empty()).map(|u| (label, u)))
        .collect()
    }
}

/// A single conference entry.
///
/// Only `name` is modelled as possibly absent; the other scalar fields fall
/// back to empty values so the views can render whatever subset exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// "YYYY-MM", or empty when unknown
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approximate: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<Socials>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    /// Name for display; nameless entries still need a row label
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(sem nome)")
    }

    /// Case-insensitive substring match on the name.
    ///
    /// `needle` must already be lowercased. A nameless event never matches,
    /// not even the empty needle.
    pub fn name_contains(&self, needle: &str) -> bool {
        let Some(name) = self.name.as_deref() else {
            return false;
        };
        needle.is_empty() || name.to_lowercase().contains(needle)
    }

    /// Whether this event passes the state filter (`None` means all states)
    pub fn in_state(&self, state: Option<&StateCode>) -> bool {
        state.is_none_or(|code| code == self.state.as_str())
    }

    pub fn state_code(&self) -> Option<StateCode> {
        (!self.state.is_empty()).then(|| StateCode::new(self.state.as_str()))
    }

    pub fn formatted_date(&self) -> String {
        format_event_date(&self.date)
    }

    /// "city, state", skipping whichever part is missing
    pub fn location(&self) -> String {
        [self.city.as_str(), self.state.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Format a "YYYY-MM" date as Portuguese month and year ("março de 2025").
///
/// Anything that is not exactly two `-`-separated numeric parts naming a
/// real month falls back to [`DATE_TBD`].
pub fn format_event_date(date: &str) -> String {
    let parts: Vec<&str> = date.trim().split('-').collect();
    let [year, month] = parts.as_slice() else {
        return DATE_TBD.to_string();
    };

    let (Ok(year), Ok(month)) = (year.trim().parse::<i32>(), month.trim().parse::<u32>()) else {
        return DATE_TBD.to_string();
    };

    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first_day) => format!("{} de {}", MONTHS_PT[first_day.month0() as usize], first_day.year()),
        None => DATE_TBD.to_string(),
    }
}

/// Result counter shown above the list
pub fn results_label(count: usize) -> String {
    if count == 1 {
        "1 resultado".to_string()
    } else {
        format!("{} resultados", count)
    }
}

/// The ordered, immutable list of events
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Parse a JSON array of events
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let events: Vec<Event> = serde_json::from_str(json)?;
        Ok(Self::new(events))
    }

    /// Load a catalog from a JSON file on disk
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The catalog bundled with the application
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(app_data::embedded_events_json())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Unique, non-empty state codes that have at least one event (sorted)
    pub fn states_with_events(&self) -> BTreeSet<StateCode> {
        self.events.iter().filter_map(Event::state_code).collect()
    }

    /// Number of events per state code
    pub fn counts_by_state(&self) -> BTreeMap<StateCode, usize> {
        let mut counts = BTreeMap::new();
        for code in self.events.iter().filter_map(Event::state_code) {
            *counts.entry(code).or_insert(0) += 1;
        }
        counts
    }
}

/// Load the catalog described by the configuration.
///
/// A configured file that cannot be read falls back to the bundled catalog;
/// if even that fails the application starts with an empty list.
pub fn load_catalog(config: &CatalogConfig) -> Catalog {
    if let Some(ref path) = config.path {
        match Catalog::from_path(Path::new(path)) {
            Ok(catalog) => {
                tracing::info!("Loaded {} events from {}", catalog.len(), path);
                return catalog;
            }
            Err(e) => {
                tracing::warn!("Failed to load catalog from {}: {}. Using bundled catalog", path, e);
            }
        }
    }

    match Catalog::embedded() {
        Ok(catalog) => {
            tracing::info!("Loaded {} bundled events", catalog.len());
            catalog
        }
        Err(e) => {
            tracing::error!("Bundled catalog is invalid: {}", e);
            Catalog::default()
        }
    }
}
