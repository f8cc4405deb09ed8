//! Map-related application state

use eframe::egui;
use tokio::task::JoinHandle;

use crate::config::MapConfig;
use crate::geo::{self, GeoError, MapGeometry};
use crate::regions::StateCode;
use crate::state::StateEvent;
use crate::task::{poll_task, PollResult};

/// Map-related state.
///
/// Hover lives here rather than in the selection: it is local to the map,
/// changes on every pointer move and never affects the list or the detail.
pub struct MapState {
    /// State shapes currently drawn
    pub geometry: MapGeometry,
    /// State under the pointer (only states with events are tracked)
    pub hovered: Option<StateCode>,
    /// Async task fetching GeoJSON
    task: Option<JoinHandle<Result<MapGeometry, GeoError>>>,
    /// Whether geometry is currently being fetched
    pub loading: bool,
    /// Error message from last fetch attempt
    pub error: Option<String>,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            geometry: MapGeometry::tile_grid(),
            hovered: None,
            task: None,
            loading: false,
            error: None,
        }
    }
}

impl MapState {
    /// Start with cached polygons if available, otherwise the tile grid,
    /// fetching the GeoJSON in the background when configured to
    pub fn new(config: &MapConfig) -> (Self, Option<StateEvent>) {
        let mut state = Self::default();

        if let Some(geometry) = geo::load_cached() {
            state.geometry = geometry;
            return (state, None);
        }

        let event = if config.fetch_on_startup {
            state.fetch(config)
        } else {
            None
        };
        (state, event)
    }

    /// Update the hovered state; `None` when the pointer leaves
    pub fn set_hovered(&mut self, code: Option<StateCode>) {
        if self.hovered != code {
            self.hovered = code;
        }
    }

    /// Start fetching polygons from the configured URL
    pub fn fetch(&mut self, config: &MapConfig) -> Option<StateEvent> {
        if self.loading {
            return None; // Already fetching
        }

        self.loading = true;
        self.error = None;

        let url = config.geojson_url.clone();
        let cache = config.cache_geojson;
        self.task = Some(tokio::spawn(geo::fetch_geometry(url, cache)));

        Some(StateEvent::StatusMessage("Carregando mapa...".to_string()))
    }

    /// Poll the async fetch task for completion
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(Ok(geometry))) => {
                let count = geometry.regions.len();
                self.geometry = geometry;
                self.hovered = None;
                events.push(StateEvent::StatusMessage("Mapa carregado".to_string()));
                events.push(StateEvent::LogInfo(format!("Loaded polygons for {} states", count)));
                self.loading = false;
            }
            PollResult::Complete(Ok(Err(e))) => {
                let msg = e.to_string();
                events.push(StateEvent::LogError(format!("Failed to load map geometry: {}", msg)));
                events.push(StateEvent::StatusMessage(
                    "Mapa simplificado (falha ao carregar contornos)".to_string(),
                ));
                self.error = Some(msg);
                self.loading = false;
            }
            PollResult::Complete(Err(e)) => {
                let msg = e.to_string();
                events.push(StateEvent::LogError(format!("Task panicked: {}", msg)));
                self.error = Some(msg);
                self.loading = false;
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_tile_grid() {
        let state = MapState::default();
        assert!(state.geometry.is_tile_grid());
        assert!(!state.loading);
        assert!(state.hovered.is_none());
    }

    #[test]
    fn test_set_hovered() {
        let mut state = MapState::default();
        state.set_hovered(Some(StateCode::new("SP")));
        assert_eq!(state.hovered, Some(StateCode::new("SP")));
        state.set_hovered(None);
        assert!(state.hovered.is_none());
    }
}
