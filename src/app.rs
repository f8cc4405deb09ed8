use eframe::egui;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::regions::StateCode;
use crate::state::{MapState, SelectionController, StateEvent, UiState};
use crate::ui::theme::ThemePreset;
use crate::ui::{render_about_dialog, render_event_detail, render_footer, render_header, render_map, render_sidebar};

/// Width of the filter/list sidebar; the detail overlay is placed after it
pub const SIDEBAR_WIDTH: f32 = 384.0;

/// Main application state
pub struct HackHereApp {
    /// Application configuration
    pub config: Config,
    /// Search term, state filter and selected event
    pub selection: SelectionController,
    /// Map geometry and hover
    pub map: MapState,
    /// Theme, dialogs and scroll requests
    pub ui: UiState,
    /// Status message for the footer
    pub status_message: String,
}

impl HackHereApp {
    /// Create a new application instance around an already loaded catalog
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config, catalog: Arc<Catalog>) -> Self {
        let status_message = if catalog.is_empty() {
            "Nenhum evento carregado".to_string()
        } else {
            format!("{} eventos carregados", catalog.len())
        };
        let (map, map_event) = MapState::new(&config.map);
        let ui = UiState::new(config.ui.theme);

        let mut app = Self {
            config,
            selection: SelectionController::new(catalog),
            map,
            ui,
            status_message,
        };

        app.handle_state_events(map_event);
        app
    }

    /// Apply events returned by state poll methods
    pub fn handle_state_events(&mut self, events: impl IntoIterator<Item = StateEvent>) {
        for event in events {
            match event {
                StateEvent::StatusMessage(msg) => self.status_message = msg,
                StateEvent::LogError(msg) => tracing::error!("{}", msg),
                StateEvent::LogInfo(msg) => tracing::info!("{}", msg),
            }
        }
    }

    /// Map click on a state with events
    pub fn on_state_activate(&mut self, code: StateCode) {
        self.selection.select_state(Some(code));
    }

    /// List row click: select it and bring it into view
    pub fn on_event_click(&mut self, index: usize) {
        self.selection.select_event_by_index(index);
        self.ui.scroll_to_row = Some(index);
    }

    /// Retry downloading state outlines
    pub fn reload_map(&mut self) {
        let event = self.map.fetch(&self.config.map);
        self.handle_state_events(event);
    }

    /// Switch theme and remember the choice
    pub fn set_theme(&mut self, preset: ThemePreset) {
        if self.ui.set_theme(preset) {
            self.config.ui.theme = preset;
            self.save_config();
        }
    }

    /// Save configuration to disk
    pub fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Open a link in the system browser
    pub fn open_link(&mut self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::error!("Failed to open {}: {}", url, e);
            self.status_message = format!("Não foi possível abrir {}", url);
        }
    }
}

impl eframe::App for HackHereApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.ui.current_theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        // Poll async tasks
        let events = self.map.poll(ctx);
        self.handle_state_events(events);

        let theme = self.ui.current_theme.clone();

        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::new()
                    .fill(theme.bg_dark)
                    .inner_margin(egui::Margin::symmetric(24, 12))
                    .stroke(egui::Stroke::new(1.0, theme.border)),
            )
            .show(ctx, |ui| render_header(self, ui));

        egui::TopBottomPanel::bottom("footer")
            .frame(
                egui::Frame::new()
                    .fill(theme.bg_dark)
                    .inner_margin(egui::Margin::symmetric(24, 10))
                    .stroke(egui::Stroke::new(1.0, theme.border)),
            )
            .show(ctx, |ui| render_footer(self, ui));

        egui::SidePanel::left("sidebar")
            .exact_width(SIDEBAR_WIDTH)
            .resizable(false)
            .frame(
                egui::Frame::new()
                    .fill(theme.bg_dark)
                    .stroke(egui::Stroke::new(1.0, theme.border)),
            )
            .show(ctx, |ui| render_sidebar(self, ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.bg_darkest).inner_margin(16.0))
            .show(ctx, |ui| render_map(self, ui));

        render_event_detail(self, ctx);
        render_about_dialog(self, ctx);
    }
}
