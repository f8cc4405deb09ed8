//! Sidebar: state filter, search box and the event list

use eframe::egui::{self, RichText};

use crate::app::HackHereApp;
use crate::app_data::app_data;
use crate::catalog::{results_label, Event};
use crate::regions;
use crate::ui::theme::Theme;

/// Something the user did in the list, applied once the list is drawn
enum RowAction {
    Select(usize),
    Open(String),
}

/// Render the sidebar
pub fn render_sidebar(app: &mut HackHereApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    egui::Frame::new().inner_margin(16.0).show(ui, |ui| {
        ui.set_width(ui.available_width());

        ui.label(
            RichText::new(&app_data().app.sidebar_title)
                .size(18.0)
                .strong()
                .color(theme.text_primary),
        );
        ui.add_space(12.0);

        render_state_dropdown(app, ui, &theme);
        ui.add_space(8.0);
        render_search_box(app, ui, &theme);
        ui.add_space(8.0);
        render_filter_indicator(app, ui, &theme);

        ui.add_space(8.0);
        ui.separator();
        ui.add_space(4.0);

        if let Some(action) = render_event_list(app, ui, &theme) {
            match action {
                RowAction::Select(index) => app.on_event_click(index),
                RowAction::Open(url) => app.open_link(&url),
            }
        }
    });
}

fn render_state_dropdown(app: &mut HackHereApp, ui: &mut egui::Ui, theme: &Theme) {
    const ALL_STATES: &str = "Todos os estados";

    let selected_text = app
        .selection
        .selected_state()
        .map(regions::dropdown_label)
        .unwrap_or_else(|| ALL_STATES.to_string());

    // Empty string stands for "all states"
    let mut picked: Option<String> = None;

    ui.label(RichText::new("Estado").color(theme.text_muted));
    egui::ComboBox::from_id_salt("state_select")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            let current = app.selection.selected_state();
            if ui.selectable_label(current.is_none(), ALL_STATES).clicked() {
                picked = Some(String::new());
            }
            for code in app.selection.states_with_events() {
                let is_current = current == Some(&code);
                if ui
                    .selectable_label(is_current, regions::dropdown_label(&code))
                    .clicked()
                {
                    picked = Some(code.as_str().to_string());
                }
            }
        });

    if let Some(value) = picked {
        app.selection.select_state_from_dropdown(&value);
    }
}

fn render_search_box(app: &mut HackHereApp, ui: &mut egui::Ui, theme: &Theme) {
    let mut term = app.selection.search_term().to_string();

    ui.label(RichText::new("Buscar").color(theme.text_muted));
    ui.horizontal(|ui| {
        let clear_width = if term.is_empty() { 0.0 } else { 28.0 };
        let edit = egui::TextEdit::singleline(&mut term)
            .hint_text("Nome do evento...")
            .desired_width(ui.available_width() - clear_width);
        if ui.add(edit).changed() {
            app.selection.set_search_term(term.clone());
        }

        if !term.is_empty() && ui.small_button("✕").on_hover_text("Limpar busca").clicked() {
            app.selection.set_search_term("");
        }
    });
}

fn render_filter_indicator(app: &mut HackHereApp, ui: &mut egui::Ui, theme: &Theme) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(results_label(app.selection.filtered_events().len()))
                .size(12.0)
                .color(theme.text_secondary),
        );

        let Some(state) = app.selection.selected_state() else {
            return;
        };
        let label = format!("Filtrado por: {}", state.display_name());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("Limpar filtro").clicked() {
                app.selection.clear_state_filter();
            }
            ui.label(RichText::new(label).size(12.0).color(theme.accent));
        });
    });
}

fn render_event_list(app: &mut HackHereApp, ui: &mut egui::Ui, theme: &Theme) -> Option<RowAction> {
    let scroll_to = app.ui.scroll_to_row.take();
    let selected = app.selection.selected_event_index();
    let events = app.selection.filtered_events();

    if events.is_empty() {
        let message = match app.selection.selected_state() {
            Some(state) => format!("Nenhum evento encontrado em {}", state.display_name()),
            None => "Nenhum evento encontrado".to_string(),
        };
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(message).color(theme.text_muted));
        });
        return None;
    }

    let mut action = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (index, event) in events.iter().enumerate() {
                let is_selected = selected == Some(index);
                let (row_action, response) = render_event_row(ui, theme, event, is_selected);

                if scroll_to == Some(index) {
                    response.scroll_to_me(Some(egui::Align::Center));
                }
                if let Some(row_action) = row_action {
                    action = Some(row_action);
                } else if response.clicked() {
                    action = Some(RowAction::Select(index));
                }

                ui.add_space(6.0);
            }
        });

    action
}

/// One card in the list; returns a link action and the card's response
fn render_event_row(
    ui: &mut egui::Ui,
    theme: &Theme,
    event: &Event,
    is_selected: bool,
) -> (Option<RowAction>, egui::Response) {
    let (fill, stroke) = if is_selected {
        (theme.selection, theme.accent)
    } else {
        (theme.bg_medium, theme.border)
    };

    let mut action = None;

    let inner = egui::Frame::new()
        .fill(fill)
        .corner_radius(6.0)
        .inner_margin(12.0)
        .stroke(egui::Stroke::new(1.0, stroke))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.label(
                RichText::new(event.display_name())
                    .size(15.0)
                    .strong()
                    .color(theme.text_primary),
            );

            let date = if event.approximate {
                format!("Aproximado - {}", event.formatted_date())
            } else {
                event.formatted_date()
            };
            ui.label(RichText::new(date).size(12.0).color(theme.text_secondary));

            let location = event.location();
            if !location.is_empty() {
                ui.label(RichText::new(location).size(12.0).color(theme.text_muted));
            }

            ui.horizontal(|ui| {
                if !event.url.is_empty() && ui.link("Acessar evento").clicked() {
                    action = Some(RowAction::Open(event.url.clone()));
                }
                if !event.price.is_empty() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(&event.price).size(12.0).color(theme.accent));
                    });
                }
            });
        });

    let response = inner
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);

    (action, response)
}
