//! Header, footer and About dialog

use eframe::egui::{self, RichText};

use crate::app::HackHereApp;
use crate::app_data::app_data;
use crate::ui::theme::ThemePreset;

/// Render the title bar: app name, theme selector and About button
pub fn render_header(app: &mut HackHereApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();
    let info = &app_data().app;

    ui.horizontal(|ui| {
        ui.label(
            RichText::new(&info.title)
                .size(20.0)
                .strong()
                .color(theme.text_primary),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Sobre").clicked() {
                app.ui.show_about_dialog = true;
            }

            ui.add_space(8.0);

            let mut selected = app.ui.theme_preset;
            egui::ComboBox::from_id_salt("theme_select")
                .selected_text(selected.name())
                .width(160.0)
                .show_ui(ui, |ui| {
                    for preset in ThemePreset::all() {
                        ui.selectable_value(&mut selected, *preset, preset.name());
                    }
                });
            if selected != app.ui.theme_preset {
                app.set_theme(selected);
            }

            ui.label(RichText::new("Tema").color(theme.text_muted));
        });
    });
}

/// Render the footer: contribution link, status and credits
pub fn render_footer(app: &mut HackHereApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();
    let info = &app_data().app;

    ui.horizontal(|ui| {
        ui.label(RichText::new("Deseja contribuir? Acesse o").color(theme.text_secondary));
        if ui.link("GitHub").clicked() {
            app.open_link(&info.repository_url);
        }

        ui.add_space(16.0);
        ui.label(RichText::new(&app.status_message).size(12.0).color(theme.text_muted));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(format!("Made by {}", info.author))
                    .size(12.0)
                    .color(theme.text_muted),
            );
        });
    });
}

/// Render the About dialog
pub fn render_about_dialog(app: &mut HackHereApp, ctx: &egui::Context) {
    if !app.ui.show_about_dialog {
        return;
    }

    let theme = app.ui.current_theme.clone();
    let info = &app_data().app;
    let mut open_repo = false;

    egui::Window::new(info.about_title())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 240.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);

                ui.label(
                    RichText::new(&info.name)
                        .size(24.0)
                        .strong()
                        .color(theme.accent),
                );

                ui.add_space(4.0);
                ui.label(RichText::new(&info.sidebar_title).size(14.0).color(theme.text_secondary));

                ui.add_space(12.0);
                ui.label(
                    RichText::new(format!("Versão {}", env!("CARGO_PKG_VERSION")))
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);
                ui.label(
                    RichText::new(format!(
                        "{} eventos em {} estados",
                        app.selection.catalog().len(),
                        app.selection.states_with_events().len()
                    ))
                    .color(theme.text_secondary),
                );

                ui.add_space(12.0);
                if ui.link("GitHub").clicked() {
                    open_repo = true;
                }

                ui.add_space(12.0);
                ui.label(
                    RichText::new("Built with Rust + egui")
                        .size(11.0)
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);
                if ui.button("Fechar").clicked() {
                    app.ui.show_about_dialog = false;
                }

                ui.add_space(8.0);
            });
        });

    if open_repo {
        app.open_link(&info.repository_url);
    }
}
