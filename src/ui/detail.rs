//! Event detail overlay

use eframe::egui::{self, RichText};
use egui_commonmark::CommonMarkViewer;

use crate::app::HackHereApp;
use crate::catalog::Event;
use crate::ui::theme::Theme;

const DETAIL_WIDTH: f32 = 380.0;

/// Render the detail panel for the selected event, if any
pub fn render_event_detail(app: &mut HackHereApp, ctx: &egui::Context) {
    let Some(event) = app.selection.selected_event().cloned() else {
        return;
    };

    let theme = app.ui.current_theme.clone();
    let mut close = false;
    let mut open_url: Option<String> = None;

    egui::Window::new("event_detail")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::LEFT_TOP, [16.0, 16.0])
        .min_width(DETAIL_WIDTH)
        .max_width(DETAIL_WIDTH)
        .frame(
            egui::Frame::new()
                .fill(theme.bg_medium)
                .corner_radius(8.0)
                .inner_margin(16.0)
                .stroke(egui::Stroke::new(1.0, theme.border)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(event.display_name())
                        .size(20.0)
                        .strong()
                        .color(theme.text_primary),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    if ui.button("✕").on_hover_text("Fechar").clicked() {
                        close = true;
                    }
                });
            });

            ui.add_space(8.0);
            render_summary(ui, &theme, &event);

            let max_height = (ctx.available_rect().height() * 0.6).max(120.0);
            egui::ScrollArea::vertical()
                .max_height(max_height)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    if let Some(description) = event.description() {
                        ui.add_space(12.0);
                        let processed = linkify_urls(description);
                        CommonMarkViewer::new().show(ui, &mut app.ui.markdown_cache, &processed);
                    }

                    if !event.tags().is_empty() {
                        ui.add_space(12.0);
                        render_tags(ui, &theme, event.tags());
                    }

                    if let Some(socials) = &event.socials {
                        let links = socials.links();
                        if !links.is_empty() {
                            ui.add_space(12.0);
                            ui.label(RichText::new("Redes Sociais").strong().color(theme.accent));
                            for (label, url) in links {
                                if ui.link(label).on_hover_text(url).clicked() {
                                    open_url = Some(url.to_string());
                                }
                            }
                        }
                    }
                });

            if !event.url.is_empty() {
                ui.add_space(16.0);
                let button = egui::Button::new(
                    RichText::new("Acessar evento").strong().color(theme.text_primary),
                )
                .fill(theme.accent_muted)
                .min_size(egui::vec2(ui.available_width(), 32.0));
                if ui.add(button).clicked() {
                    open_url = Some(event.url.clone());
                }
            }
        });

    if let Some(url) = open_url {
        app.open_link(&url);
    }
    if close {
        app.selection.close_event_detail();
    }
}

/// Date, location and price lines
fn render_summary(ui: &mut egui::Ui, theme: &Theme, event: &Event) {
    let date = if event.approximate {
        format!("{} (Aproximado)", event.formatted_date())
    } else {
        event.formatted_date()
    };
    ui.label(RichText::new(date).color(theme.text_secondary));

    let location = event.location();
    if !location.is_empty() {
        ui.label(RichText::new(location).color(theme.text_secondary));
    }
    if !event.price.is_empty() {
        ui.label(RichText::new(&event.price).strong().color(theme.accent));
    }
}

fn render_tags(ui: &mut egui::Ui, theme: &Theme, tags: &[String]) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);
        for tag in tags {
            egui::Frame::new()
                .fill(theme.bg_light)
                .corner_radius(10.0)
                .inner_margin(egui::Margin::symmetric(8, 2))
                .show(ui, |ui| {
                    ui.label(RichText::new(tag).size(12.0).color(theme.text_secondary));
                });
        }
    });
}

/// Wrap bare http(s) URLs in angle brackets so the markdown renderer
/// turns them into links. URLs already inside `[..](..)` or `<..>` are
/// left alone, and trailing sentence punctuation stays outside the link.
fn linkify_urls(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);

    for token in text.split_inclusive(char::is_whitespace) {
        let word = token.trim_end_matches(char::is_whitespace);
        let gap = &token[word.len()..];

        if !(word.starts_with("https://") || word.starts_with("http://")) {
            out.push_str(token);
            continue;
        }

        let mut end = word.len();
        while let Some(c) = word[..end].chars().next_back() {
            let unbalanced_paren = c == ')' && !word[..end].contains('(');
            if matches!(c, '.' | ',' | ';' | ':' | '!' | '?') || unbalanced_paren {
                end -= c.len_utf8();
            } else {
                break;
            }
        }

        let (url, rest) = word.split_at(end);
        if url.contains("://") && url.len() > url.find("://").map_or(0, |i| i + 3) {
            out.push('<');
            out.push_str(url);
            out.push('>');
        } else {
            out.push_str(url);
        }
        out.push_str(rest);
        out.push_str(gap);
    }

    out
}
