//! Clickable map of the federative units

use eframe::egui::{self, Color32, Pos2, RichText, Sense, Shape, Stroke};

use crate::app::HackHereApp;
use crate::geo::{Point, Viewport};
use crate::regions::StateCode;

const MAP_PADDING: f64 = 12.0;

fn to_pos(viewport: &Viewport, p: Point) -> Pos2 {
    let [x, y] = viewport.to_screen(p);
    Pos2::new(x as f32, y as f32)
}

/// Render the map in the remaining space of the central panel
pub fn render_map(app: &mut HackHereApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    render_map_status(app, ui);

    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
    let rect = response.rect;
    let geometry = &app.map.geometry;
    let viewport = geometry.viewport(
        [f64::from(rect.min.x), f64::from(rect.min.y)],
        [f64::from(rect.width()), f64::from(rect.height())],
        MAP_PADDING,
    );

    let states_with_events = app.selection.states_with_events();

    // Hit-test the pointer; only states with events react to it
    let pointed: Option<StateCode> = response
        .hover_pos()
        .map(|pos| viewport.to_map([f64::from(pos.x), f64::from(pos.y)]))
        .and_then(|p| geometry.region_at(p))
        .filter(|region| {
            app.selection
                .region_view(region.code.as_str(), &states_with_events, None)
                .is_clickable()
        })
        .map(|region| region.code.clone());

    let clicked = response.clicked().then(|| pointed.clone()).flatten();
    app.map.set_hovered(pointed);

    let geometry = &app.map.geometry;
    let hovered = app.map.hovered.as_ref();
    let any_selected = app.selection.selected_state().is_some();
    let stroke = Stroke::new(1.0, theme.map_stroke);

    for region in &geometry.regions {
        let view = app
            .selection
            .region_view(region.code.as_str(), &states_with_events, hovered);
        let fill = theme.region_fill(view.fill(any_selected));

        for polygon in &region.polygons {
            let points: Vec<Pos2> = polygon.outer.iter().map(|&p| to_pos(&viewport, p)).collect();

            let mut mesh = egui::Mesh::default();
            for &p in &points {
                mesh.colored_vertex(p, fill);
            }
            for &[a, b, c] in &polygon.triangles {
                mesh.add_triangle(a as u32, b as u32, c as u32);
            }
            painter.add(Shape::mesh(mesh));
            painter.add(Shape::closed_line(points, stroke));

            for hole in &polygon.holes {
                let hole_points = hole.iter().map(|&p| to_pos(&viewport, p)).collect();
                painter.add(Shape::closed_line(hole_points, stroke));
            }
        }

        if geometry.is_tile_grid() {
            let text_color = if view.is_selected {
                Color32::WHITE
            } else if view.has_events {
                theme.text_primary
            } else {
                theme.text_muted
            };
            painter.text(
                to_pos(&viewport, region.label_pos),
                egui::Align2::CENTER_CENTER,
                region.code.as_str(),
                egui::FontId::proportional((viewport.scale() * 0.3).clamp(9.0, 18.0) as f32),
                text_color,
            );
        }
    }

    if let Some(code) = hovered {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        response.on_hover_text(code.display_name());
    }

    if let Some(code) = clicked {
        app.on_state_activate(code);
    }
}

/// Loading or error note above the map, with a retry for failed downloads
fn render_map_status(app: &mut HackHereApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    if app.map.loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(RichText::new("Carregando contornos dos estados...").color(theme.text_muted));
        });
    } else if let Some(error) = &app.map.error {
        let message = format!("Mapa simplificado: {}", error);
        let mut retry = false;
        ui.horizontal(|ui| {
            ui.label(RichText::new(message).size(12.0).color(theme.error));
            retry = ui.small_button("Tentar novamente").clicked();
        });
        if retry {
            app.reload_map();
        }
    }
}
