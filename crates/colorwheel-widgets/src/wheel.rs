//! The egui color wheel widget.

use colorwheel_core::{ColorWheelCard, EntityBinding, Hsv, PendingCommit, RenderModel, Rgb};
use egui::{vec2, Color32, Pos2, RichText, Sense, Shape, Stroke, Ui};
use kurbo::Vec2;

/// Number of flat wedges approximating the hue gradient.
const HUE_SEGMENTS: usize = 120;

/// Marker disc radius and its white border width.
const MARKER_RADIUS: f32 = 10.0;
const MARKER_BORDER: f32 = 3.0;

/// The interactive color wheel, drawn from a card's render model.
///
/// Builder style: `ColorWheel::new(&mut card).show(ui)`. All color math
/// stays in the card; this widget only paints the model and feeds pointer
/// interactions back as card events.
pub struct ColorWheel<'a, B: EntityBinding> {
    card: &'a mut ColorWheelCard<B>,
}

/// What one frame of the widget produced.
pub struct ColorWheelResponse {
    pub response: egui::Response,
    /// The single pending write from a drag that ended this frame.
    pub commit: Option<PendingCommit>,
}

impl<'a, B: EntityBinding> ColorWheel<'a, B> {
    pub fn new(card: &'a mut ColorWheelCard<B>) -> Self {
        Self { card }
    }

    /// Show the widget and return any commit the host should drive.
    pub fn show(self, ui: &mut Ui) -> ColorWheelResponse {
        let (diameter, ring_thickness) = match self.card.render_model() {
            RenderModel::Error { title, message } => {
                let inner = ui.vertical(|ui| {
                    ui.label(RichText::new(title).strong());
                    ui.colored_label(ui.visuals().error_fg_color, message);
                });
                return ColorWheelResponse { response: inner.response, commit: None };
            }
            RenderModel::Wheel { diameter, ring_thickness, .. } => (diameter, ring_thickness),
        };

        let side = (diameter + 2.0 * ring_thickness) as f32;
        let mut commit = None;

        let inner = ui.vertical_centered(|ui| {
            ui.label(RichText::new(self.card.title()).strong());
            ui.add_space(4.0);

            let (rect, response) =
                ui.allocate_exact_size(vec2(side, side), Sense::click_and_drag());
            let center = rect.center();

            // Map egui interactions onto the card's pointer events. egui
            // keeps reporting drag positions after the pointer leaves the
            // rect, so a drag can end anywhere on screen.
            if let Some(pos) = response.interact_pointer_pos() {
                let offset = Vec2::new((pos.x - center.x) as f64, (pos.y - center.y) as f64);
                if response.drag_started() {
                    self.card.pointer_pressed(offset);
                } else if response.dragged() {
                    self.card.pointer_moved(offset);
                }
                if response.drag_stopped() {
                    commit = self.card.pointer_released(offset);
                } else if response.clicked() {
                    // A plain click is a press and release at one position.
                    self.card.pointer_pressed(offset);
                    commit = self.card.pointer_released(offset);
                }
            }

            let model = self.card.render_model();
            if let RenderModel::Wheel { marker_offset, marker_color, value_text, .. } = model {
                if ui.is_rect_visible(rect) {
                    self.paint(ui, center, marker_offset, marker_color);
                }
                ui.add_space(4.0);
                ui.label(value_text);
            }

            response
        });

        ColorWheelResponse { response: inner.inner, commit }
    }

    fn paint(&self, ui: &Ui, center: Pos2, marker_offset: Vec2, marker_color: Rgb) {
        let geometry = self.card.geometry();
        let config = *geometry.config();
        let painter = ui.painter();

        // Outer swatch ring in the current color, behind everything.
        painter.circle_filled(center, config.outer_radius() as f32, to_color32(marker_color));

        // White disc: its rim shows through as the padding border.
        painter.circle_filled(center, config.radius as f32, Color32::WHITE);

        // Hue wedges out to the effective radius, positioned through the
        // same geometry that maps pointer events, so the gradient and the
        // math agree by construction.
        for i in 0..HUE_SEGMENTS {
            let h0 = 360.0 * i as f64 / HUE_SEGMENTS as f64;
            let h1 = 360.0 * (i + 1) as f64 / HUE_SEGMENTS as f64;
            let p0 = geometry.marker_position(&Hsv::new(h0, 1.0, 1.0));
            let p1 = geometry.marker_position(&Hsv::new(h1, 1.0, 1.0));
            let color = to_color32(Hsv::new((h0 + h1) / 2.0, 1.0, 1.0).to_rgb());
            painter.add(Shape::convex_polygon(
                vec![
                    center,
                    center + vec2(p0.x as f32, p0.y as f32),
                    center + vec2(p1.x as f32, p1.y as f32),
                ],
                color,
                Stroke::NONE,
            ));
        }

        // Small white center dot, like the source wheel's hub.
        painter.circle_filled(center, (config.radius * 0.05) as f32, Color32::WHITE);

        // Marker: current color with a white border.
        let marker_pos = center + vec2(marker_offset.x as f32, marker_offset.y as f32);
        painter.circle_filled(marker_pos, MARKER_RADIUS, to_color32(marker_color));
        painter.circle_stroke(marker_pos, MARKER_RADIUS, Stroke::new(MARKER_BORDER, Color32::WHITE));
    }
}

/// Convert an engine color to an egui color.
pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}
