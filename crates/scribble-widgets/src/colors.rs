//! Brush palette swatches and hex color helpers.

use egui::{Color32, CursorIcon, Rect, Sense, Stroke, Ui, Vec2, vec2};

use crate::{sizing, theme};

/// Quick-pick brush colors: black, gray, red, amber, green, blue, purple, white.
pub const BRUSH_PALETTE: [Color32; 8] = [
    Color32::from_rgb(0, 0, 0),
    Color32::from_rgb(107, 114, 128),
    Color32::from_rgb(239, 68, 68),
    Color32::from_rgb(245, 158, 11),
    Color32::from_rgb(34, 197, 94),
    Color32::from_rgb(59, 130, 246),
    Color32::from_rgb(168, 85, 247),
    Color32::from_rgb(255, 255, 255),
];

/// A clickable circular color swatch.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
    size: Vec2,
}

impl<'a> ColorSwatch<'a> {
    /// Create a new color swatch.
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
            size: vec2(sizing::SMALL, sizing::SMALL),
        }
    }

    /// Set whether this swatch is selected.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;
            ui.painter().circle_filled(center, radius, self.color);
            // Light swatches need an outline against the panel.
            ui.painter()
                .circle_stroke(center, radius, Stroke::new(1.0, theme::BORDER));

            if self.selected {
                ui.painter().circle_stroke(
                    center,
                    radius - 3.0,
                    Stroke::new(2.0, contrast_ring(self.color)),
                );
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

fn contrast_ring(color: Color32) -> Color32 {
    let luma = 0.299 * color.r() as f32 + 0.587 * color.g() as f32 + 0.114 * color.b() as f32;
    if luma < 128.0 {
        Color32::WHITE
    } else {
        Color32::from_gray(30)
    }
}

/// Format as `#rrggbb`, ignoring alpha.
pub fn color_to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
