//! Layout helpers: separators, section labels, panel frames.

use egui::{Color32, CornerRadius, Frame, Margin, Pos2, Stroke, Ui};

use crate::{sizing, theme};

/// Draw a vertical separator line (small height).
pub fn vertical_separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let height = 18.0;
    let x = rect.left() + 1.0;
    let top = rect.center().y - height / 2.0;
    ui.painter().line_segment(
        [Pos2::new(x, top), Pos2::new(x, top + height)],
        Stroke::new(1.0, Color32::from_gray(210)),
    );
    ui.add_space(4.0);
}

/// Draw a section label (small, muted text).
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(10.0).color(theme::TEXT_MUTED));
}

/// Frame for the control panel, with shadow.
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::symmetric(12, 8))
}

/// Slim frame for the status line.
pub fn status_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .stroke(Stroke::new(1.0, theme::BORDER))
        .inner_margin(Margin::symmetric(12, 4))
}
