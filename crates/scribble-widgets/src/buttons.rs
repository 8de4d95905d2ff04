//! Button components.

use egui::{Align2, Color32, CornerRadius, CursorIcon, Sense, Ui, vec2};

use crate::{sizing, theme};

/// A labelled action button with an optional shortcut hint.
pub struct ActionButton<'a> {
    label: &'a str,
    shortcut: Option<&'a str>,
    enabled: bool,
    font_size: f32,
}

impl<'a> ActionButton<'a> {
    /// Create a new action button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            shortcut: None,
            enabled: true,
            font_size: 12.0,
        }
    }

    /// Set keyboard shortcut (shown in hover tooltip).
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Enable or disable the button.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked while enabled.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = egui::FontId::proportional(self.font_size);
        let galley = ui.painter().layout_no_wrap(
            self.label.to_string(),
            font_id.clone(),
            Color32::PLACEHOLDER,
        );
        let size = vec2(galley.size().x + 20.0, sizing::BUTTON_HEIGHT);
        let sense = if self.enabled {
            Sense::click()
        } else {
            Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.enabled && response.hovered() {
                theme::HOVER_BG
            } else {
                theme::BUTTON_BG
            };
            let text_color = if self.enabled {
                theme::TEXT
            } else {
                theme::TEXT_DISABLED
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.label,
                font_id,
                text_color,
            );
        }

        let clicked = self.enabled && response.clicked();
        let response = match self.shortcut {
            Some(shortcut) => response.on_hover_ui(|ui| {
                ui.horizontal(|ui| {
                    ui.label(self.label);
                    ui.label(
                        egui::RichText::new(format!("({})", shortcut))
                            .color(Color32::from_gray(128))
                            .small(),
                    );
                });
            }),
            None => response,
        };
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}
