//! Control panel and status line.
//!
//! The panel only reads a [`PanelView`] of the canvas and reports what the
//! user asked for as [`UiAction`]s; the app applies them afterwards.

use egui::{Color32, Context, Slider, Vec2};
use scribble_core::brush::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use scribble_core::{Canvas, CanvasSize, ControlIntent, Surface, sanitize_dimension};
use scribble_widgets::{
    ActionButton, BRUSH_PALETTE, ColorSwatch, color_to_hex, numeric_field, panel_frame,
    section_label, status_frame, vertical_separator,
};

use crate::shortcuts::ShortcutRegistry;

/// Actions triggered by UI interactions.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Forward an intent to the canvas.
    Canvas(ControlIntent),
    /// Show or hide the shortcut list.
    ToggleShortcuts,
}

/// Read-only projection of canvas state for the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub brush_size: f64,
    pub brush_color: Color32,
    pub brush_color_text: String,
    pub size: CanvasSize,
    pub zoom: f64,
    pub history_len: usize,
    pub history_limit: usize,
}

impl PanelView {
    pub fn from_canvas<S: Surface>(canvas: &Canvas<S>) -> Self {
        let rgba = canvas.brush().color().to_rgba8();
        Self {
            brush_size: canvas.brush().size(),
            brush_color: Color32::from_rgba_unmultiplied(rgba.r, rgba.g, rgba.b, rgba.a),
            brush_color_text: canvas.brush().color_text().to_string(),
            size: canvas.size(),
            zoom: canvas.view().scale(),
            history_len: canvas.history_len(),
            history_limit: canvas.history().limit(),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history_len > 0
    }
}

/// Convert an egui color into a brush color.
pub fn brush_color(color: Color32) -> peniko::Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    peniko::Color::from_rgba8(r, g, b, a)
}

/// Editable UI state that lives between frames.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Width field text while being edited.
    pub width_text: String,
    /// Height field text while being edited.
    pub height_text: String,
    /// CSS color field text while being edited.
    pub color_text: String,
    /// Whether the shortcut list is open.
    pub show_shortcuts: bool,
    /// Last canvas size copied into the fields.
    synced_size: Option<CanvasSize>,
    /// Last brush color text copied into the color field.
    synced_color: Option<String>,
}

impl UiState {
    /// Refresh the text fields when the canvas changed underneath them.
    pub fn sync(&mut self, view: &PanelView) {
        if self.synced_size != Some(view.size) {
            self.width_text = view.size.width.to_string();
            self.height_text = view.size.height.to_string();
            self.synced_size = Some(view.size);
        }
        if self.synced_color.as_deref() != Some(view.brush_color_text.as_str()) {
            self.color_text = view.brush_color_text.clone();
            self.synced_color = Some(view.brush_color_text.clone());
        }
    }

    /// Resize intent from the current field text.
    pub fn resize_intent(&self) -> ControlIntent {
        ControlIntent::Resize {
            width: sanitize_dimension(&self.width_text),
            height: sanitize_dimension(&self.height_text),
        }
    }
}

/// Render all UI panels and return the triggered actions.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, view: &PanelView) -> Vec<UiAction> {
    ui_state.sync(view);

    let actions = render_control_panel(ctx, ui_state, view);
    render_status_line(ctx, view);
    if ui_state.show_shortcuts {
        render_shortcuts_window(ctx, ui_state);
    }
    actions
}

fn render_control_panel(ctx: &Context, ui_state: &mut UiState, view: &PanelView) -> Vec<UiAction> {
    let mut actions = Vec::new();
    let mut toggle_shortcuts = false;
    let mut push = |intent: ControlIntent| actions.push(UiAction::Canvas(intent));

    egui::TopBottomPanel::top("control_panel")
        .frame(panel_frame())
        .show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing = Vec2::new(6.0, 4.0);

                // Brush
                section_label(ui, "BRUSH");
                let mut size = view.brush_size;
                let slider = Slider::new(&mut size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE)
                    .integer()
                    .text("Size");
                if ui.add(slider).changed() {
                    push(ControlIntent::SetBrushSize(size));
                }

                let mut color = view.brush_color;
                if ui.color_edit_button_srgba(&mut color).changed() {
                    push(ControlIntent::SetBrushColorValue(brush_color(color)));
                }
                let color_field = ui.add(
                    egui::TextEdit::singleline(&mut ui_state.color_text)
                        .desired_width(72.0)
                        .hint_text("#000000"),
                );
                if color_field.lost_focus() && ui_state.color_text != view.brush_color_text {
                    push(ControlIntent::SetBrushColor(ui_state.color_text.clone()));
                    // Invalid text snaps back to the brush color on the next sync.
                    ui_state.synced_color = None;
                }
                for swatch in BRUSH_PALETTE {
                    let hex = color_to_hex(swatch);
                    let selected = swatch == view.brush_color;
                    if ColorSwatch::new(swatch, &hex).selected(selected).show(ui).0 {
                        push(ControlIntent::SetBrushColorValue(brush_color(swatch)));
                    }
                }

                vertical_separator(ui);

                // Canvas size
                section_label(ui, "CANVAS");
                let width_done = numeric_field(ui, &mut ui_state.width_text, "width");
                ui.label("×");
                let height_done = numeric_field(ui, &mut ui_state.height_text, "height");
                if width_done || height_done {
                    let intent = ui_state.resize_intent();
                    if let ControlIntent::Resize { width, height } = intent {
                        ui_state.width_text = width.to_string();
                        ui_state.height_text = height.to_string();
                    }
                    push(intent);
                }

                vertical_separator(ui);

                // Actions
                let hint = |label: &str| ShortcutRegistry::hint(label).unwrap_or_default();
                if ActionButton::new("Clear").show(ui) {
                    push(ControlIntent::Clear);
                }
                let undo_hint = hint("Undo");
                if ActionButton::new("Undo")
                    .shortcut(&undo_hint)
                    .enabled(view.can_undo())
                    .show(ui)
                {
                    push(ControlIntent::Undo);
                }
                let save_hint = hint("Save drawing");
                if ActionButton::new("Save").shortcut(&save_hint).show(ui) {
                    push(ControlIntent::Save);
                }
                let load_hint = hint("Load saved drawing");
                if ActionButton::new("Load").shortcut(&load_hint).show(ui) {
                    push(ControlIntent::Load);
                }
                let export_hint = hint("Export to PNG");
                if ActionButton::new("Export").shortcut(&export_hint).show(ui) {
                    push(ControlIntent::Export);
                }

                vertical_separator(ui);

                let zoom_in_hint = hint("Zoom in");
                if ActionButton::new("Zoom In").shortcut(&zoom_in_hint).show(ui) {
                    push(ControlIntent::ZoomIn);
                }
                let zoom_out_hint = hint("Zoom out");
                if ActionButton::new("Zoom Out").shortcut(&zoom_out_hint).show(ui) {
                    push(ControlIntent::ZoomOut);
                }
                let reset_hint = hint("Reset view");
                if ActionButton::new("Reset View").shortcut(&reset_hint).show(ui) {
                    push(ControlIntent::ResetView);
                }
                if ActionButton::new("?").show(ui) {
                    toggle_shortcuts = true;
                }
            });
        });

    if toggle_shortcuts {
        actions.push(UiAction::ToggleShortcuts);
    }
    actions
}

fn render_status_line(ctx: &Context, view: &PanelView) {
    egui::TopBottomPanel::bottom("status_line")
        .frame(status_frame())
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(status_text(view))
                        .size(11.0)
                        .color(scribble_widgets::theme::TEXT_MUTED),
                );
            });
        });
}

/// Text of the status line.
pub fn status_text(view: &PanelView) -> String {
    format!(
        "Zoom {:.0}%  ·  {} × {} px  ·  History {}/{}",
        view.zoom * 100.0,
        view.size.width,
        view.size.height,
        view.history_len,
        view.history_limit
    )
}

fn render_shortcuts_window(ctx: &Context, ui_state: &mut UiState) {
    let mut open = ui_state.show_shortcuts;
    egui::Window::new("Shortcuts")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("shortcut_grid").striped(true).show(ui, |ui| {
                for shortcut in ShortcutRegistry::all() {
                    ui.label(egui::RichText::new(shortcut.format()).monospace());
                    ui.label(shortcut.description);
                    ui.end_row();
                }
            });
        });
    ui_state.show_shortcuts = open;
}
