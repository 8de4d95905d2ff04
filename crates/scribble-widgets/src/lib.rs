//! Reusable egui widget components for the Scribble control panel.
//!
//! - **Buttons**: labelled action buttons with shortcut hints
//! - **Colors**: brush palette swatches and hex conversion
//! - **Fields**: numeric text fields for canvas dimensions
//! - **Layout**: section labels, separators, panel frames

pub mod buttons;
pub mod colors;
pub mod fields;
pub mod layout;

pub use buttons::ActionButton;
pub use colors::{BRUSH_PALETTE, ColorSwatch, color_to_hex};
pub use fields::{filter_numeric_input, numeric_field};
pub use layout::{panel_frame, section_label, status_frame, vertical_separator};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Small swatch size
    pub const SMALL: f32 = 20.0;
    /// Button height
    pub const BUTTON_HEIGHT: f32 = 26.0;
    /// Dimension field width
    pub const FIELD_WIDTH: f32 = 64.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Disabled text color
    pub const TEXT_DISABLED: Color32 = Color32::from_rgb(180, 180, 180);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Button background
    pub const BUTTON_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(235, 235, 235);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
