//! Brush state: size and color applied to new strokes.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use thiserror::Error;

/// Smallest brush diameter in surface pixels.
pub const MIN_BRUSH_SIZE: f64 = 1.0;
/// Largest brush diameter in surface pixels.
pub const MAX_BRUSH_SIZE: f64 = 100.0;
/// Default brush diameter.
pub const DEFAULT_BRUSH_SIZE: f64 = 10.0;
/// Default brush color as CSS text.
pub const DEFAULT_BRUSH_COLOR: &str = "#000000";

/// Brush errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrushError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Parse any CSS color string (`#rgb`, `#rrggbb`, `rgb(...)`, named colors, ...).
pub fn parse_css_color(text: &str) -> Result<Color, BrushError> {
    parse_color(text.trim())
        .map(|c| c.to_alpha_color::<Srgb>())
        .map_err(|_| BrushError::InvalidColor(text.to_string()))
}

/// Format a color as `#rrggbb` (or `#rrggbbaa` when translucent).
pub fn color_to_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

/// Current brush settings.
///
/// Size is always within [`MIN_BRUSH_SIZE`, `MAX_BRUSH_SIZE`], so it is safe
/// to divide by it.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushState {
    size: f64,
    color: Color,
    color_text: String,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            size: DEFAULT_BRUSH_SIZE,
            color: Color::from_rgba8(0, 0, 0, 255),
            color_text: DEFAULT_BRUSH_COLOR.to_string(),
        }
    }
}

impl BrushState {
    /// Create a brush with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Brush diameter in surface pixels.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Radius of the dot drawn on pointer-down.
    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// The CSS text the current color was set from.
    pub fn color_text(&self) -> &str {
        &self.color_text
    }

    /// Set the brush diameter, clamped to the slider range.
    /// Non-finite values are ignored.
    pub fn set_size(&mut self, size: f64) {
        if !size.is_finite() {
            log::warn!("Ignoring non-finite brush size");
            return;
        }
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    /// Set the brush color from CSS text. On error the color is unchanged.
    pub fn set_color(&mut self, text: &str) -> Result<(), BrushError> {
        self.color = parse_css_color(text)?;
        self.color_text = text.trim().to_string();
        Ok(())
    }

    /// Set the brush color directly.
    pub fn set_color_value(&mut self, color: Color) {
        self.color = color;
        self.color_text = color_to_hex(color);
    }
}
