//! View transform for pan/zoom.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom scale.
pub const MIN_SCALE: f64 = 0.1;
/// Maximum allowed zoom scale.
pub const MAX_SCALE: f64 = 10.0;
/// Scale change per zoom button press.
pub const ZOOM_STEP: f64 = 0.1;
/// Wheel zoom factor when scrolling towards the user (zoom in).
pub const WHEEL_ZOOM_IN: f64 = 1.1;
/// Wheel zoom factor when scrolling away (zoom out).
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// ViewTransform maps between container (screen) space and surface space.
///
/// Container space is relative to the top-left of the area hosting the
/// surface. The surface is presented at `surface * scale + offset`, and pointer
/// input is mapped back with the inverse, so drawing always happens in
/// backing-resolution pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Current zoom level.
    scale: f64,
    /// Translation in container space (pan).
    offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Create an identity view.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Set the scale directly, clamped to [`MIN_SCALE`, `MAX_SCALE`].
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// Surface to container transform, used for presentation.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Container to surface transform, used for input.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a container point to surface coordinates.
    pub fn screen_to_surface(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a surface point to container coordinates.
    pub fn surface_to_screen(&self, surface_point: Point) -> Point {
        self.transform() * surface_point
    }

    /// Wheel zoom. Negative `delta_y` (wheel towards the user) zooms in.
    pub fn zoom_wheel(&mut self, delta_y: f64) {
        if delta_y < 0.0 {
            self.set_scale(self.scale * WHEEL_ZOOM_IN);
        } else if delta_y > 0.0 {
            self.set_scale(self.scale * WHEEL_ZOOM_OUT);
        }
    }

    /// Zoom in by one button step.
    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + ZOOM_STEP);
    }

    /// Zoom out by one button step.
    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - ZOOM_STEP);
    }

    /// Pan by a delta in container coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Reset to scale 1 with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view() {
        let view = ViewTransform::new();
        assert_eq!(view.offset(), Vec2::ZERO);
        assert!((view.scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_surface_identity() {
        let view = ViewTransform::new();
        let screen = Point::new(100.0, 200.0);
        let surface = view.screen_to_surface(screen);
        assert!((surface.x - screen.x).abs() < f64::EPSILON);
        assert!((surface.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_surface_with_offset() {
        let mut view = ViewTransform::new();
        view.pan(Vec2::new(50.0, 100.0));
        let surface = view.screen_to_surface(Point::new(100.0, 200.0));
        assert!((surface.x - 50.0).abs() < f64::EPSILON);
        assert!((surface.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_surface_with_zoom() {
        let mut view = ViewTransform::new();
        view.set_scale(2.0);
        let surface = view.screen_to_surface(Point::new(100.0, 200.0));
        assert!((surface.x - 50.0).abs() < f64::EPSILON);
        assert!((surface.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut view = ViewTransform::new();
        view.pan(Vec2::new(30.0, -20.0));
        view.set_scale(1.5);

        let original = Point::new(123.0, 456.0);
        let back = view.surface_to_screen(view.screen_to_surface(original));

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_buttons_step_by_tenth() {
        let mut view = ViewTransform::new();
        view.zoom_in();
        view.zoom_in();
        assert!((view.scale() - 1.2).abs() < 1e-9);

        view.zoom_out();
        assert!((view.scale() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_zoom_direction() {
        let mut view = ViewTransform::new();
        view.zoom_wheel(-120.0);
        assert!((view.scale() - 1.1).abs() < 1e-9);

        let mut view = ViewTransform::new();
        view.zoom_wheel(120.0);
        assert!((view.scale() - 0.9).abs() < 1e-9);

        let mut view = ViewTransform::new();
        view.zoom_wheel(0.0);
        assert!((view.scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut view = ViewTransform::new();
        for _ in 0..50 {
            view.zoom_out();
        }
        assert!((view.scale() - MIN_SCALE).abs() < f64::EPSILON);

        for _ in 0..100 {
            view.zoom_wheel(-1.0);
        }
        assert!((view.scale() - MAX_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_accumulates() {
        let mut view = ViewTransform::new();
        view.pan(Vec2::new(10.0, 20.0));
        view.pan(Vec2::new(-4.0, 1.0));
        assert!((view.offset().x - 6.0).abs() < f64::EPSILON);
        assert!((view.offset().y - 21.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let mut view = ViewTransform::new();
        view.pan(Vec2::new(10.0, 20.0));
        view.zoom_in();
        view.reset();
        assert_eq!(view, ViewTransform::default());
    }
}
