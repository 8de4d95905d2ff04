//! Pointer input tracking.
//!
//! Raw pointer events are turned into drawing gestures here. Positions are in
//! container space; conversion to surface space happens in the canvas, which
//! owns the view transform.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary (usually left) button. Paints.
    Left,
    Right,
    /// Middle button. Pans.
    Middle,
}

/// Pointer event in container coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// Pointer left the surface container.
    Leave,
    /// Wheel scroll. Negative `delta.y` means the wheel moved towards the user.
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

/// High-level gesture derived from pointer events.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Primary button pressed: start a stroke at this container point.
    StrokeBegin(Point),
    /// Pointer moved while painting.
    StrokeMove(Point),
    /// Painting ended (button released or pointer left).
    StrokeEnd,
    /// Middle-drag delta in container coordinates.
    Pan(Vec2),
    /// Wheel zoom request.
    Zoom { delta_y: f64 },
}

/// Tracks transient pointer state between events.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    /// Whether a stroke is in progress.
    painting: bool,
    /// Whether a middle-button pan is in progress.
    panning: bool,
    /// Last known pointer position in container coordinates.
    last_position: Option<Point>,
}

impl InputTracker {
    /// Create a new idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn last_position(&self) -> Option<Point> {
        self.last_position
    }

    /// Process a pointer event and return the resulting gesture, if any.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event {
            PointerEvent::Down { position, button } => {
                self.last_position = Some(position);
                match button {
                    MouseButton::Left if !self.painting && !self.panning => {
                        self.painting = true;
                        Some(Gesture::StrokeBegin(position))
                    }
                    MouseButton::Middle if !self.painting => {
                        self.panning = true;
                        None
                    }
                    _ => None,
                }
            }
            PointerEvent::Up { position, button } => {
                self.last_position = Some(position);
                if button == MouseButton::Middle {
                    self.panning = false;
                }
                self.end_stroke()
            }
            PointerEvent::Move { position } => {
                let previous = self.last_position.replace(position);
                if self.painting {
                    Some(Gesture::StrokeMove(position))
                } else if self.panning {
                    let previous = previous?;
                    Some(Gesture::Pan(position - previous))
                } else {
                    None
                }
            }
            PointerEvent::Leave => {
                self.panning = false;
                self.last_position = None;
                self.end_stroke()
            }
            PointerEvent::Scroll { position, delta } => {
                self.last_position = Some(position);
                Some(Gesture::Zoom { delta_y: delta.y })
            }
        }
    }

    fn end_stroke(&mut self) -> Option<Gesture> {
        if self.painting {
            self.painting = false;
            Some(Gesture::StrokeEnd)
        } else {
            None
        }
    }
}
