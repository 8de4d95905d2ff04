//! Translation of egui input events into canvas pointer events.

use egui::{Event, PointerButton, Pos2, Rect};
use kurbo::{Point, Vec2};
use scribble_core::{MouseButton, PointerEvent};

/// Tracks whether the pointer is over the canvas area and converts egui
/// events into [`PointerEvent`]s relative to that area's top-left corner.
#[derive(Debug, Clone, Default)]
pub struct EventHandler {
    /// Pointer currently over the canvas area.
    inside: bool,
    /// Last known pointer position in egui points.
    last_pos: Option<Pos2>,
}

fn map_button(button: PointerButton) -> Option<MouseButton> {
    match button {
        PointerButton::Primary => Some(MouseButton::Left),
        PointerButton::Secondary => Some(MouseButton::Right),
        PointerButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

fn relative(pos: Pos2, rect: Rect) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Convert one frame's events.
    ///
    /// `accepts_press` is false when another layer (a window, a popup) covers
    /// the canvas; presses and wheel input are then ignored.
    pub fn handle_events(
        &mut self,
        events: &[Event],
        rect: Rect,
        accepts_press: bool,
    ) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        for event in events {
            match event {
                Event::PointerMoved(pos) => {
                    self.last_pos = Some(*pos);
                    if rect.contains(*pos) {
                        self.inside = true;
                        out.push(PointerEvent::Move {
                            position: relative(*pos, rect),
                        });
                    } else if self.inside {
                        self.inside = false;
                        out.push(PointerEvent::Leave);
                    }
                }
                Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let Some(button) = map_button(*button) else {
                        continue;
                    };
                    let position = relative(*pos, rect);
                    if *pressed {
                        if accepts_press && rect.contains(*pos) {
                            self.inside = true;
                            out.push(PointerEvent::Down { position, button });
                        }
                    } else {
                        out.push(PointerEvent::Up { position, button });
                    }
                }
                Event::PointerGone => {
                    self.last_pos = None;
                    if self.inside {
                        self.inside = false;
                        out.push(PointerEvent::Leave);
                    }
                }
                Event::MouseWheel { delta, .. } => {
                    if accepts_press {
                        out.extend(self.wheel(*delta, rect));
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Wheel scroll at the last known pointer position, if that is over the area.
    fn wheel(&self, delta: egui::Vec2, rect: Rect) -> Option<PointerEvent> {
        let pos = self.last_pos.filter(|p| rect.contains(*p))?;
        // egui reports wheel-away-from-user as positive y.
        Some(PointerEvent::Scroll {
            position: relative(pos, rect),
            delta: Vec2::new(delta.x as f64, -(delta.y as f64)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, vec2};

    fn area() -> Rect {
        Rect::from_min_size(Pos2::new(0.0, 40.0), vec2(200.0, 100.0))
    }

    fn press(x: f32, y: f32, pressed: bool) -> Event {
        Event::PointerButton {
            pos: Pos2::new(x, y),
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_positions_relative_to_area() {
        let mut handler = EventHandler::new();
        let events = handler.handle_events(&[press(10.0, 50.0, true)], area(), true);
        assert_eq!(
            events,
            vec![PointerEvent::Down {
                position: Point::new(10.0, 10.0),
                button: MouseButton::Left,
            }]
        );
    }

    #[test]
    fn test_press_outside_ignored() {
        let mut handler = EventHandler::new();
        assert!(handler
            .handle_events(&[press(10.0, 10.0, true)], area(), true)
            .is_empty());
    }

    #[test]
    fn test_covered_area_ignores_press() {
        let mut handler = EventHandler::new();
        assert!(handler
            .handle_events(&[press(10.0, 50.0, true)], area(), false)
            .is_empty());
    }

    #[test]
    fn test_leaving_area_emits_leave_once() {
        let mut handler = EventHandler::new();
        let events = handler.handle_events(
            &[
                Event::PointerMoved(Pos2::new(20.0, 60.0)),
                Event::PointerMoved(Pos2::new(20.0, 10.0)),
                Event::PointerMoved(Pos2::new(30.0, 10.0)),
            ],
            area(),
            true,
        );
        assert_eq!(
            events,
            vec![
                PointerEvent::Move {
                    position: Point::new(20.0, 20.0)
                },
                PointerEvent::Leave,
            ]
        );
        assert!(!handler.is_inside());
    }

    #[test]
    fn test_pointer_gone_leaves() {
        let mut handler = EventHandler::new();
        handler.handle_events(&[Event::PointerMoved(Pos2::new(20.0, 60.0))], area(), true);
        let events = handler.handle_events(&[Event::PointerGone], area(), true);
        assert_eq!(events, vec![PointerEvent::Leave]);
    }

    #[test]
    fn test_release_always_forwarded() {
        let mut handler = EventHandler::new();
        let events = handler.handle_events(&[press(500.0, 500.0, false)], area(), true);
        assert!(matches!(events[..], [PointerEvent::Up { .. }]));
    }

    #[test]
    fn test_wheel_inverted_to_dom_convention() {
        let mut handler = EventHandler::new();
        handler.handle_events(&[Event::PointerMoved(Pos2::new(50.0, 90.0))], area(), true);
        assert_eq!(
            handler.wheel(vec2(0.0, 1.0), area()),
            Some(PointerEvent::Scroll {
                position: Point::new(50.0, 50.0),
                delta: Vec2::new(0.0, -1.0),
            })
        );
    }

    #[test]
    fn test_wheel_outside_ignored() {
        let mut handler = EventHandler::new();
        handler.handle_events(&[Event::PointerMoved(Pos2::new(50.0, 10.0))], area(), true);
        assert_eq!(handler.wheel(vec2(0.0, 1.0), area()), None);
    }
}
