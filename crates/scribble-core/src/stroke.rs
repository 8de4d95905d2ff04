//! Freehand stroke rendering with rolling-midpoint smoothing.
//!
//! Raw pointer samples are jagged when joined with straight lines. Instead,
//! each new sample emits a quadratic curve from the midpoint of the previous
//! two samples, through the middle sample as control point, to the midpoint of
//! the last two. Consecutive curves share endpoints, so the stroke is
//! continuous without ever revisiting pixels already drawn.

use crate::brush::BrushState;
use crate::surface::{StrokeStyle, Surface};
use kurbo::{BezPath, Point};

/// A piece of a stroke that was drawn onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeSegment {
    /// Filled dot drawn on pointer-down.
    Dot { center: Point, radius: f64 },
    /// Smoothed quadratic curve.
    Curve { from: Point, ctrl: Point, to: Point },
    /// Straight piece: the lead-in before the first curve, or the tail drawn
    /// when the stroke finishes.
    Line { from: Point, to: Point },
}

impl StrokeSegment {
    /// Path for stroked segments. Dots are filled, not stroked.
    pub fn to_path(&self) -> Option<BezPath> {
        let mut path = BezPath::new();
        match *self {
            StrokeSegment::Dot { .. } => return None,
            StrokeSegment::Curve { from, ctrl, to } => {
                path.move_to(from);
                path.quad_to(ctrl, to);
            }
            StrokeSegment::Line { from, to } => {
                path.move_to(from);
                path.line_to(to);
            }
        }
        Some(path)
    }
}

/// Points of the stroke currently being drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeState {
    /// Whether a stroke is in progress.
    pub painting: bool,
    /// Samples in surface coordinates. Empty unless painting.
    pub points: Vec<Point>,
}

/// Turns surface-space samples into smoothed strokes.
#[derive(Debug, Clone, Default)]
pub struct StrokeRenderer {
    state: StrokeState,
}

/// Summary of a completed stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishedStroke {
    /// Tail drawn up to the last sample. `None` for a single click.
    pub tail: Option<StrokeSegment>,
    /// Number of samples the stroke was built from.
    pub samples: usize,
}

impl StrokeRenderer {
    /// Create an idle renderer.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_painting(&self) -> bool {
        self.state.painting
    }

    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    /// Start a stroke. Draws a dot so that a single click leaves a mark.
    pub fn begin<S: Surface + ?Sized>(
        &mut self,
        point: Point,
        brush: &BrushState,
        surface: &mut S,
    ) -> StrokeSegment {
        self.state.painting = true;
        self.state.points.clear();
        self.state.points.push(point);

        let segment = StrokeSegment::Dot {
            center: point,
            radius: brush.radius(),
        };
        draw_segment(&segment, brush, surface);
        log::debug!("Stroke started at ({:.1}, {:.1})", point.x, point.y);
        segment
    }

    /// Add a sample. Returns the curve drawn, if enough samples are buffered.
    pub fn extend<S: Surface + ?Sized>(
        &mut self,
        point: Point,
        brush: &BrushState,
        surface: &mut S,
    ) -> Option<StrokeSegment> {
        if !self.state.painting {
            return None;
        }
        self.state.points.push(point);

        let [p0, p1, p2] = match self.state.points.as_slice() {
            [.., p0, p1, p2] => [*p0, *p1, *p2],
            _ => return None,
        };
        let segment = StrokeSegment::Curve {
            from: p0.midpoint(p1),
            ctrl: p1,
            to: p1.midpoint(p2),
        };
        if self.state.points.len() == 3 {
            // The first curve starts halfway to the second sample; join it to the dot.
            let lead_in = StrokeSegment::Line {
                from: p0,
                to: p0.midpoint(p1),
            };
            draw_segment(&lead_in, brush, surface);
        }
        draw_segment(&segment, brush, surface);
        Some(segment)
    }

    /// Finish the stroke, drawing the tail up to the last sample.
    ///
    /// Returns `None` if no stroke was in progress.
    pub fn finish<S: Surface + ?Sized>(
        &mut self,
        brush: &BrushState,
        surface: &mut S,
    ) -> Option<FinishedStroke> {
        if !self.state.painting {
            return None;
        }
        let points = std::mem::take(&mut self.state.points);
        self.state.painting = false;

        let tail = match points.as_slice() {
            [] | [_] => None,
            [first, last] => Some(StrokeSegment::Line {
                from: *first,
                to: *last,
            }),
            [.., prev, last] => Some(StrokeSegment::Line {
                from: prev.midpoint(*last),
                to: *last,
            }),
        };
        if let Some(segment) = &tail {
            draw_segment(segment, brush, surface);
        }
        log::debug!("Stroke finished with {} samples", points.len());
        Some(FinishedStroke {
            tail,
            samples: points.len(),
        })
    }

    /// Abandon the current stroke without drawing anything more.
    pub fn cancel(&mut self) {
        self.state = StrokeState::default();
    }
}

fn draw_segment<S: Surface + ?Sized>(segment: &StrokeSegment, brush: &BrushState, surface: &mut S) {
    match segment {
        StrokeSegment::Dot { center, radius } => surface.fill_circle(*center, *radius, brush.color()),
        _ => {
            if let Some(path) = segment.to_path() {
                let style = StrokeStyle {
                    width: brush.size(),
                    color: brush.color(),
                };
                surface.stroke_path(&path, &style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;

    fn surface() -> RasterSurface {
        RasterSurface::new(100, 100).unwrap()
    }

    #[test]
    fn test_begin_draws_dot() {
        let mut renderer = StrokeRenderer::new();
        let mut surface = surface();
        let brush = BrushState::new();

        let segment = renderer.begin(Point::new(50.0, 50.0), &brush, &mut surface);

        assert_eq!(
            segment,
            StrokeSegment::Dot {
                center: Point::new(50.0, 50.0),
                radius: 5.0
            }
        );
        assert!(renderer.is_painting());
        assert_eq!(surface.pixel(50, 50), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_three_samples_make_one_curve() {
        let mut renderer = StrokeRenderer::new();
        let mut surface = surface();
        let brush = BrushState::new();

        renderer.begin(Point::new(0.0, 0.0), &brush, &mut surface);
        assert_eq!(renderer.extend(Point::new(10.0, 0.0), &brush, &mut surface), None);
        let curve = renderer.extend(Point::new(20.0, 0.0), &brush, &mut surface);

        assert_eq!(
            curve,
            Some(StrokeSegment::Curve {
                from: Point::new(5.0, 0.0),
                ctrl: Point::new(10.0, 0.0),
                to: Point::new(15.0, 0.0),
            })
        );
    }

    #[test]
    fn test_fast_stroke_has_no_gap_after_dot() {
        let mut renderer = StrokeRenderer::new();
        let mut surface = RasterSurface::new(300, 20).unwrap();
        let brush = BrushState::new();

        renderer.begin(Point::new(0.0, 10.0), &brush, &mut surface);
        renderer.extend(Point::new(100.0, 10.0), &brush, &mut surface);
        renderer.extend(Point::new(200.0, 10.0), &brush, &mut surface);
        renderer.finish(&brush, &mut surface);

        for x in [3, 25, 45, 60, 150, 199] {
            assert_eq!(surface.pixel(x, 10).map(|px| px[3]), Some(255), "gap at x={}", x);
        }
    }

    #[test]
    fn test_curves_chain_through_midpoints() {
        let mut renderer = StrokeRenderer::new();
        let mut surface = surface();
        let brush = BrushState::new();

        renderer.begin(Point::new(0.0, 0.0), &brush, &mut surface);
        renderer.extend(Point::new(10.0, 0.0), &brush, &mut surface);
        let first = renderer.extend(Point::new(20.0, 10.0), &brush, &mut surface);
        let second = renderer.extend(Point::new(30.0, 10.0), &brush, &mut surface);

        let (Some(StrokeSegment::Curve { to, .. }), Some(StrokeSegment::Curve { from, ctrl, .. })) =
            (first, second)
        else {
            panic!("expected two curves");
        };
        assert_eq!(to, from);
        assert_eq!(ctrl, Point::new(20.0, 10.0));
    }

    #[test]
    fn test_finish_draws_tail_and_resets() {
        let mut renderer = StrokeRenderer::new();
        let mut surface = surface();
        let brush = BrushState::new();

        renderer.begin(Point::new(0.0, 0.0), &brush, &mut surface);
        renderer.extend(Point::new(10.0, 0.0), &brush, &mut surface);
        renderer.extend(Point::new(20.0, 0.0), &brush, &mut surface);
        let finished = renderer.finish(&brush, &mut surface).unwrap();

        assert_eq!(
            finished.tail,
            Some(StrokeSegment::Line {
                from: Point::new(15.0, 0.0),
                to: Point::new(20.0, 0.0),
            })
        );
        assert_eq!(finished.samples, 3);
        assert!(!renderer.is_painting());
        assert!(renderer.state().points.is_empty());
    }

    #[test]
    fn test_two_sample_stroke_is_a_line() {
        let mut renderer = StrokeRenderer::new();
        let mut surface = surface();
        let brush = BrushState::new();

        renderer.begin(Point::new(10.0, 50.0), &brush, &mut surface);
        renderer.extend(Point::new(60.0, 50.0), &brush, &mut surface);
        let finished = renderer.finish(&brush, &mut surface).unwrap();

        assert_eq!(
            finished.tail,
            Some(StrokeSegment::Line {
                from: Point::new(10.0, 50.0),
                to: Point::new(60.0, 50.0),
            })
        );
        assert_eq!(surface.pixel(35, 50).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_single_click_has_no_tail() {
        let mut renderer = StrokeRenderer::new();
        let mut surface = surface();
        let brush = BrushState::new();

        renderer.begin(Point::new(10.0, 10.0), &brush, &mut surface);
        let finished = renderer.finish(&brush, &mut surface).unwrap();
        assert_eq!(finished.tail, None);
        assert_eq!(finished.samples, 1);
    }

    #[test]
    fn test_idle_calls_are_noops() {
        let mut renderer = StrokeRenderer::new();
        let mut surface = surface();
        let brush = BrushState::new();

        assert_eq!(renderer.extend(Point::new(1.0, 1.0), &brush, &mut surface), None);
        assert_eq!(renderer.finish(&brush, &mut surface), None);
        assert!(surface.snapshot().is_blank());
    }

    #[test]
    fn test_brush_read_at_draw_time() {
        let mut renderer = StrokeRenderer::new();
        let mut surface = surface();
        let mut brush = BrushState::new();
        brush.set_color("#ff0000").unwrap();

        renderer.begin(Point::new(20.0, 20.0), &brush, &mut surface);
        assert_eq!(surface.pixel(20, 20), Some([255, 0, 0, 255]));
    }
}
