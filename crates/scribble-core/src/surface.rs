//! Raster surface abstraction.
//!
//! The drawing pipeline never touches pixels directly; it goes through the
//! [`Surface`] trait so the same stroke, history and persistence logic can run
//! against any 2D raster backend. [`RasterSurface`] is the CPU implementation
//! backed by a `tiny-skia` pixmap.

use kurbo::{BezPath, PathEl, Point};
use peniko::Color;
use thiserror::Error;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Surface errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Pixel buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// A full copy of a surface's pixels.
///
/// Pixels are stored as premultiplied RGBA8, row-major, with no padding
/// between rows. This matches the in-memory layout of the raster backend so
/// snapshot and restore are plain copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing premultiplied RGBA8 data.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SurfaceResult<Self> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(SurfaceError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a fully transparent buffer.
    pub fn blank(width: u32, height: u32) -> SurfaceResult<Self> {
        Self::new(width, height, vec![0; width as usize * height as usize * 4])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied RGBA of a single pixel, if inside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// True if every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Size of the pixel data in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// Line style used when stroking a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Line width in surface pixels.
    pub width: f64,
    /// Line color.
    pub color: Color,
}

/// A drawable 2D raster surface.
///
/// Coordinates are in backing-resolution pixels with the origin at the
/// top-left corner.
pub trait Surface {
    /// Backing width in pixels.
    fn width(&self) -> u32;

    /// Backing height in pixels.
    fn height(&self) -> u32;

    /// Change the backing resolution. All pixel contents are discarded.
    fn resize(&mut self, width: u32, height: u32) -> SurfaceResult<()>;

    /// Make every pixel transparent.
    fn clear(&mut self);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    /// Stroke a path with round caps and joins.
    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle);

    /// Copy out every pixel.
    fn snapshot(&self) -> PixelBuffer;

    /// Replace the pixels of the region covered by `buffer`, anchored at the
    /// origin. Pixels outside the overlap are left as they are.
    fn restore(&mut self, buffer: &PixelBuffer);
}

/// CPU raster surface backed by a `tiny-skia` pixmap.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixmap: Pixmap,
}

impl RasterSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> SurfaceResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    /// Premultiplied RGBA8 pixel data.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Premultiplied RGBA of a single pixel, if inside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let px = self.pixmap.pixel(x, y)?;
        Some([px.red(), px.green(), px.blue(), px.alpha()])
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let rgba = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
    paint.anti_alias = true;
    paint
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn resize(&mut self, width: u32, height: u32) -> SurfaceResult<()> {
        self.pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
        Ok(())
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32) else {
            return;
        };
        let paint = paint_for(color);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle) {
        // A lone move_to yields no drawable path.
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let paint = paint_for(style.color);
        let stroke = Stroke {
            width: style.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn snapshot(&self) -> PixelBuffer {
        PixelBuffer {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data: self.pixmap.data().to_vec(),
        }
    }

    fn restore(&mut self, buffer: &PixelBuffer) {
        let cols = self.width().min(buffer.width()) as usize * 4;
        let rows = self.height().min(buffer.height()) as usize;
        let dst_stride = self.width() as usize * 4;
        let src_stride = buffer.width() as usize * 4;
        let dst = self.pixmap.data_mut();
        for row in 0..rows {
            let d = row * dst_stride;
            let s = row * src_stride;
            dst[d..d + cols].copy_from_slice(&buffer.data()[s..s + cols]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::from_rgba8(255, 0, 0, 255)
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = RasterSurface::new(8, 4).unwrap();
        assert_eq!(surface.width(), 8);
        assert_eq!(surface.height(), 4);
        assert!(surface.snapshot().is_blank());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            RasterSurface::new(0, 10).unwrap_err(),
            SurfaceError::InvalidSize { width: 0, height: 10 }
        );
    }

    #[test]
    fn test_fill_circle_covers_center() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        surface.fill_circle(Point::new(50.0, 50.0), 5.0, red());

        assert_eq!(surface.pixel(50, 50), Some([255, 0, 0, 255]));
        // Well outside the radius stays transparent.
        assert_eq!(surface.pixel(60, 50).map(|p| p[3]), Some(0));
        assert_eq!(surface.pixel(50, 40).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_stroke_path_draws_along_line() {
        let mut surface = RasterSurface::new(40, 20).unwrap();
        let mut path = BezPath::new();
        path.move_to((5.0, 10.0));
        path.line_to((35.0, 10.0));
        surface.stroke_path(&path, &StrokeStyle { width: 4.0, color: red() });

        assert_eq!(surface.pixel(20, 10).map(|p| p[3]), Some(255));
        assert_eq!(surface.pixel(20, 2).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_resize_discards_pixels() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        surface.fill_circle(Point::new(10.0, 10.0), 5.0, red());
        surface.resize(30, 10).unwrap();

        assert_eq!(surface.width(), 30);
        assert_eq!(surface.height(), 10);
        assert!(surface.snapshot().is_blank());
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        surface.fill_circle(Point::new(10.0, 10.0), 6.0, red());
        let snapshot = surface.snapshot();

        surface.clear();
        assert!(surface.snapshot().is_blank());

        surface.restore(&snapshot);
        assert_eq!(surface.snapshot(), snapshot);
    }

    #[test]
    fn test_restore_larger_buffer_is_clipped() {
        let mut big = RasterSurface::new(30, 30).unwrap();
        big.fill_circle(Point::new(5.0, 5.0), 3.0, red());
        let snapshot = big.snapshot();

        let mut small = RasterSurface::new(10, 10).unwrap();
        small.restore(&snapshot);
        assert_eq!(small.pixel(5, 5), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_restore_smaller_buffer_replaces_overlap_only() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        surface.fill_circle(Point::new(5.0, 5.0), 2.0, red());
        surface.fill_circle(Point::new(15.0, 15.0), 2.0, red());

        let image = PixelBuffer::blank(10, 10).unwrap();
        surface.restore(&image);

        assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(15, 15), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_restore_translucent_pixels_exactly() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        surface.fill_circle(Point::new(10.0, 10.0), 4.5, red());
        let snapshot = surface.snapshot();

        // Writing the same image back must not darken antialiased edges.
        surface.restore(&snapshot);
        surface.restore(&snapshot);
        assert_eq!(surface.snapshot(), snapshot);
    }

    #[test]
    fn test_pixel_buffer_length_checked() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(err, SurfaceError::BufferLength { expected: 16, actual: 15 });
    }
}
