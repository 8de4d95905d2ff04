//! GPU textures mirroring the drawing surface.
//!
//! The surface can be larger than the backend's maximum texture side, so it
//! is uploaded as a grid of tiles that each fit.

use egui::{Color32, ColorImage, Context, Painter, Pos2, Rect, TextureHandle, TextureOptions, pos2, vec2};
use scribble_core::{Canvas, PixelBuffer, Surface};

/// A rectangle of surface pixels uploaded as one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Split a `width` x `height` surface into tiles no larger than `max_side`.
pub fn tile_layout(width: u32, height: u32, max_side: usize) -> Vec<Tile> {
    let side = u32::try_from(max_side).unwrap_or(u32::MAX).max(1);
    let mut tiles = Vec::new();
    let mut y = 0;
    while y < height {
        let tile_height = side.min(height - y);
        let mut x = 0;
        while x < width {
            let tile_width = side.min(width - x);
            tiles.push(Tile {
                x,
                y,
                width: tile_width,
                height: tile_height,
            });
            x += tile_width;
        }
        y += tile_height;
    }
    tiles
}

/// Copy one tile out of a premultiplied buffer.
pub fn tile_image(buffer: &PixelBuffer, tile: &Tile) -> ColorImage {
    let stride = buffer.width() as usize * 4;
    let row_len = tile.width as usize * 4;
    let mut rgba = Vec::with_capacity(row_len * tile.height as usize);
    for row in tile.y..tile.y + tile.height {
        let start = row as usize * stride + tile.x as usize * 4;
        rgba.extend_from_slice(&buffer.data()[start..start + row_len]);
    }
    ColorImage::from_rgba_premultiplied([tile.width as usize, tile.height as usize], &rgba)
}

/// Tiled textures for one canvas, re-uploaded when its revision changes.
#[derive(Default)]
pub struct SurfaceTextures {
    tiles: Vec<(Tile, TextureHandle)>,
    uploaded_revision: Option<u64>,
}

impl SurfaceTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Upload the surface if its pixels changed since the last call.
    pub fn sync<S: Surface>(&mut self, ctx: &Context, canvas: &Canvas<S>) {
        let revision = canvas.revision();
        if self.uploaded_revision == Some(revision) {
            return;
        }
        self.uploaded_revision = Some(revision);

        let snapshot = canvas.surface().snapshot();
        let max_side = ctx.input(|i| i.max_texture_side);
        let layout = tile_layout(snapshot.width(), snapshot.height(), max_side);

        let same_layout = layout.len() == self.tiles.len()
            && layout.iter().zip(&self.tiles).all(|(a, (b, _))| a == b);
        if same_layout {
            for (tile, texture) in &mut self.tiles {
                texture.set(tile_image(&snapshot, tile), TextureOptions::LINEAR);
            }
            return;
        }

        if layout.len() > 1 {
            log::debug!(
                "Uploading {}x{} surface as {} tiles (texture limit {})",
                snapshot.width(),
                snapshot.height(),
                layout.len(),
                max_side
            );
        }
        self.tiles = layout
            .into_iter()
            .enumerate()
            .map(|(i, tile)| {
                let name = format!("scribble_surface_{}", i);
                let texture = ctx.load_texture(name, tile_image(&snapshot, &tile), TextureOptions::LINEAR);
                (tile, texture)
            })
            .collect();
    }

    /// Paint every tile, with the surface origin at `origin` and `scale`
    /// points per surface pixel.
    pub fn paint(&self, painter: &Painter, origin: Pos2, scale: f32) {
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        for (tile, texture) in &self.tiles {
            let rect = Rect::from_min_size(
                origin + vec2(tile.x as f32 * scale, tile.y as f32 * scale),
                vec2(tile.width as f32 * scale, tile.height as f32 * scale),
            );
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_surface_is_one_tile() {
        assert_eq!(
            tile_layout(1300, 1000, 8192),
            vec![Tile {
                x: 0,
                y: 0,
                width: 1300,
                height: 1000
            }]
        );
    }

    #[test]
    fn test_oversized_surface_is_split() {
        let tiles = tile_layout(10_000, 300, 4096);
        let widths: Vec<u32> = tiles.iter().map(|t| t.width).collect();
        assert_eq!(widths, vec![4096, 4096, 1808]);
        assert!(tiles.iter().all(|t| t.y == 0 && t.height == 300));
        assert_eq!(tiles[2].x, 8192);
    }

    #[test]
    fn test_tiles_cover_every_pixel_once() {
        let tiles = tile_layout(10_000, 10_000, 4096);
        assert_eq!(tiles.len(), 9);
        let area: u64 = tiles.iter().map(|t| t.width as u64 * t.height as u64).sum();
        assert_eq!(area, 100_000_000);
        assert!(tiles.iter().all(|t| t.width <= 4096 && t.height <= 4096));
    }

    #[test]
    fn test_zero_limit_does_not_loop() {
        assert_eq!(tile_layout(3, 2, 0).len(), 6);
    }

    #[test]
    fn test_tile_image_copies_region() {
        let mut data = vec![0u8; 4 * 4 * 4];
        // Pixel (2, 1) opaque red.
        let i = (4 + 2) * 4;
        data[i..i + 4].copy_from_slice(&[255, 0, 0, 255]);
        let buffer = PixelBuffer::new(4, 4, data).unwrap();

        let image = tile_image(
            &buffer,
            &Tile {
                x: 2,
                y: 0,
                width: 2,
                height: 2,
            },
        );
        assert_eq!(image.size, [2, 2]);
        assert_eq!(image.pixels[2], Color32::from_rgba_premultiplied(255, 0, 0, 255));
        assert_eq!(image.pixels[0], Color32::TRANSPARENT);
    }
}
