//! Raster undo history.
//!
//! Every entry is a full copy of the surface, so memory grows with both the
//! number of entries and the canvas resolution. The log is capped: once it
//! holds more than `limit` snapshots the oldest one is discarded.

use crate::surface::{PixelBuffer, Surface};
use std::collections::VecDeque;

/// Maximum number of snapshots to keep by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Linear, single-branch undo log of full-surface snapshots. No redo.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<PixelBuffer>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history with the default cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history holding at most `limit` snapshots (minimum 1).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Capture the whole surface and append it.
    pub fn snapshot<S: Surface + ?Sized>(&mut self, surface: &S) {
        self.push(surface.snapshot());
    }

    /// Append an already captured snapshot.
    pub fn push(&mut self, buffer: PixelBuffer) {
        self.entries.push_back(buffer);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Drop the newest snapshot and show the one before it.
    ///
    /// Returns false (and leaves the surface alone) when there is nothing to
    /// undo. When the last snapshot is dropped the surface is left cleared.
    pub fn undo<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.entries.pop_back().is_none() {
            return false;
        }
        surface.clear();
        if let Some(previous) = self.entries.back() {
            surface.restore(previous);
        }
        true
    }

    /// Newest snapshot, if any.
    pub fn latest(&self) -> Option<&PixelBuffer> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Total bytes held by all snapshots.
    pub fn memory_usage(&self) -> usize {
        self.entries.iter().map(PixelBuffer::byte_len).sum()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;
    use kurbo::Point;
    use peniko::Color;

    fn dot(surface: &mut RasterSurface, x: f64, y: f64) {
        surface.fill_circle(Point::new(x, y), 3.0, Color::from_rgba8(0, 0, 255, 255));
    }

    #[test]
    fn test_snapshot_appends() {
        let mut history = History::new();
        let mut surface = RasterSurface::new(20, 20).unwrap();

        dot(&mut surface, 5.0, 5.0);
        history.snapshot(&surface);
        dot(&mut surface, 15.0, 15.0);
        history.snapshot(&surface);

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest(), Some(&surface.snapshot()));
    }

    #[test]
    fn test_undo_restores_previous_entry() {
        let mut history = History::new();
        let mut surface = RasterSurface::new(20, 20).unwrap();

        dot(&mut surface, 5.0, 5.0);
        history.snapshot(&surface);
        let first = surface.snapshot();
        dot(&mut surface, 15.0, 15.0);
        history.snapshot(&surface);

        assert!(history.undo(&mut surface));
        assert_eq!(surface.snapshot(), first);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_undo_last_entry_clears() {
        let mut history = History::new();
        let mut surface = RasterSurface::new(20, 20).unwrap();

        dot(&mut surface, 5.0, 5.0);
        history.snapshot(&surface);

        assert!(history.undo(&mut surface));
        assert!(surface.snapshot().is_blank());
        assert!(history.is_empty());
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut history = History::new();
        let mut surface = RasterSurface::new(20, 20).unwrap();
        dot(&mut surface, 5.0, 5.0);
        let before = surface.snapshot();

        assert!(!history.undo(&mut surface));
        assert_eq!(surface.snapshot(), before);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(2);
        let mut surface = RasterSurface::new(20, 20).unwrap();

        history.snapshot(&surface);
        dot(&mut surface, 5.0, 5.0);
        history.snapshot(&surface);
        dot(&mut surface, 15.0, 15.0);
        history.snapshot(&surface);

        assert_eq!(history.len(), 2);
        assert_eq!(history.memory_usage(), 2 * 20 * 20 * 4);
    }

    #[test]
    fn test_zero_limit_keeps_one() {
        let history = History::with_limit(0);
        assert_eq!(history.limit(), 1);
    }
}
