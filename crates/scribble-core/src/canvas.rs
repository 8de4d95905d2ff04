//! The canvas: single owner of all drawing state.
//!
//! Every pointer event and control-panel intent goes through [`Canvas`]. It
//! owns the surface, brush, view, history, stroke renderer and input tracker,
//! plus the storage slot and downloader used by save, load and export. Shells
//! read state back through accessors and use [`Canvas::revision`] to decide
//! when the surface texture needs re-uploading.

use crate::brush::{BrushError, BrushState};
use crate::config::{CanvasConfig, ConfigError};
use crate::download::Downloader;
use crate::input::{Gesture, InputTracker, PointerEvent};
use crate::history::History;
use crate::persistence::{self, PersistenceResult};
use crate::storage::Storage;
use crate::stroke::StrokeRenderer;
use crate::surface::{PixelBuffer, RasterSurface, Surface, SurfaceError, SurfaceResult};
use crate::view::ViewTransform;
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest allowed canvas dimension.
pub const MIN_DIMENSION: u32 = 1;
/// Largest allowed canvas dimension.
pub const MAX_DIMENSION: u32 = 10_000;

/// Errors raised while building a canvas.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Backing size of the canvas in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Build a size with both dimensions clamped to the allowed range.
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(MIN_DIMENSION, MAX_DIMENSION),
            height: height.clamp(MIN_DIMENSION, MAX_DIMENSION),
        }
    }
}

/// Coerce text typed into a dimension field to a valid dimension.
///
/// Empty or unparseable text gives 1. A single decimal point is accepted and
/// the value truncated. Negative values give 1; everything else is clamped to
/// [`MIN_DIMENSION`, `MAX_DIMENSION`].
pub fn sanitize_dimension(text: &str) -> u32 {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let has_digit = digits.chars().any(|c| c.is_ascii_digit());
    let well_formed = digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if negative || !has_digit || !well_formed {
        return MIN_DIMENSION;
    }

    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            value.trunc().clamp(MIN_DIMENSION as f64, MAX_DIMENSION as f64) as u32
        }
        _ => MIN_DIMENSION,
    }
}

/// Requests emitted by the control panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlIntent {
    SetBrushSize(f64),
    /// CSS color text typed by the user.
    SetBrushColor(String),
    /// Color picked from a swatch or color picker.
    SetBrushColorValue(Color),
    Resize { width: u32, height: u32 },
    Clear,
    Undo,
    Save,
    Load,
    Export,
    ZoomIn,
    ZoomOut,
    ResetView,
}

/// Post-resize redraw waiting for the next tick.
#[derive(Debug, Clone)]
struct PendingRedraw {
    generation: u64,
    image: PixelBuffer,
}

/// The drawing canvas.
pub struct Canvas<S: Surface = RasterSurface> {
    surface: S,
    brush: BrushState,
    view: ViewTransform,
    history: History,
    stroke: StrokeRenderer,
    input: InputTracker,
    storage: Box<dyn Storage>,
    downloader: Box<dyn Downloader>,
    storage_key: String,
    autoload: bool,
    activated: bool,
    /// Bumped on every pixel change.
    revision: u64,
    /// Bumped on every resize; stale redraws are dropped.
    resize_generation: u64,
    /// One entry per resize since the last tick, oldest first.
    pending_redraws: Vec<PendingRedraw>,
}

impl Canvas<RasterSurface> {
    /// Create a canvas backed by a CPU raster surface.
    pub fn new(
        config: CanvasConfig,
        storage: Box<dyn Storage>,
        downloader: Box<dyn Downloader>,
    ) -> Result<Self, CanvasError> {
        let config = config.validated()?;
        let surface = RasterSurface::new(config.width, config.height)?;
        Self::with_surface(surface, config, storage, downloader)
    }
}

impl<S: Surface> Canvas<S> {
    /// Create a canvas on an existing surface, resizing it to the configured size.
    pub fn with_surface(
        mut surface: S,
        config: CanvasConfig,
        storage: Box<dyn Storage>,
        downloader: Box<dyn Downloader>,
    ) -> Result<Self, CanvasError> {
        let config = config.validated()?;
        if surface.width() != config.width || surface.height() != config.height {
            surface.resize(config.width, config.height)?;
        }

        let mut brush = BrushState::new();
        brush.set_size(config.brush_size);
        brush
            .set_color(&config.brush_color)
            .map_err(ConfigError::from)?;

        log::debug!(
            "Canvas created at {}x{} (history limit {})",
            config.width,
            config.height,
            config.history_limit
        );

        Ok(Self {
            surface,
            brush,
            view: ViewTransform::new(),
            history: History::with_limit(config.history_limit),
            stroke: StrokeRenderer::new(),
            input: InputTracker::new(),
            storage,
            downloader,
            storage_key: config.storage_key,
            autoload: config.autoload,
            activated: false,
            revision: 0,
            resize_generation: 0,
            pending_redraws: Vec::new(),
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.surface.width(),
            height: self.surface.height(),
        }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn is_painting(&self) -> bool {
        self.stroke.is_painting()
    }

    /// Counter bumped whenever surface pixels change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a post-resize redraw is waiting for [`Canvas::run_deferred`].
    pub fn has_pending_redraw(&self) -> bool {
        !self.pending_redraws.is_empty()
    }

    /// Number of queued redraws, superseded ones included.
    pub fn pending_redraw_count(&self) -> usize {
        self.pending_redraws.len()
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Feed a pointer event in container coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<Gesture> {
        let gesture = self.input.handle_pointer_event(event)?;
        match &gesture {
            Gesture::StrokeBegin(position) => {
                let point = self.view.screen_to_surface(*position);
                self.stroke.begin(point, &self.brush, &mut self.surface);
                self.touch();
            }
            Gesture::StrokeMove(position) => {
                let point = self.view.screen_to_surface(*position);
                if self
                    .stroke
                    .extend(point, &self.brush, &mut self.surface)
                    .is_some()
                {
                    self.touch();
                }
            }
            Gesture::StrokeEnd => {
                if let Some(finished) = self.stroke.finish(&self.brush, &mut self.surface) {
                    self.history.snapshot(&self.surface);
                    self.touch();
                    log::debug!(
                        "Stroke recorded ({} samples, history {})",
                        finished.samples,
                        self.history.len()
                    );
                }
            }
            Gesture::Pan(delta) => self.view.pan(*delta),
            Gesture::Zoom { delta_y } => self.view.zoom_wheel(*delta_y),
        }
        Some(gesture)
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.brush.set_size(size);
    }

    /// Set the brush color from CSS text. Invalid text keeps the current color.
    pub fn set_brush_color(&mut self, text: &str) -> Result<(), BrushError> {
        self.brush
            .set_color(text)
            .inspect_err(|e| log::warn!("{}", e))
    }

    pub fn set_brush_color_value(&mut self, color: Color) {
        self.brush.set_color_value(color);
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    /// Change the backing size. Returns `Ok(false)` if nothing changed.
    ///
    /// Resizing wipes the surface, so the current image is captured and
    /// queued for redraw on the next [`Canvas::run_deferred`]. If a redraw is
    /// already queued the surface is blank, so its image is carried over.
    pub fn resize(&mut self, width: u32, height: u32) -> SurfaceResult<bool> {
        let size = CanvasSize::clamped(width, height);
        if size == self.size() {
            return Ok(false);
        }

        let image = match self.pending_redraws.last() {
            Some(pending) => pending.image.clone(),
            None => self.surface.snapshot(),
        };
        self.surface
            .resize(size.width, size.height)
            .inspect_err(|e| log::warn!("Resize failed: {}", e))?;

        self.resize_generation += 1;
        self.pending_redraws.push(PendingRedraw {
            generation: self.resize_generation,
            image,
        });
        self.touch();
        log::debug!("Canvas resized to {}x{}", size.width, size.height);
        Ok(true)
    }

    /// Run work deferred to the next tick. Returns true if anything was drawn.
    pub fn run_deferred(&mut self) -> bool {
        let mut drew = false;
        for pending in std::mem::take(&mut self.pending_redraws) {
            if pending.generation != self.resize_generation {
                log::debug!("Dropping superseded redraw {}", pending.generation);
                continue;
            }
            self.surface.restore(&pending.image);
            drew = true;
        }
        if drew {
            self.touch();
        }
        drew
    }

    /// Erase everything. Undoable.
    pub fn clear(&mut self) {
        self.stroke.cancel();
        self.pending_redraws.clear();
        self.surface.clear();
        self.history.snapshot(&self.surface);
        self.touch();
    }

    /// Step back one history entry. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.surface) {
            log::debug!("Nothing to undo");
            return false;
        }
        self.pending_redraws.clear();
        self.touch();
        true
    }

    /// Write the drawing to the storage slot.
    pub fn save(&self) -> PersistenceResult<()> {
        persistence::save(&self.surface, self.storage.as_ref(), &self.storage_key)
            .inspect_err(|e| log::warn!("Save failed: {}", e))
    }

    /// Draw the saved drawing, if any. A drawn image is recorded in history.
    pub fn load(&mut self) -> PersistenceResult<bool> {
        let loaded = persistence::load(&mut self.surface, self.storage.as_ref(), &self.storage_key)
            .inspect_err(|e| log::warn!("Load failed: {}", e))?;
        if loaded {
            self.pending_redraws.clear();
            self.history.snapshot(&self.surface);
            self.touch();
        }
        Ok(loaded)
    }

    /// Hand the drawing to the downloader as `drawing.png`.
    pub fn export(&self) -> PersistenceResult<()> {
        persistence::export(&self.surface, self.downloader.as_ref())
            .inspect_err(|e| log::warn!("Export failed: {}", e))
    }

    /// First activation hook. Loads the saved drawing once if autoload is on.
    pub fn activate(&mut self) -> PersistenceResult<bool> {
        if self.activated {
            return Ok(false);
        }
        self.activated = true;
        if !self.autoload {
            return Ok(false);
        }
        self.load()
    }

    /// Apply a control-panel intent. Failures are logged and swallowed.
    pub fn apply(&mut self, intent: ControlIntent) {
        match intent {
            ControlIntent::SetBrushSize(size) => self.set_brush_size(size),
            ControlIntent::SetBrushColor(text) => {
                let _ = self.set_brush_color(&text);
            }
            ControlIntent::SetBrushColorValue(color) => self.set_brush_color_value(color),
            ControlIntent::Resize { width, height } => {
                let _ = self.resize(width, height);
            }
            ControlIntent::Clear => self.clear(),
            ControlIntent::Undo => {
                self.undo();
            }
            ControlIntent::Save => {
                let _ = self.save();
            }
            ControlIntent::Load => {
                let _ = self.load();
            }
            ControlIntent::Export => {
                let _ = self.export();
            }
            ControlIntent::ZoomIn => self.zoom_in(),
            ControlIntent::ZoomOut => self.zoom_out(),
            ControlIntent::ResetView => self.reset_view(),
        }
    }
}
