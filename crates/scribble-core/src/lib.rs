//! Scribble Core Library
//!
//! Platform-agnostic drawing pipeline for the Scribble canvas: pointer input,
//! smoothed strokes, pan/zoom, raster undo history and persistence.

pub mod brush;
pub mod canvas;
pub mod codec;
pub mod config;
pub mod download;
pub mod history;
pub mod input;
pub mod persistence;
pub mod storage;
pub mod stroke;
pub mod surface;
pub mod view;

pub use brush::{BrushError, BrushState};
pub use canvas::{Canvas, CanvasError, CanvasSize, ControlIntent, sanitize_dimension};
pub use config::{CanvasConfig, ConfigError};
pub use download::{DownloadError, Downloader};
pub use history::History;
pub use input::{Gesture, InputTracker, MouseButton, PointerEvent};
pub use persistence::{EXPORT_FILE_NAME, PersistenceError, SAVED_DRAWING_KEY};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use stroke::{StrokeRenderer, StrokeSegment};
pub use surface::{PixelBuffer, RasterSurface, Surface, SurfaceError};
pub use view::ViewTransform;
