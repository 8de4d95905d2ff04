//! Canvas configuration.

use crate::brush::{self, BrushError, DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_SIZE};
use crate::canvas::{MAX_DIMENSION, MIN_DIMENSION};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::persistence::SAVED_DRAWING_KEY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default backing width of a new canvas.
pub const DEFAULT_WIDTH: u32 = 1300;
/// Default backing height of a new canvas.
pub const DEFAULT_HEIGHT: u32 = 1000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read config {path}: {message}")]
    Io { path: String, message: String },
    #[error(transparent)]
    Brush(#[from] BrushError),
    #[error("Storage key must not be empty")]
    EmptyStorageKey,
}

/// Initial state and limits of a [`Canvas`](crate::canvas::Canvas).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Backing width in pixels.
    pub width: u32,
    /// Backing height in pixels.
    pub height: u32,
    /// Initial brush diameter.
    pub brush_size: f64,
    /// Initial brush color (any CSS color).
    pub brush_color: String,
    /// Maximum number of undo snapshots.
    pub history_limit: usize,
    /// Load the saved drawing when the canvas is first activated.
    pub autoload: bool,
    /// Storage slot used by save and load.
    pub storage_key: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_color: DEFAULT_BRUSH_COLOR.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            autoload: true,
            storage_key: SAVED_DRAWING_KEY.to_string(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and validate a JSON config file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Clamp numeric fields into range and reject values that cannot be used.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.width = self.width.clamp(MIN_DIMENSION, MAX_DIMENSION);
        self.height = self.height.clamp(MIN_DIMENSION, MAX_DIMENSION);
        self.brush_size = if self.brush_size.is_finite() {
            self.brush_size
                .clamp(brush::MIN_BRUSH_SIZE, brush::MAX_BRUSH_SIZE)
        } else {
            DEFAULT_BRUSH_SIZE
        };
        self.history_limit = self.history_limit.max(1);
        brush::parse_css_color(&self.brush_color)?;
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(self)
    }
}
