//! Scribble Application
//!
//! The application shell: window or browser canvas, the control panel,
//! keyboard shortcuts and translation of egui input into canvas events.

mod app;
mod event_handler;
mod shortcuts;
mod texture;
mod ui;

pub use app::{App, AppConfig, CONFIG_ENV};
pub use event_handler::EventHandler;
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use texture::{SurfaceTextures, Tile, tile_layout};
pub use ui::{PanelView, UiAction, UiState, render_ui, status_text};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
