//! Core application state and lifecycle.

use egui::{Color32, Context, Rect, Sense, vec2};
use scribble_core::brush::parse_css_color;
use scribble_core::storage::MemoryStorage;
use scribble_core::{Canvas, CanvasConfig, CanvasError, ConfigError, Downloader, Storage};
use serde::{Deserialize, Serialize};

use crate::event_handler::EventHandler;
use crate::shortcuts::ShortcutRegistry;
use crate::texture::SurfaceTextures;
use crate::ui::{PanelView, UiAction, UiState, render_ui};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "SCRIBBLE_CONFIG";

#[cfg(feature = "native")]
mod file_ops {
    use scribble_core::download::{DownloadError, DownloadResult, Downloader};

    /// Asks where to put each download with a native save dialog.
    pub struct DialogDownloader;

    impl Downloader for DialogDownloader {
        fn download(&self, file_name: &str, data: &[u8], _mime_type: &str) -> DownloadResult<()> {
            let dialog = rfd::FileDialog::new()
                .set_title("Export Drawing")
                .set_file_name(file_name)
                .add_filter("PNG Image", &["png"]);

            let path = dialog.save_file().ok_or(DownloadError::Cancelled)?;
            std::fs::write(&path, data).map_err(|e| DownloadError::Io(e.to_string()))?;
            log::info!("Wrote download to: {:?}", path);
            Ok(())
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Initial window width in points.
    pub width: u32,
    /// Initial window height in points.
    pub height: u32,
    /// Color behind the drawing surface (any CSS color).
    pub background_color: String,
    pub canvas: CanvasConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Scribble".to_string(),
            width: 1400,
            height: 1100,
            background_color: "#e6e6e6".to_string(),
            canvas: CanvasConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.canvas = config.canvas.validated()?;
        parse_css_color(&config.background_color)?;
        Ok(config)
    }

    /// Read the file named by `SCRIBBLE_CONFIG`, or use defaults when unset.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Ok(Self::default());
        };
        let path = std::path::PathBuf::from(path);
        let json = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Background color as an egui color. Falls back to light gray.
    pub fn background(&self) -> Color32 {
        match parse_css_color(&self.background_color) {
            Ok(color) => {
                let rgba = color.to_rgba8();
                Color32::from_rgba_unmultiplied(rgba.r, rgba.g, rgba.b, rgba.a)
            }
            Err(_) => Color32::from_gray(230),
        }
    }
}

/// Slot storage for the current platform.
fn platform_storage() -> Box<dyn Storage> {
    #[cfg(not(target_arch = "wasm32"))]
    let storage = scribble_core::storage::FileStorage::default_location();
    #[cfg(target_arch = "wasm32")]
    let storage = scribble_core::storage::LocalStorage::new();

    match storage {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("Persistent storage unavailable, drawings will not survive restart: {}", e);
            Box::new(MemoryStorage::new())
        }
    }
}

/// Export target for the current platform.
fn platform_downloader() -> Box<dyn Downloader> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(scribble_core::download::BrowserDownloader::new())
    }
    #[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
    {
        Box::new(file_ops::DialogDownloader)
    }
    #[cfg(all(not(target_arch = "wasm32"), not(feature = "native")))]
    {
        Box::new(scribble_core::download::DirectoryDownloader::default_location())
    }
}

/// The eframe application: one canvas, its control panel and the textures
/// that mirror the surface.
pub struct App {
    canvas: Canvas,
    config: AppConfig,
    background: Color32,
    ui_state: UiState,
    event_handler: EventHandler,
    textures: SurfaceTextures,
    activated: bool,
}

impl App {
    /// Build the app with platform storage and downloads.
    pub fn new(config: AppConfig) -> Result<Self, CanvasError> {
        Self::with_backends(config, platform_storage(), platform_downloader())
    }

    /// Build the app on explicit backends.
    pub fn with_backends(
        config: AppConfig,
        storage: Box<dyn Storage>,
        downloader: Box<dyn Downloader>,
    ) -> Result<Self, CanvasError> {
        let canvas = Canvas::new(config.canvas.clone(), storage, downloader)?;
        let background = config.background();
        log::info!(
            "Starting {} with a {}x{} canvas",
            config.title,
            canvas.size().width,
            canvas.size().height
        );
        Ok(Self {
            canvas,
            config,
            background,
            ui_state: UiState::default(),
            event_handler: EventHandler::new(),
            textures: SurfaceTextures::new(),
            activated: false,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Apply actions collected from the panel and shortcuts.
    pub fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::Canvas(intent) => self.canvas.apply(intent),
                UiAction::ToggleShortcuts => {
                    self.ui_state.show_shortcuts = !self.ui_state.show_shortcuts;
                }
            }
        }
    }

    /// First-frame work and deferred redraws.
    fn tick(&mut self) {
        if !self.activated {
            self.activated = true;
            if let Ok(true) = self.canvas.activate() {
                log::info!("Restored saved drawing");
            }
        }
        self.canvas.run_deferred();
    }

    fn show_canvas(&mut self, ctx: &Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(self.background))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
                let rect = response.rect;

                let events = ui.input(|i| i.events.clone());
                let accepts_press = response.contains_pointer();
                for event in self.event_handler.handle_events(&events, rect, accepts_press) {
                    self.canvas.handle_pointer(event);
                }

                self.textures.sync(ctx, &self.canvas);

                let view = self.canvas.view();
                let scale = view.scale() as f32;
                let offset = view.offset();
                let size = self.canvas.size();
                let surface_rect = Rect::from_min_size(
                    rect.min + vec2(offset.x as f32, offset.y as f32),
                    vec2(size.width as f32 * scale, size.height as f32 * scale),
                );

                painter.rect_filled(surface_rect, 0.0, Color32::WHITE);
                self.textures.paint(&painter, surface_rect.min, scale);

                if self.event_handler.is_inside() {
                    ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
                }
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.tick();

        let mut actions = Vec::new();
        if let Some(action) = ShortcutRegistry::detect(ctx) {
            actions.push(action);
        }

        let view = PanelView::from_canvas(&self.canvas);
        actions.extend(render_ui(ctx, &mut self.ui_state, &view));

        self.show_canvas(ctx);
        self.apply_actions(actions);

        if self.canvas.has_pending_redraw() {
            ctx.request_repaint();
        }
    }
}
