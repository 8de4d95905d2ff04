//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() -> eframe::Result {
    env_logger::init();

    let config = match scribble_app::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Ignoring config from ${}: {}", scribble_app::CONFIG_ENV, e);
            scribble_app::AppConfig::default()
        }
    };
    log::info!("Starting {}", config.title);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.title.clone())
            .with_inner_size([config.width as f32, config.height as f32]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(
            |_cc| -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
                let app = scribble_app::App::new(config)?;
                Ok(Box::new(app))
            },
        ),
    )
}

#[cfg(not(feature = "native"))]
fn main() {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
}
