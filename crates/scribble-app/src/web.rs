//! WASM entry point.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Id of the `<canvas>` element the app renders into.
const CANVAS_ID: &str = "scribble_canvas";

fn canvas_element() -> Option<web_sys::HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(CANVAS_ID)?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .ok()
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();

    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Starting Scribble (WASM)");

    let Some(canvas) = canvas_element() else {
        log::error!("No <canvas id=\"{}\"> in the page", CANVAS_ID);
        return;
    };

    wasm_bindgen_futures::spawn_local(async move {
        let result = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(
                    |_cc| -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
                        let app = crate::App::new(crate::AppConfig::default())?;
                        Ok(Box::new(app))
                    },
                ),
            )
            .await;
        if let Err(e) = result {
            log::error!("Failed to start: {:?}", e);
        }
    });
}
