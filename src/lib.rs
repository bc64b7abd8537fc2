pub mod camera;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod links;
pub mod markup;
pub mod page;
mod renderer;
pub mod scene;
pub mod selection;
pub mod state;
pub mod tween;
pub mod viewer;

#[cfg(not(target_arch = "wasm32"))]
pub mod preview;

// ── Web entry‑point ──
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Redirect `log` macros & panic messages to the browser console
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();
    console_error_panic_hook::set_once();

    page::start().await
}
