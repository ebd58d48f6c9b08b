//! Browser bridge for the constellation background.
//!
//! ```js
//! import init, { startConstellation } from "./constellation_web.js";
//! await init();
//! const handle = startConstellation("constellation", null);
//! // later, before the canvas is removed:
//! handle?.stop();
//! ```

mod canvas;
mod css_theme;
mod runner;

use constellation::FieldConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

pub use css_theme::{LINE_RGB_VAR, PARTICLE_COLOR_VAR};
pub use runner::{ConstellationHandle, INIT_MARKER};

/// Start the background on the canvas with id `canvas_id`.
///
/// `config_json` optionally overrides any tuning constant. Returns `undefined`
/// when the page has no such canvas, it is not a canvas, or a field is already
/// running on it.
#[wasm_bindgen(js_name = startConstellation)]
pub fn start_constellation(canvas_id: &str, config_json: Option<String>) -> Result<Option<ConstellationHandle>, JsValue> {
    console_error_panic_hook::set_once();
    // Fails harmlessly when a previous start already installed the logger.
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json {
        Some(json) => FieldConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => FieldConfig::default(),
    };

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let Some(element) = document.get_element_by_id(canvas_id) else {
        log::debug!("constellation: no #{} on this page", canvas_id);
        return Ok(None);
    };
    let Ok(canvas) = element.dyn_into::<HtmlCanvasElement>() else {
        log::warn!("constellation: #{} is not a canvas", canvas_id);
        return Ok(None);
    };

    runner::start(canvas, config)
}
