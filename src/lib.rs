//! Kosakata web client.
//!
//! Browser-side behaviour for the Mandarin vocabulary site, compiled to WASM.
//! Every page calls `init_site()`; the quiz and vocabulary pages then call
//! their own entry point. The remaining exports form the shared helper
//! namespace page scripts may call directly.

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

pub mod animation;
pub mod config;
pub mod dom;
pub mod error;
pub mod model;
pub mod nav;
pub mod quiz;
pub mod speech;
pub mod ui;
pub mod vocabulary;

pub use error::{LoadError, SpeechError};
pub use model::{QuizQuestion, VocabularyWord};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

static LOGGER: std::sync::Once = std::sync::Once::new();

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    LOGGER.call_once(|| {
        wasm_logger::init(wasm_logger::Config::default());
        log::info!("Logging initialized");
    });
}

// -----------------------------------------------------------------------------
// Page entry points
// -----------------------------------------------------------------------------

/// Override endpoints / timings; `json` may name any subset of fields.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let cfg = config::AppConfig::from_json(json)
        .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?;
    config::install(cfg);
    Ok(())
}

/// Navigation, scroll reveal, resize handling and modal wiring.
#[wasm_bindgen]
pub fn init_site() -> Result<(), JsValue> {
    dom::require_document()?;
    nav::init_site();
    ui::install_modal_handlers();
    Ok(())
}

#[wasm_bindgen]
pub fn start_quiz_page() -> Result<(), JsValue> {
    quiz::dom::init_quiz_page()
}

#[wasm_bindgen]
pub fn start_vocabulary_page() -> Result<(), JsValue> {
    vocabulary::dom::init_vocabulary_page()
}

// -----------------------------------------------------------------------------
// Shared helpers
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn speak_chinese(text: String) {
    speech::speak_detached(text);
}

#[wasm_bindgen]
pub fn open_modal(id: &str) {
    ui::open_modal(id);
}

#[wasm_bindgen]
pub fn close_modal(id: &str) {
    ui::close_modal(id);
}

#[wasm_bindgen]
pub fn show_error(message: &str, container: &Element) {
    ui::show_error(message, container);
}

#[wasm_bindgen]
pub fn show_success(message: &str, container: &Element) {
    ui::show_success(message, container);
}

#[wasm_bindgen]
pub fn show_loading(element: &HtmlElement) {
    ui::show_loading(element);
}

#[wasm_bindgen]
pub fn hide_loading(element: &HtmlElement) {
    ui::hide_loading(element);
}

#[wasm_bindgen]
pub fn quiz_start() {
    quiz::dom::start();
}

#[wasm_bindgen]
pub fn quiz_retake() {
    quiz::dom::retake();
}

#[wasm_bindgen]
pub fn quiz_next() {
    quiz::dom::next();
}

#[wasm_bindgen]
pub fn vocabulary_reload() {
    vocabulary::dom::load();
}

#[wasm_bindgen]
pub fn vocabulary_filter() {
    vocabulary::dom::refilter_from_page();
}
