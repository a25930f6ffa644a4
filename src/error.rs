//! Error taxonomy for the client layer.
//!
//! Nothing here is fatal to the page: load errors become a visible banner,
//! speech errors become a fallback attempt, and missing DOM elements are
//! handled with `Option` lookups in [`crate::dom`] rather than an error type.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// A list fetch (`/api/quiz`, `/api/vocabulary`, `/api/categories`) failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("no items available")]
    Empty,
    #[error("a load is already in flight")]
    AlreadyLoading,
}

/// Server-side synthesis could not be used. Always recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("server requested fallback: {0}")]
    FallbackRequested(String),
    #[error("audio payload is not valid base64: {0}")]
    MalformedAudio(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Best-effort readable text for a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

impl From<LoadError> for JsValue {
    fn from(e: LoadError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
