//! Thin helpers over `web_sys` shared by every page binding.
//!
//! Lookups return `Option` and callers skip the action when an element is
//! missing; none of these helpers throw into JS.

use crate::animation::CountUp;
use crate::error::{LoadError, js_message};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, NodeList, Request, RequestInit, Response, window};

// --- Lookups -----------------------------------------------------------------

pub fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

/// Like [`document`] but for entry points that cannot do anything useful
/// without one.
pub fn require_document() -> Result<Document, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    win.document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn by_id(id: &str) -> Option<HtmlElement> {
    document()?.get_element_by_id(id)?.dyn_into().ok()
}

pub fn by_id_as<T: JsCast>(id: &str) -> Option<T> {
    document()?.get_element_by_id(id)?.dyn_into().ok()
}

pub fn query(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

pub fn query_all(selector: &str) -> Vec<Element> {
    document()
        .and_then(|d| d.query_selector_all(selector).ok())
        .map(elements)
        .unwrap_or_default()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

// --- Presentation toggles ---------------------------------------------------

pub fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    el.style().set_property(prop, value).ok();
}

pub fn set_display(el: &HtmlElement, value: &str) {
    set_style(el, "display", value);
}

pub fn is_displayed(el: &HtmlElement) -> bool {
    el.style()
        .get_property_value("display")
        .map(|v| v == "block")
        .unwrap_or(false)
}

pub fn set_text_id(id: &str, text: &str) {
    if let Some(el) = by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub fn add_class(el: &Element, class: &str) {
    el.class_list().add_1(class).ok();
}

pub fn remove_class(el: &Element, class: &str) {
    el.class_list().remove_1(class).ok();
}

pub fn toggle_class(el: &Element, class: &str) {
    el.class_list().toggle(class).ok();
}

pub fn body_overflow(value: &str) {
    if let Some(body) = document().and_then(|d| d.body()) {
        set_style(&body, "overflow", value);
    }
}

// --- Events & timers --------------------------------------------------------

/// Attach a listener for the lifetime of the page. Page setup only: the
/// closure is never freed, so per-render elements use a delegated listener
/// on their container instead.
pub fn listen<E, F>(target: &web_sys::EventTarget, event: &str, handler: F)
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log::warn!("failed to attach {event} listener: {}", js_message(&e));
    }
    closure.forget();
}

/// One-shot timer; returns the handle when scheduling succeeded.
pub fn set_timeout(ms: u32, f: impl FnOnce() + 'static) -> Option<i32> {
    let win = window()?;
    let cb = Closure::once_into_js(f);
    win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms as i32)
        .ok()
}

/// Resolve after `ms` milliseconds. Resolves immediately without a window.
pub async fn sleep(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        let scheduled = window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32)
        });
        if !matches!(scheduled, Some(Ok(_))) {
            resolve.call0(&JsValue::NULL).ok();
        }
    });
    JsFuture::from(promise).await.ok();
}

/// Drive `el`'s text through `count`, one value every `interval_ms`.
pub fn run_count_up(el: HtmlElement, count: CountUp, interval_ms: u32) {
    wasm_bindgen_futures::spawn_local(async move {
        for value in count {
            sleep(interval_ms).await;
            el.set_text_content(Some(&value.to_string()));
        }
    });
}

// --- HTTP -------------------------------------------------------------------

/// `GET url` and decode the JSON body. Non-2xx statuses are errors.
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, LoadError> {
    let win = window().ok_or_else(|| LoadError::Network("no window".into()))?;
    let value = JsFuture::from(win.fetch_with_str(url))
        .await
        .map_err(|e| LoadError::Network(js_message(&e)))?;
    let resp: Response = value
        .dyn_into()
        .map_err(|_| LoadError::Decode("fetch did not yield a Response".into()))?;
    if !resp.ok() {
        return Err(LoadError::Http { status: resp.status() });
    }
    let body = response_text(&resp).await.map_err(LoadError::Decode)?;
    serde_json::from_str(&body).map_err(|e| LoadError::Decode(e.to_string()))
}

/// `POST url` with a JSON body. Returns status and raw body regardless of
/// status so callers can read structured error payloads.
pub async fn post_json<B: Serialize>(url: &str, body: &B) -> Result<(u16, String), String> {
    let win = window().ok_or("no window")?;
    let payload = serde_json::to_string(body).map_err(|e| e.to_string())?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(&payload));
    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| js_message(&e))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| js_message(&e))?;

    let value = JsFuture::from(win.fetch_with_request(&request))
        .await
        .map_err(|e| js_message(&e))?;
    let resp: Response = value
        .dyn_into()
        .map_err(|_| "fetch did not yield a Response".to_string())?;
    let text = response_text(&resp).await?;
    Ok((resp.status(), text))
}

async fn response_text(resp: &Response) -> Result<String, String> {
    let promise = resp.text().map_err(|e| js_message(&e))?;
    let value = JsFuture::from(promise).await.map_err(|e| js_message(&e))?;
    value
        .as_string()
        .ok_or_else(|| "response body is not text".to_string())
}
