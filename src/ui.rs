//! Notification banners, loading toggles and modal dialogs shared by all pages.

use crate::config;
use crate::dom;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent};

/// Banner flavour; decides class names, icon and auto-dismiss delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
}

impl BannerKind {
    pub fn class_prefix(self) -> &'static str {
        match self {
            BannerKind::Error => "error",
            BannerKind::Success => "success",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            BannerKind::Error => "⚠️",
            BannerKind::Success => "✅",
        }
    }

    pub fn dismiss_after_ms(self, timings: &config::Timings) -> u32 {
        match self {
            BannerKind::Error => timings.error_banner_ms,
            BannerKind::Success => timings.success_banner_ms,
        }
    }
}

/// Append a banner to `container` and remove it after the kind's timeout,
/// unless something else already removed it.
pub fn show_banner(kind: BannerKind, message: &str, container: &Element) {
    let Some(doc) = dom::document() else { return };
    let build = || -> Result<Element, wasm_bindgen::JsValue> {
        let prefix = kind.class_prefix();
        let banner = doc.create_element("div")?;
        banner.set_class_name(&format!("{prefix}-message"));
        let content = doc.create_element("div")?;
        content.set_class_name(&format!("{prefix}-content"));
        let icon = doc.create_element("span")?;
        icon.set_class_name(&format!("{prefix}-icon"));
        icon.set_text_content(Some(kind.icon()));
        let text = doc.create_element("p")?;
        text.set_text_content(Some(message));
        content.append_child(&icon)?;
        content.append_child(&text)?;
        banner.append_child(&content)?;
        Ok(banner)
    };
    let banner = match build() {
        Ok(b) => b,
        Err(e) => {
            log::warn!("banner not built: {}", crate::error::js_message(&e));
            return;
        }
    };
    if container.append_child(&banner).is_err() {
        return;
    }
    let delay = kind.dismiss_after_ms(&config::timings());
    dom::set_timeout(delay, move || {
        if banner.parent_node().is_some() {
            banner.remove();
        }
    });
}

pub fn show_error(message: &str, container: &Element) {
    show_banner(BannerKind::Error, message, container);
}

pub fn show_success(message: &str, container: &Element) {
    show_banner(BannerKind::Success, message, container);
}

pub fn show_loading(el: &HtmlElement) {
    dom::set_display(el, "block");
}

pub fn hide_loading(el: &HtmlElement) {
    dom::set_display(el, "none");
}

// --- Modals -----------------------------------------------------------------

pub fn open_modal(id: &str) {
    if let Some(modal) = dom::by_id(id) {
        dom::set_display(&modal, "block");
        dom::body_overflow("hidden");
    }
}

pub fn close_modal(id: &str) {
    if let Some(modal) = dom::by_id(id) {
        dom::set_display(&modal, "none");
        dom::body_overflow("auto");
    }
}

/// The modal currently displayed, if any.
pub fn open_modal_id() -> Option<String> {
    dom::query_all(".modal")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .find(dom::is_displayed)
        .map(|el| el.id())
}

/// Wire close buttons, backdrop clicks and Escape for every `.modal` on the
/// page. Call once per page load.
pub fn install_modal_handlers() {
    let Some(doc) = dom::document() else { return };

    for btn in dom::query_all(".close-modal") {
        let target = btn.clone();
        dom::listen(&btn, "click", move |_: MouseEvent| {
            if let Ok(Some(modal)) = target.closest(".modal") {
                close_modal(&modal.id());
            }
        });
    }

    for modal in dom::query_all(".modal") {
        let id = modal.id();
        let backdrop = modal.clone();
        dom::listen(&modal, "click", move |evt: MouseEvent| {
            let on_backdrop = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .is_some_and(|t| t == backdrop);
            if on_backdrop {
                close_modal(&id);
            }
        });
    }

    dom::listen(&doc, "keydown", |evt: KeyboardEvent| {
        if evt.key() == "Escape" {
            if let Some(id) = open_modal_id() {
                close_modal(&id);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_kinds_use_their_own_timeouts() {
        let t = config::Timings::default();
        assert_eq!(BannerKind::Error.dismiss_after_ms(&t), 5000);
        assert_eq!(BannerKind::Success.dismiss_after_ms(&t), 3000);
        assert_eq!(BannerKind::Error.class_prefix(), "error");
        assert_eq!(BannerKind::Success.icon(), "✅");
    }
}
