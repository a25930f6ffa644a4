//! Site-wide glue: mobile menu, active link, scroll reveal, stat counters,
//! resize handling and smooth in-page anchors.

use crate::animation::{CountUp, parse_stat_target};
use crate::config;
use crate::dom;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, Url,
};

const REVEAL_SELECTOR: &str = ".feature-card, .stat-item, .vocab-card";

/// Above the breakpoint the hamburger menu is forced shut.
pub fn should_collapse_menu(viewport_width: f64, breakpoint_px: u32) -> bool {
    viewport_width > f64::from(breakpoint_px)
}

fn menu_parts() -> Option<(Element, Element)> {
    Some((dom::query(".hamburger")?, dom::query(".nav-menu")?))
}

fn close_menu() {
    if let Some((hamburger, menu)) = menu_parts() {
        dom::remove_class(&hamburger, "active");
        dom::remove_class(&menu, "active");
    }
}

fn init_navigation() {
    if let Some((hamburger, menu)) = menu_parts() {
        let (h, m) = (hamburger.clone(), menu.clone());
        dom::listen(&hamburger, "click", move |_: MouseEvent| {
            dom::toggle_class(&h, "active");
            dom::toggle_class(&m, "active");
        });
        for link in dom::query_all(".nav-link") {
            dom::listen(&link, "click", |_: MouseEvent| close_menu());
        }
    }
    highlight_active_nav();
}

fn highlight_active_nav() {
    let Some(current) = web_sys::window().and_then(|w| w.location().pathname().ok()) else {
        return;
    };
    for link in dom::query_all(".nav-link") {
        let Some(href) = link.dyn_ref::<web_sys::HtmlAnchorElement>().map(|a| a.href()) else {
            continue;
        };
        let Ok(url) = Url::new(&href) else { continue };
        if url.pathname() == current {
            dom::add_class(&link, "active");
        }
    }
}

/// Count a `.stat-item`'s `.stat-number` up from 0 to its authored value.
fn animate_stat_number(stat_item: &Element) {
    let Some(number) = stat_item
        .query_selector(".stat-number")
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let Some(target) = number.text_content().as_deref().and_then(parse_stat_target) else {
        return;
    };
    let t = config::timings();
    dom::run_count_up(
        number,
        CountUp::new(target, t.stat_count_steps),
        CountUp::interval_ms(t.stat_count_ms, t.stat_count_steps),
    );
}

fn init_animations() {
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _obs: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
            if !entry.is_intersecting() {
                continue;
            }
            let target = entry.target();
            dom::add_class(&target, "animate");
            if target.class_list().contains("stat-item") {
                animate_stat_number(&target);
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(0.1));
    options.set_root_margin("0px 0px -50px 0px");
    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
        Ok(observer) => {
            for el in dom::query_all(REVEAL_SELECTOR) {
                observer.observe(&el);
            }
        }
        Err(e) => log::warn!("scroll reveal unavailable: {}", crate::error::js_message(&e)),
    }
    callback.forget();
}

fn handle_resize() {
    let Some(width) = web_sys::window().and_then(|w| w.inner_width().ok()).and_then(|v| v.as_f64()) else {
        return;
    };
    if should_collapse_menu(width, config::current().mobile_breakpoint_px) {
        close_menu();
    }
}

fn init_responsive() {
    if let Some(win) = web_sys::window() {
        dom::listen(&win, "resize", |_: Event| handle_resize());
    }
    handle_resize();
}

fn init_smooth_anchors() {
    for anchor in dom::query_all(r##"a[href^="#"]"##) {
        let source = anchor.clone();
        dom::listen(&anchor, "click", move |evt: MouseEvent| {
            evt.prevent_default();
            let Some(selector) = source.get_attribute("href") else { return };
            // a bare "#" is not a valid selector
            if let Some(target) = dom::query(&selector) {
                let opts = ScrollIntoViewOptions::new();
                opts.set_behavior(ScrollBehavior::Smooth);
                opts.set_block(ScrollLogicalPosition::Start);
                target.scroll_into_view_with_scroll_into_view_options(&opts);
            }
        });
    }
}

/// Shared page setup run on every page.
pub fn init_site() {
    init_navigation();
    init_animations();
    init_responsive();
    init_smooth_anchors();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_collapses_only_above_breakpoint() {
        assert!(should_collapse_menu(1024.0, 768));
        assert!(!should_collapse_menu(768.0, 768));
        assert!(!should_collapse_menu(375.0, 768));
    }
}
