//! Binds [`VocabularyBrowser`] to the vocabulary page markup.

use super::{VocabularyBrowser, VocabularyStats, VocabularyView, capitalize_first};
use crate::animation::card_reveal_delay_ms;
use crate::config;
use crate::dom;
use crate::model::VocabularyWord;
use crate::speech;
use crate::ui;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement, KeyboardEvent,
    MouseEvent,
};

const DETAIL_MODAL: &str = "vocabularyModal";

thread_local! {
    static BROWSER: RefCell<Option<VocabularyBrowser<DomVocabularyView>>> = const { RefCell::new(None) };
}

fn with_browser<R>(f: impl FnOnce(&mut VocabularyBrowser<DomVocabularyView>) -> R) -> Option<R> {
    BROWSER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub struct DomVocabularyView {
    grid: Option<HtmlElement>,
    search: Option<HtmlInputElement>,
    category: Option<HtmlSelectElement>,
    total_words: Option<HtmlElement>,
    current_category: Option<HtmlElement>,
    loading: Option<HtmlElement>,
    no_results: Option<HtmlElement>,
}

impl DomVocabularyView {
    pub fn from_document() -> Self {
        Self {
            grid: dom::by_id("vocabularyGrid"),
            search: dom::by_id_as("searchInput"),
            category: dom::by_id_as("categoryFilter"),
            total_words: dom::by_id("totalWords"),
            current_category: dom::by_id("currentCategory"),
            loading: dom::by_id("loading"),
            no_results: dom::by_id("noResults"),
        }
    }

    /// Current (search term, category) as typed/selected on the page.
    fn read_filters(&self) -> (String, String) {
        let term = self.search.as_ref().map(|s| s.value()).unwrap_or_default();
        let category = self
            .category
            .as_ref()
            .map(|c| c.value())
            .unwrap_or_else(|| super::ALL_CATEGORIES.to_string());
        (term, category)
    }

    fn grid_display(&self, value: &str) {
        if let Some(grid) = &self.grid {
            dom::set_display(grid, value);
        }
    }

    fn no_results_display(&self, value: &str) {
        if let Some(el) = &self.no_results {
            dom::set_display(el, value);
        }
    }

    fn build_card(index: usize, word: &VocabularyWord) -> Result<HtmlElement, JsValue> {
        let doc = dom::require_document()?;
        let card: HtmlElement = doc.create_element("div")?.dyn_into()?;
        card.set_class_name("vocab-card");
        card.set_attribute("data-index", &index.to_string())?;
        dom::set_style(&card, "opacity", "0");
        dom::set_style(&card, "transform", "translateY(20px)");
        dom::set_style(&card, "transition", "all 0.3s ease");

        let category = capitalize_first(&word.category);
        for (tag, class, text) in [
            ("div", "chinese", word.chinese.as_str()),
            ("div", "pinyin", word.pinyin.as_str()),
            ("div", "indonesian", word.indonesian.as_str()),
            ("span", "category-tag", category.as_str()),
        ] {
            let part = doc.create_element(tag)?;
            part.set_class_name(class);
            part.set_text_content(Some(text));
            card.append_child(&part)?;
        }
        Ok(card)
    }
}

impl VocabularyView for DomVocabularyView {
    fn show_loading(&mut self) {
        if let Some(el) = &self.loading {
            dom::set_display(el, "block");
        }
        self.grid_display("none");
    }

    fn hide_loading(&mut self) {
        if let Some(el) = &self.loading {
            dom::set_display(el, "none");
        }
        self.grid_display("grid");
    }

    fn render_cards(&mut self, words: &[VocabularyWord]) {
        let Some(grid) = &self.grid else { return };
        grid.set_inner_html("");
        self.no_results_display("none");
        self.grid_display("grid");

        let t = config::timings();
        for (i, word) in words.iter().enumerate() {
            let card = match Self::build_card(i, word) {
                Ok(card) => card,
                Err(e) => {
                    log::warn!("card for {} not built: {}", word.chinese, crate::error::js_message(&e));
                    continue;
                }
            };
            if grid.append_child(&card).is_err() {
                continue;
            }
            dom::set_timeout(card_reveal_delay_ms(i, t.card_kickoff_ms, t.card_stagger_ms), move || {
                dom::set_style(&card, "opacity", "1");
                dom::set_style(&card, "transform", "translateY(0)");
            });
        }
    }

    fn show_no_results(&mut self) {
        if let Some(grid) = &self.grid {
            grid.set_inner_html("");
        }
        self.no_results_display("block");
        self.grid_display("none");
    }

    fn update_stats(&mut self, stats: &VocabularyStats) {
        if let Some(el) = &self.total_words {
            el.set_text_content(Some(&stats.total.to_string()));
        }
        if let Some(el) = &self.current_category {
            el.set_text_content(Some(&stats.category_label));
        }
    }

    fn populate_categories(&mut self, categories: &[String]) {
        let Some(select) = &self.category else { return };
        // keep the leading "all" option
        while select.children().length() > 1 {
            match select.last_element_child() {
                Some(last) => last.remove(),
                None => break,
            }
        }
        for category in categories {
            let Ok(option) = HtmlOptionElement::new_with_text_and_value(&capitalize_first(category), category)
            else {
                continue;
            };
            select.append_child(&option).ok();
        }
    }

    fn show_error(&mut self, message: &str) {
        let container: Option<Element> = self.grid.as_ref().and_then(|g| g.parent_element());
        if let Some(container) = container {
            ui::show_error(message, &container);
        }
    }

    fn open_detail(&mut self, word: &VocabularyWord) {
        dom::set_text_id("modalChinese", &word.chinese);
        dom::set_text_id("modalPinyin", &word.pinyin);
        dom::set_text_id("modalIndonesian", &word.indonesian);
        dom::set_text_id("modalCategory", &capitalize_first(&word.category));
        ui::open_modal(DETAIL_MODAL);
    }

    fn close_detail(&mut self) {
        ui::close_modal(DETAIL_MODAL);
    }

    fn pronounce(&mut self, text: &str) {
        speech::speak_detached(text.to_owned());
    }

    fn go_to_practice(&mut self) {
        let target = config::current().endpoints.quiz_page;
        if let Some(win) = web_sys::window() {
            if let Err(e) = win.location().set_href(&target) {
                log::warn!("navigation to {target} failed: {}", crate::error::js_message(&e));
            }
        }
    }
}

/// Fetch words and categories concurrently; each completes independently.
pub fn load() {
    let endpoints = config::current().endpoints;
    if matches!(with_browser(|b| b.begin_load_words()), Some(Ok(()))) {
        let url = endpoints.vocabulary;
        wasm_bindgen_futures::spawn_local(async move {
            let fetched = dom::fetch_json::<Vec<VocabularyWord>>(&url).await;
            with_browser(|b| b.finish_load_words(fetched).ok());
        });
    }
    let url = endpoints.categories;
    wasm_bindgen_futures::spawn_local(async move {
        let fetched = dom::fetch_json::<Vec<String>>(&url).await;
        with_browser(|b| b.finish_load_categories(fetched));
    });
}

/// Index of the card `el` sits in, from the card's `data-index`.
pub fn card_index_of(el: &Element) -> Option<usize> {
    let card = el.closest(".vocab-card").ok()??;
    card.get_attribute("data-index")?.parse().ok()
}

fn clicked_card_index(evt: &MouseEvent) -> Option<usize> {
    card_index_of(&evt.target()?.dyn_into::<Element>().ok()?)
}

/// Re-run the filter with whatever the search box and category select hold.
pub fn refilter_from_page() {
    with_browser(|b| {
        let (term, category) = b.view().read_filters();
        b.apply_filter(&term, &category);
    });
}

/// Vocabulary page entry point.
pub fn init_vocabulary_page() -> Result<(), JsValue> {
    let doc = dom::require_document()?;
    let view = DomVocabularyView::from_document();
    let search = view.search.clone();
    if let Some(input) = &view.search {
        dom::listen(input, "input", |_: Event| refilter_from_page());
    }
    if let Some(select) = &view.category {
        dom::listen(select, "change", |_: Event| refilter_from_page());
    }
    // one listener for every card the grid will ever hold
    if let Some(grid) = &view.grid {
        dom::listen(grid, "click", |evt: MouseEvent| {
            if let Some(index) = clicked_card_index(&evt) {
                with_browser(|b| b.select_card(index).is_some());
            }
        });
    }
    BROWSER.with(|cell| cell.replace(Some(VocabularyBrowser::new(view))));

    if let Some(btn) = dom::by_id("pronounceBtn") {
        dom::listen(&btn, "click", |_: MouseEvent| {
            with_browser(|b| b.pronounce_selected());
        });
    }
    if let Some(btn) = dom::by_id("practiceBtn") {
        dom::listen(&btn, "click", |_: MouseEvent| {
            with_browser(|b| b.practice_selected());
        });
    }

    dom::listen(&doc, "keydown", move |evt: KeyboardEvent| {
        let Some(input) = &search else { return };
        if (evt.ctrl_key() || evt.meta_key()) && evt.key() == "f" {
            evt.prevent_default();
            input.focus().ok();
        }
        let node: &web_sys::Node = input;
        let focused = dom::document()
            .and_then(|d| d.active_element())
            .is_some_and(|active| active.is_same_node(Some(node)));
        if evt.key() == "Escape" && focused {
            input.set_value("");
            with_browser(|b| b.clear_search());
            input.blur().ok();
        }
    });

    load();
    log::debug!("vocabulary page initialised");
    Ok(())
}
