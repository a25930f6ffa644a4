//! Searchable, filterable vocabulary grid.
//!
//! The filtered list is never stored independently: [`VocabularyViewState`]
//! recomputes it from the full list and the two filter inputs on every change.

pub mod dom;

use crate::error::LoadError;
use crate::model::VocabularyWord;

pub const ALL_CATEGORIES: &str = "all";
pub const ALL_CATEGORIES_LABEL: &str = "Semua";
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load vocabulary data";

/// Words matching both the free-text search and the category.
///
/// Search is a case-insensitive substring match on the Chinese, pinyin and
/// Indonesian fields; `"all"` disables the category filter.
pub fn filter_words(all: &[VocabularyWord], search_term: &str, category: &str) -> Vec<VocabularyWord> {
    let needle = search_term.to_lowercase();
    all.iter()
        .filter(|w| w.matches_search(&needle))
        .filter(|w| category == ALL_CATEGORIES || w.category == category)
        .cloned()
        .collect()
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Label shown in the stats bar for the active category.
pub fn category_label(category: &str) -> String {
    if category == ALL_CATEGORIES {
        ALL_CATEGORIES_LABEL.to_string()
    } else {
        capitalize_first(category)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocabularyStats {
    pub total: usize,
    pub category_label: String,
}

#[derive(Clone, Debug)]
pub struct VocabularyViewState {
    all: Vec<VocabularyWord>,
    filtered: Vec<VocabularyWord>,
    search_term: String,
    selected_category: String,
}

impl Default for VocabularyViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabularyViewState {
    pub fn new() -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            selected_category: ALL_CATEGORIES.to_string(),
        }
    }

    pub fn all(&self) -> &[VocabularyWord] {
        &self.all
    }
    pub fn filtered(&self) -> &[VocabularyWord] {
        &self.filtered
    }
    pub fn search_term(&self) -> &str {
        &self.search_term
    }
    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn set_words(&mut self, words: Vec<VocabularyWord>) {
        self.all = words;
        self.refilter();
    }

    pub fn set_filters(&mut self, search_term: &str, category: &str) {
        self.search_term = search_term.to_string();
        self.selected_category = if category.is_empty() {
            ALL_CATEGORIES.to_string()
        } else {
            category.to_string()
        };
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = filter_words(&self.all, &self.search_term, &self.selected_category);
    }

    pub fn stats(&self) -> VocabularyStats {
        VocabularyStats {
            total: self.filtered.len(),
            category_label: category_label(&self.selected_category),
        }
    }
}

// --- View binding -----------------------------------------------------------

pub trait VocabularyView {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    /// Replace the grid with one card per word, in order.
    fn render_cards(&mut self, words: &[VocabularyWord]);
    /// Clear the grid and show the "no results" state.
    fn show_no_results(&mut self);
    fn update_stats(&mut self, stats: &VocabularyStats);
    fn populate_categories(&mut self, categories: &[String]);
    fn show_error(&mut self, message: &str);
    fn open_detail(&mut self, word: &VocabularyWord);
    fn close_detail(&mut self);
    fn pronounce(&mut self, text: &str);
    fn go_to_practice(&mut self);
}

pub struct VocabularyBrowser<V: VocabularyView> {
    state: VocabularyViewState,
    categories: Vec<String>,
    selected: Option<VocabularyWord>,
    words_loading: bool,
    view: V,
}

impl<V: VocabularyView> VocabularyBrowser<V> {
    pub fn new(view: V) -> Self {
        Self {
            state: VocabularyViewState::new(),
            categories: Vec::new(),
            selected: None,
            words_loading: false,
            view,
        }
    }

    pub fn state(&self) -> &VocabularyViewState {
        &self.state
    }
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
    pub fn selected(&self) -> Option<&VocabularyWord> {
        self.selected.as_ref()
    }
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn begin_load_words(&mut self) -> Result<(), LoadError> {
        if self.words_loading {
            log::debug!("vocabulary load already in flight");
            return Err(LoadError::AlreadyLoading);
        }
        self.words_loading = true;
        self.view.show_loading();
        Ok(())
    }

    pub fn finish_load_words(&mut self, fetched: Result<Vec<VocabularyWord>, LoadError>) -> Result<(), LoadError> {
        self.words_loading = false;
        self.view.hide_loading();
        match fetched {
            Ok(words) => {
                log::info!("loaded {} vocabulary words", words.len());
                self.state.set_words(words);
                self.render();
                Ok(())
            }
            Err(e) => {
                log::error!("Error loading vocabulary: {e}");
                self.view.show_error(LOAD_ERROR_MESSAGE);
                Err(e)
            }
        }
    }

    /// Category failures are logged only; the filter keeps its "all" option.
    pub fn finish_load_categories(&mut self, fetched: Result<Vec<String>, LoadError>) {
        match fetched {
            Ok(categories) => {
                self.view.populate_categories(&categories);
                self.categories = categories;
            }
            Err(e) => log::error!("Error loading categories: {e}"),
        }
    }

    pub fn apply_filter(&mut self, search_term: &str, category: &str) {
        self.state.set_filters(search_term, category);
        self.render();
    }

    pub fn clear_search(&mut self) {
        let category = self.state.selected_category().to_string();
        self.apply_filter("", &category);
    }

    fn render(&mut self) {
        if self.state.filtered().is_empty() {
            self.view.show_no_results();
        } else {
            self.view.render_cards(self.state.filtered());
        }
        self.view.update_stats(&self.state.stats());
    }

    /// Open the detail view for the card at `index` in the filtered list.
    pub fn select_card(&mut self, index: usize) -> Option<&VocabularyWord> {
        let word = self.state.filtered().get(index)?.clone();
        self.view.open_detail(&word);
        self.selected = Some(word);
        self.selected.as_ref()
    }

    pub fn pronounce_selected(&mut self) {
        if let Some(text) = self.selected.as_ref().map(|w| w.chinese.clone()) {
            self.view.pronounce(&text);
        }
    }

    pub fn practice_selected(&mut self) {
        if self.selected.is_some() {
            self.view.close_detail();
            self.view.go_to_practice();
        }
    }
}
