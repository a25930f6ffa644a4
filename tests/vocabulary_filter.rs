// Integration tests for the vocabulary filter pipeline.
// These tests are native-friendly and avoid wasm/browser APIs.

use kosakata_web::VocabularyWord;
use kosakata_web::vocabulary::{ALL_CATEGORIES, VocabularyViewState, filter_words};

const FIXTURE: &str = r#"[
    {"chinese": "做饭", "pinyin": "zuòfàn", "indonesian": "memasak", "category": "hobi"},
    {"chinese": "画画", "pinyin": "huàhuà", "indonesian": "melukis", "category": "hobi"},
    {"chinese": "看电影", "pinyin": "kàn diànyǐng", "indonesian": "menonton film", "category": "hobi"},
    {"chinese": "老师", "pinyin": "lǎoshī", "indonesian": "guru", "category": "profesi"},
    {"chinese": "医生", "pinyin": "yīshēng", "indonesian": "dokter", "category": "profesi"},
    {"chinese": "牙医", "pinyin": "yáyī", "indonesian": "dokter gigi", "category": "profesi"}
]"#;

fn fixture() -> Vec<VocabularyWord> {
    serde_json::from_str(FIXTURE).expect("fixture parses")
}

#[test]
fn fixture_round_trips_through_serde() {
    let words = fixture();
    assert_eq!(words.len(), 6);
    assert_eq!(words[3], VocabularyWord::new("老师", "lǎoshī", "guru", "profesi"));
}

#[test]
fn translation_search_spans_categories_until_narrowed() {
    let words = fixture();
    let dokter = filter_words(&words, "DOKTER", ALL_CATEGORIES);
    assert_eq!(dokter.len(), 2);
    assert!(filter_words(&words, "dokter", "hobi").is_empty());
}

#[test]
fn hanzi_substring_matches() {
    let words = fixture();
    let hits = filter_words(&words, "医", ALL_CATEGORIES);
    let hanzi: Vec<&str> = hits.iter().map(|w| w.chinese.as_str()).collect();
    assert_eq!(hanzi, vec!["医生", "牙医"]);
}

#[test]
fn filtered_order_follows_source_order() {
    let words = fixture();
    let hits = filter_words(&words, "", "hobi");
    let positions: Vec<usize> = hits
        .iter()
        .map(|h| words.iter().position(|w| w == h).unwrap())
        .collect();
    assert!(positions.windows(2).all(|p| p[0] < p[1]));
}

#[test]
fn unknown_category_yields_nothing() {
    assert!(filter_words(&fixture(), "", "makanan").is_empty());
}

#[test]
fn view_state_stats_track_filtered_list() {
    let mut state = VocabularyViewState::new();
    state.set_words(fixture());
    assert_eq!(state.stats().total, 6);
    state.set_filters("", "profesi");
    let stats = state.stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.category_label, "Profesi");
    assert!(state.filtered().iter().all(|w| state.all().contains(w)));
}
