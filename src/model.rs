//! Wire types for the JSON endpoints the pages consume.
//!
//! All of these are read-only copies of server data; nothing on the client
//! mutates them after deserialization.

use serde::{Deserialize, Serialize};

/// One vocabulary entry as served by `/api/vocabulary`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub chinese: String,
    pub pinyin: String,
    pub indonesian: String,
    pub category: String,
}

impl VocabularyWord {
    pub fn new(chinese: &str, pinyin: &str, indonesian: &str, category: &str) -> Self {
        Self {
            chinese: chinese.to_owned(),
            pinyin: pinyin.to_owned(),
            indonesian: indonesian.to_owned(),
            category: category.to_owned(),
        }
    }

    /// `needle` must already be lowercased. An empty needle matches everything.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.chinese.to_lowercase().contains(needle)
            || self.pinyin.to_lowercase().contains(needle)
            || self.indonesian.to_lowercase().contains(needle)
    }
}

/// One multiple-choice question as served by `/api/quiz`.
///
/// `correct` is expected to equal one of `options`; option order is kept as
/// served.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub chinese: String,
    pub pinyin: String,
    pub options: Vec<String>,
    pub correct: String,
    /// Human-readable prompt; the page renders chinese/pinyin instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

impl QuizQuestion {
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct)
    }
}

/// Body of `POST /api/speak`.
#[derive(Clone, Debug, Serialize)]
pub struct SpeakRequest<'a> {
    pub text: &'a str,
}

/// Response of `POST /api/speak`. Error responses omit `success` entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SpeakResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub fallback: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_question_accepts_optional_prompt() {
        let json = r#"{"question":"Apa arti dari '你好' (nǐ hǎo)?","options":["Terima kasih","Halo","Air"],
            "correct":"Halo","chinese":"你好","pinyin":"nǐ hǎo"}"#;
        let q: QuizQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_index(), Some(1));
        assert!(q.question.is_some());

        let bare = r#"{"options":["a","b"],"correct":"b","chinese":"水","pinyin":"shuǐ"}"#;
        let q: QuizQuestion = serde_json::from_str(bare).unwrap();
        assert_eq!(q.question, None);
    }

    #[test]
    fn speak_response_error_shape_defaults_success_false() {
        let r: SpeakResponse =
            serde_json::from_str(r#"{"error":"Google TTS tidak tersedia","fallback":true}"#).unwrap();
        assert!(!r.success);
        assert!(r.fallback);
        assert_eq!(r.audio, None);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let w = VocabularyWord::new("你好", "Nǐ hǎo", "Halo", "greetings");
        assert!(w.matches_search("nǐ"));
        assert!(w.matches_search("halo"));
        assert!(w.matches_search("你"));
        assert!(!w.matches_search("air"));
        assert!(w.matches_search(""));
    }
}
