//! Multiple-choice quiz flow.
//!
//! [`QuizSession`] is the state machine and owns every piece of per-attempt
//! state. [`QuizController`] pairs a session with a [`QuizView`] so that page
//! bindings (see [`dom`]) only translate DOM events into controller calls.
//!
//! ```text
//! NotStarted -> Loading -> InProgress(i) -> AwaitingNext -> InProgress(i+1) ... -> Finished
//!                  \-> NotStarted (load error)           retake() from anywhere -> NotStarted
//! ```

pub mod dom;

use crate::error::LoadError;
use crate::model::QuizQuestion;

// --- Session state ----------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    NotStarted,
    Loading,
    InProgress,
    AwaitingNext,
    Finished,
}

/// Result of recording an answer; everything the feedback panel needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected: String,
    pub selected_index: Option<usize>,
    pub correct: String,
    pub correct_index: Option<usize>,
    pub is_correct: bool,
    pub is_last: bool,
}

/// Where `next()` landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizStep {
    Question(usize),
    Finished(ScoreSummary),
}

#[derive(Clone, Debug)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current_index: usize,
    score: usize,
    selected_answer: Option<String>,
    phase: QuizPhase,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            selected_answer: None,
            phase: QuizPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }
    pub fn score(&self) -> usize {
        self.score
    }
    pub fn current_index(&self) -> usize {
        self.current_index
    }
    pub fn total(&self) -> usize {
        self.questions.len()
    }
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Has an attempt been started (and not retaken)?
    pub fn started(&self) -> bool {
        !matches!(self.phase, QuizPhase::NotStarted)
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::InProgress | QuizPhase::AwaitingNext => self.questions.get(self.current_index),
            _ => None,
        }
    }

    /// Enter `Loading`. A second start while a load is in flight is refused.
    pub fn begin_loading(&mut self) -> Result<(), LoadError> {
        if self.phase == QuizPhase::Loading {
            return Err(LoadError::AlreadyLoading);
        }
        *self = Self::new();
        self.phase = QuizPhase::Loading;
        Ok(())
    }

    /// Apply a fetched question list. An empty list is a load error and the
    /// session falls back to `NotStarted`.
    pub fn finish_loading(&mut self, questions: Vec<QuizQuestion>) -> Result<(), LoadError> {
        if questions.is_empty() {
            *self = Self::new();
            return Err(LoadError::Empty);
        }
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.selected_answer = None;
        self.phase = QuizPhase::InProgress;
        Ok(())
    }

    pub fn fail_loading(&mut self) {
        *self = Self::new();
    }

    /// Record the learner's choice. Only the first answer per question counts;
    /// any later call returns `None` without touching the score.
    pub fn answer(&mut self, option: &str) -> Option<AnswerOutcome> {
        if self.phase != QuizPhase::InProgress || self.selected_answer.is_some() {
            return None;
        }
        let question = self.questions.get(self.current_index)?;
        let is_correct = option == question.correct;
        let outcome = AnswerOutcome {
            selected: option.to_owned(),
            selected_index: question.options.iter().position(|o| o == option),
            correct: question.correct.clone(),
            correct_index: question.correct_index(),
            is_correct,
            is_last: self.current_index + 1 >= self.questions.len(),
        };
        if is_correct {
            self.score += 1;
        }
        self.selected_answer = Some(outcome.selected.clone());
        self.phase = QuizPhase::AwaitingNext;
        Some(outcome)
    }

    /// Answer by option position (keyboard shortcuts).
    pub fn answer_index(&mut self, index: usize) -> Option<AnswerOutcome> {
        let option = self.current_question()?.options.get(index)?.clone();
        self.answer(&option)
    }

    /// Advance past the current question.
    pub fn next(&mut self) -> Option<QuizStep> {
        if !matches!(self.phase, QuizPhase::InProgress | QuizPhase::AwaitingNext) {
            return None;
        }
        self.current_index += 1;
        self.selected_answer = None;
        if self.current_index >= self.questions.len() {
            self.current_index = self.questions.len();
            self.phase = QuizPhase::Finished;
            Some(QuizStep::Finished(self.summary()))
        } else {
            self.phase = QuizPhase::InProgress;
            Some(QuizStep::Question(self.current_index))
        }
    }

    pub fn retake(&mut self) {
        *self = Self::new();
    }

    /// Width of the progress bar, in percent, for the current question.
    pub fn progress_percent(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.current_index + 1) as f64 / self.questions.len() as f64 * 100.0
    }

    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary::new(self.score, self.questions.len())
    }
}

// --- Results ----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackTier {
    Excellent,
    Good,
    KeepLearning,
    KeepTrying,
}

impl FeedbackTier {
    pub fn for_percentage(percentage: u32) -> Self {
        if percentage >= 80 {
            FeedbackTier::Excellent
        } else if percentage >= 60 {
            FeedbackTier::Good
        } else if percentage >= 40 {
            FeedbackTier::KeepLearning
        } else {
            FeedbackTier::KeepTrying
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FeedbackTier::Excellent => "🎉",
            FeedbackTier::Good => "👍",
            FeedbackTier::KeepLearning => "📚",
            FeedbackTier::KeepTrying => "💪",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FeedbackTier::Excellent => "Luar Biasa!",
            FeedbackTier::Good => "Bagus!",
            FeedbackTier::KeepLearning => "Terus Belajar!",
            FeedbackTier::KeepTrying => "Terus Berusaha!",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FeedbackTier::Excellent => {
                "Performa yang sangat baik! Anda memiliki pemahaman yang bagus tentang kosakata Bahasa Mandarin."
            }
            FeedbackTier::Good => {
                "Kerja bagus! Terus berlatih untuk meningkatkan kemampuan kosakata Bahasa Mandarin Anda."
            }
            FeedbackTier::KeepLearning => {
                "Anda sudah membuat kemajuan! Tinjau kembali kosakata dan coba lagi."
            }
            FeedbackTier::KeepTrying => {
                "Jangan menyerah! Latihan membuat sempurna. Tinjau kosakata dan ambil kuis lagi."
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: FeedbackTier,
}

impl ScoreSummary {
    pub fn new(score: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (score as f64 / total as f64 * 100.0).round() as u32
        };
        Self { score, total, percentage, tier: FeedbackTier::for_percentage(percentage) }
    }
}

/// Contents of the per-question feedback panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub is_correct: bool,
    pub chinese: String,
    pub pinyin: String,
    pub correct_answer: String,
    pub continue_label: &'static str,
}

impl Feedback {
    pub fn icon(&self) -> &'static str {
        if self.is_correct { "🎉" } else { "😔" }
    }
    pub fn title(&self) -> &'static str {
        if self.is_correct { "Benar!" } else { "Salah" }
    }
    pub fn title_color(&self) -> &'static str {
        if self.is_correct { "#48bb78" } else { "#f56565" }
    }
}

pub const NEXT_QUESTION_LABEL: &str = "Pertanyaan Selanjutnya";
pub const SEE_RESULTS_LABEL: &str = "Lihat Hasil";
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load quiz questions. Please try again.";

// --- Keyboard ---------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizKey {
    /// Zero-based option index from digit keys 1-4.
    Select(usize),
    Pronounce,
}

impl QuizKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "1" | "2" | "3" | "4" => key.parse::<usize>().ok().map(|n| QuizKey::Select(n - 1)),
            " " | "Enter" => Some(QuizKey::Pronounce),
            _ => None,
        }
    }
}

// --- View binding -----------------------------------------------------------

/// Everything the quiz needs from the page. Implementations skip silently
/// when their elements are missing.
pub trait QuizView {
    fn show_start(&mut self);
    fn show_loading(&mut self);
    fn show_error(&mut self, message: &str);
    /// Render question `index` of `total` with freshly built option controls.
    fn show_question(&mut self, index: usize, total: usize, question: &QuizQuestion, progress_percent: f64);
    /// Disable all options; highlight the correct one and, if wrong, the pick.
    fn mark_answer(&mut self, outcome: &AnswerOutcome);
    /// Ask the page to call [`QuizController::reveal_feedback`] after `delay_ms`.
    fn schedule_feedback(&mut self, delay_ms: u32);
    fn show_feedback(&mut self, feedback: &Feedback);
    fn hide_feedback(&mut self);
    fn show_results(&mut self, summary: &ScoreSummary);
    fn reset_progress(&mut self);
    fn pronounce(&mut self, text: &str);
}

pub struct QuizController<V: QuizView> {
    session: QuizSession,
    view: V,
    feedback_delay_ms: u32,
}

impl<V: QuizView> QuizController<V> {
    pub fn new(view: V, feedback_delay_ms: u32) -> Self {
        Self { session: QuizSession::new(), view, feedback_delay_ms }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// First half of `start()`: enter `Loading` before the fetch is issued.
    pub fn begin_start(&mut self) -> Result<(), LoadError> {
        self.session.begin_loading().inspect_err(|e| {
            log::debug!("ignoring start: {e}");
        })?;
        self.view.show_loading();
        Ok(())
    }

    /// Second half of `start()`: apply the fetch result.
    pub fn finish_start(&mut self, fetched: Result<Vec<QuizQuestion>, LoadError>) -> Result<(), LoadError> {
        if self.session.phase() != QuizPhase::Loading {
            log::debug!("discarding quiz load that finished after a reset");
            return Ok(());
        }
        let loaded = fetched.and_then(|qs| self.session.finish_loading(qs));
        match loaded {
            Ok(()) => {
                log::info!("quiz loaded with {} questions", self.session.total());
                self.render_current();
                Ok(())
            }
            Err(e) => {
                log::error!("Error starting quiz: {e}");
                self.session.fail_loading();
                self.view.show_start();
                self.view.show_error(LOAD_ERROR_MESSAGE);
                Err(e)
            }
        }
    }

    fn render_current(&mut self) {
        let index = self.session.current_index();
        let total = self.session.total();
        let progress = self.session.progress_percent();
        if let Some(question) = self.session.questions().get(index) {
            self.view.show_question(index, total, question, progress);
        }
    }

    pub fn answer(&mut self, option: &str) -> Option<AnswerOutcome> {
        let outcome = self.session.answer(option)?;
        self.lock_answer(&outcome);
        Some(outcome)
    }

    pub fn answer_index(&mut self, index: usize) -> Option<AnswerOutcome> {
        let outcome = self.session.answer_index(index)?;
        self.lock_answer(&outcome);
        Some(outcome)
    }

    fn lock_answer(&mut self, outcome: &AnswerOutcome) {
        self.view.mark_answer(outcome);
        self.view.schedule_feedback(self.feedback_delay_ms);
    }

    /// Timer callback after an answer; no-op if the session moved on.
    pub fn reveal_feedback(&mut self) {
        if self.session.phase() != QuizPhase::AwaitingNext {
            return;
        }
        let Some(question) = self.session.current_question() else { return };
        let is_correct = self.session.selected_answer() == Some(question.correct.as_str());
        let is_last = self.session.current_index() + 1 >= self.session.total();
        let feedback = Feedback {
            is_correct,
            chinese: question.chinese.clone(),
            pinyin: question.pinyin.clone(),
            correct_answer: question.correct.clone(),
            continue_label: if is_last { SEE_RESULTS_LABEL } else { NEXT_QUESTION_LABEL },
        };
        self.view.show_feedback(&feedback);
    }

    pub fn next(&mut self) -> Option<QuizStep> {
        self.view.hide_feedback();
        let step = self.session.next()?;
        match &step {
            QuizStep::Question(_) => self.render_current(),
            QuizStep::Finished(summary) => {
                log::info!("quiz finished: {}/{} ({}%)", summary.score, summary.total, summary.percentage);
                self.view.show_results(summary);
            }
        }
        Some(step)
    }

    pub fn retake(&mut self) {
        self.session.retake();
        self.view.show_start();
        self.view.reset_progress();
    }

    pub fn pronounce_current(&mut self) {
        if let Some(text) = self.session.current_question().map(|q| q.chinese.clone()) {
            self.view.pronounce(&text);
        }
    }

    /// Keyboard dispatch. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if !self.session.started() {
            return false;
        }
        match QuizKey::from_key(key) {
            Some(QuizKey::Select(i)) => {
                if self.session.phase() == QuizPhase::InProgress {
                    self.answer_index(i);
                }
                true
            }
            Some(QuizKey::Pronounce) => {
                self.pronounce_current();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(chinese: &str, correct: &str, options: &[&str]) -> QuizQuestion {
        QuizQuestion {
            chinese: chinese.into(),
            pinyin: format!("{chinese}-py"),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct: correct.into(),
            question: None,
        }
    }

    fn five_questions() -> Vec<QuizQuestion> {
        vec![
            question("你好", "Halo", &["Halo", "Air", "Makan"]),
            question("水", "Air", &["Halo", "Air", "Makan"]),
            question("吃", "Makan", &["Makan", "Tidur", "Air"]),
            question("睡觉", "Tidur", &["Makan", "Tidur", "Air"]),
            question("谢谢", "Terima kasih", &["Maaf", "Terima kasih", "Halo"]),
        ]
    }

    #[derive(Default)]
    struct RecordingView {
        events: Vec<String>,
        scheduled: Vec<u32>,
        feedback: Option<Feedback>,
        results: Option<ScoreSummary>,
    }

    impl QuizView for RecordingView {
        fn show_start(&mut self) {
            self.events.push("start".into());
        }
        fn show_loading(&mut self) {
            self.events.push("loading".into());
        }
        fn show_error(&mut self, message: &str) {
            self.events.push(format!("error:{message}"));
        }
        fn show_question(&mut self, index: usize, total: usize, question: &QuizQuestion, progress: f64) {
            self.events.push(format!("question:{index}/{total}:{}:{progress:.0}", question.chinese));
        }
        fn mark_answer(&mut self, outcome: &AnswerOutcome) {
            self.events.push(format!("mark:{:?}:{:?}", outcome.correct_index, outcome.selected_index));
        }
        fn schedule_feedback(&mut self, delay_ms: u32) {
            self.scheduled.push(delay_ms);
        }
        fn show_feedback(&mut self, feedback: &Feedback) {
            self.feedback = Some(feedback.clone());
        }
        fn hide_feedback(&mut self) {}
        fn show_results(&mut self, summary: &ScoreSummary) {
            self.results = Some(*summary);
        }
        fn reset_progress(&mut self) {
            self.events.push("reset-progress".into());
        }
        fn pronounce(&mut self, text: &str) {
            self.events.push(format!("speak:{text}"));
        }
    }

    fn started(questions: Vec<QuizQuestion>) -> QuizController<RecordingView> {
        let mut quiz = QuizController::new(RecordingView::default(), 1000);
        quiz.begin_start().unwrap();
        quiz.finish_start(Ok(questions)).unwrap();
        quiz
    }

    #[test]
    fn mixed_answers_score_three_of_five() {
        let mut quiz = started(five_questions());
        let picks = ["Halo", "Makan", "Makan", "Tidur", "Maaf"];
        for (i, pick) in picks.iter().enumerate() {
            assert_eq!(quiz.session().phase(), QuizPhase::InProgress);
            quiz.answer(pick).unwrap();
            quiz.reveal_feedback();
            let step = quiz.next().unwrap();
            if i < 4 {
                assert_eq!(step, QuizStep::Question(i + 1));
            }
        }
        let summary = quiz.view().results.unwrap();
        assert_eq!(summary.score, 3);
        assert_eq!(summary.percentage, 60);
        assert_eq!(summary.tier, FeedbackTier::Good);
        assert_eq!(summary.tier.title(), "Bagus!");
        assert_eq!(quiz.session().phase(), QuizPhase::Finished);
        assert_eq!(quiz.session().current_index(), 5);
    }

    #[test]
    fn second_answer_is_ignored() {
        let mut quiz = started(five_questions());
        assert!(quiz.answer("Halo").is_some());
        assert!(quiz.answer("Halo").is_none());
        assert!(quiz.answer("Air").is_none());
        assert_eq!(quiz.session().score(), 1);
        assert_eq!(quiz.view().scheduled, vec![1000]);
        assert_eq!(quiz.session().selected_answer(), Some("Halo"));
    }

    #[test]
    fn wrong_answer_marks_both_options() {
        let mut quiz = started(five_questions());
        let outcome = quiz.answer("Makan").unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.correct_index, Some(0));
        assert_eq!(outcome.selected_index, Some(2));
        quiz.reveal_feedback();
        let feedback = quiz.view().feedback.clone().unwrap();
        assert_eq!(feedback.title(), "Salah");
        assert_eq!(feedback.correct_answer, "Halo");
        assert_eq!(feedback.continue_label, NEXT_QUESTION_LABEL);
    }

    #[test]
    fn next_on_last_question_finishes() {
        let mut quiz = started(vec![question("水", "Air", &["Air", "Api"])]);
        let outcome = quiz.answer("Air").unwrap();
        assert!(outcome.is_last);
        quiz.reveal_feedback();
        assert_eq!(quiz.view().feedback.as_ref().unwrap().continue_label, SEE_RESULTS_LABEL);
        assert!(matches!(quiz.next(), Some(QuizStep::Finished(_))));
        assert_eq!(quiz.session().phase(), QuizPhase::Finished);
        assert!(quiz.next().is_none());
    }

    #[test]
    fn empty_question_list_stays_not_started() {
        let mut quiz = QuizController::new(RecordingView::default(), 1000);
        quiz.begin_start().unwrap();
        assert_eq!(quiz.finish_start(Ok(vec![])), Err(LoadError::Empty));
        assert_eq!(quiz.session().phase(), QuizPhase::NotStarted);
        assert!(!quiz.view().events.iter().any(|e| e.starts_with("question")));
        assert!(quiz.view().events.contains(&format!("error:{LOAD_ERROR_MESSAGE}")));
    }

    #[test]
    fn failed_fetch_returns_to_start() {
        let mut quiz = QuizController::new(RecordingView::default(), 1000);
        quiz.begin_start().unwrap();
        let err = quiz.finish_start(Err(LoadError::Http { status: 400 })).unwrap_err();
        assert_eq!(err, LoadError::Http { status: 400 });
        assert!(!quiz.session().started());
    }

    #[test]
    fn reentrant_start_is_refused() {
        let mut quiz = QuizController::new(RecordingView::default(), 1000);
        quiz.begin_start().unwrap();
        assert_eq!(quiz.begin_start(), Err(LoadError::AlreadyLoading));
        assert_eq!(quiz.view().events, vec!["loading"]);
    }

    #[test]
    fn retake_resets_every_field() {
        let mut quiz = started(five_questions());
        quiz.answer("Halo");
        quiz.retake();
        let s = quiz.session();
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.score(), 0);
        assert_eq!(s.selected_answer(), None);
        assert!(s.questions().is_empty());
        assert_eq!(s.phase(), QuizPhase::NotStarted);
        assert!(quiz.view().events.ends_with(&["start".to_string(), "reset-progress".to_string()]));
    }

    #[test]
    fn late_feedback_timer_after_retake_is_ignored() {
        let mut quiz = started(five_questions());
        quiz.answer("Halo");
        quiz.retake();
        quiz.reveal_feedback();
        assert!(quiz.view().feedback.is_none());
    }

    #[test]
    fn progress_reflects_current_question() {
        let mut quiz = started(five_questions());
        assert_eq!(quiz.session().progress_percent(), 20.0);
        quiz.answer("Halo");
        quiz.next();
        assert_eq!(quiz.session().progress_percent(), 40.0);
        assert!(quiz.view().events.contains(&"question:1/5:水:40".to_string()));
    }

    #[test]
    fn keyboard_selects_and_pronounces() {
        let mut quiz = started(five_questions());
        assert!(quiz.handle_key(" "));
        assert!(quiz.handle_key("2"));
        assert_eq!(quiz.session().selected_answer(), Some("Air"));
        // locked after the first pick
        assert!(quiz.handle_key("1"));
        assert_eq!(quiz.session().score(), 0);
        assert!(!quiz.handle_key("x"));
        assert!(quiz.view().events.contains(&"speak:你好".to_string()));
    }

    #[test]
    fn keys_are_ignored_before_start() {
        let mut quiz = QuizController::new(RecordingView::default(), 1000);
        assert!(!quiz.handle_key("1"));
        assert!(!quiz.handle_key("Enter"));
        assert!(quiz.view().events.is_empty());
    }

    #[test]
    fn out_of_range_digit_is_noop() {
        let mut quiz = started(vec![question("水", "Air", &["Air", "Api"])]);
        assert!(quiz.handle_key("4"));
        assert_eq!(quiz.session().phase(), QuizPhase::InProgress);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(FeedbackTier::for_percentage(100), FeedbackTier::Excellent);
        assert_eq!(FeedbackTier::for_percentage(80), FeedbackTier::Excellent);
        assert_eq!(FeedbackTier::for_percentage(79), FeedbackTier::Good);
        assert_eq!(FeedbackTier::for_percentage(40), FeedbackTier::KeepLearning);
        assert_eq!(FeedbackTier::for_percentage(39), FeedbackTier::KeepTrying);
        assert_eq!(ScoreSummary::new(2, 3).percentage, 67);
        assert_eq!(ScoreSummary::new(0, 0).percentage, 0);
    }

    #[test]
    fn digit_keys_map_to_zero_based_options() {
        assert_eq!(QuizKey::from_key("1"), Some(QuizKey::Select(0)));
        assert_eq!(QuizKey::from_key("4"), Some(QuizKey::Select(3)));
        assert_eq!(QuizKey::from_key("5"), None);
        assert_eq!(QuizKey::from_key("Enter"), Some(QuizKey::Pronounce));
    }
}
