//! Binds [`QuizController`] to the quiz page markup.
//!
//! Element ids (`quizStart`, `quizProgress`, `quizContainer`, `quizResults`,
//! `quizLoading`, `progressFill`, `optionsContainer`, `feedbackModal`, ...)
//! are the contract with the page template.

use super::{AnswerOutcome, Feedback, QuizController, QuizKey, QuizView, ScoreSummary};
use crate::animation::CountUp;
use crate::config;
use crate::dom;
use crate::model::QuizQuestion;
use crate::speech;
use crate::ui;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlElement, KeyboardEvent, MouseEvent};

const FEEDBACK_MODAL: &str = "feedbackModal";

thread_local! {
    static QUIZ: RefCell<Option<QuizController<DomQuizView>>> = const { RefCell::new(None) };
}

/// Run `f` against the page's controller. Never hold this across an await.
fn with_quiz<R>(f: impl FnOnce(&mut QuizController<DomQuizView>) -> R) -> Option<R> {
    QUIZ.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Page elements, looked up once. Any of them may be absent.
pub struct DomQuizView {
    start: Option<HtmlElement>,
    progress: Option<HtmlElement>,
    container: Option<HtmlElement>,
    results: Option<HtmlElement>,
    loading: Option<HtmlElement>,
    progress_fill: Option<HtmlElement>,
    current_question: Option<HtmlElement>,
    total_questions: Option<HtmlElement>,
    question_chinese: Option<HtmlElement>,
    question_pinyin: Option<HtmlElement>,
    options: Option<HtmlElement>,
    final_score: Option<HtmlElement>,
    score_percentage: Option<HtmlElement>,
    results_icon: Option<HtmlElement>,
    results_title: Option<HtmlElement>,
    results_message: Option<HtmlElement>,
}

fn set_text(el: Option<&HtmlElement>, text: &str) {
    if let Some(el) = el {
        el.set_text_content(Some(text));
    }
}

fn show(el: Option<&HtmlElement>) {
    if let Some(el) = el {
        dom::set_display(el, "block");
    }
}

impl DomQuizView {
    pub fn from_document() -> Self {
        Self {
            start: dom::by_id("quizStart"),
            progress: dom::by_id("quizProgress"),
            container: dom::by_id("quizContainer"),
            results: dom::by_id("quizResults"),
            loading: dom::by_id("quizLoading"),
            progress_fill: dom::by_id("progressFill"),
            current_question: dom::by_id("currentQuestion"),
            total_questions: dom::by_id("totalQuestions"),
            question_chinese: dom::by_id("questionChinese"),
            question_pinyin: dom::by_id("questionPinyin"),
            options: dom::by_id("optionsContainer"),
            final_score: dom::by_id("finalScore"),
            score_percentage: dom::by_id("scorePercentage"),
            results_icon: dom::by_id("resultsIcon"),
            results_title: dom::by_id("resultsTitle"),
            results_message: dom::by_id("resultsMessage"),
        }
    }

    fn hide_all_sections(&self) {
        for section in [
            self.start.as_ref(),
            self.progress.as_ref(),
            self.container.as_ref(),
            self.results.as_ref(),
            self.loading.as_ref(),
        ]
            .into_iter()
            .flatten()
        {
            dom::set_display(section, "none");
        }
    }

    fn set_progress_width(&self, percent: f64) {
        if let Some(fill) = &self.progress_fill {
            dom::set_style(fill, "width", &format!("{percent}%"));
        }
    }

    fn build_options(&self, options: &[String]) {
        let (Some(container), Some(doc)) = (&self.options, dom::document()) else {
            return;
        };
        container.set_inner_html("");
        for option in options {
            let Ok(button) = doc.create_element("button") else { continue };
            button.set_class_name("option-btn");
            button.set_text_content(Some(option));
            button.set_attribute("data-answer", option).ok();
            container.append_child(&button).ok();
        }
    }
}

impl QuizView for DomQuizView {
    fn show_start(&mut self) {
        self.hide_all_sections();
        show(self.start.as_ref());
    }

    fn show_loading(&mut self) {
        self.hide_all_sections();
        show(self.loading.as_ref());
    }

    fn show_error(&mut self, message: &str) {
        if let Some(start) = &self.start {
            ui::show_error(message, start);
        }
    }

    fn show_question(&mut self, index: usize, total: usize, question: &QuizQuestion, progress_percent: f64) {
        if index == 0 {
            self.hide_all_sections();
            show(self.progress.as_ref());
            show(self.container.as_ref());
            set_text(self.total_questions.as_ref(), &total.to_string());
        }
        self.set_progress_width(progress_percent);
        set_text(self.current_question.as_ref(), &(index + 1).to_string());
        set_text(self.question_chinese.as_ref(), &question.chinese);
        set_text(self.question_pinyin.as_ref(), &question.pinyin);
        self.build_options(&question.options);
    }

    fn mark_answer(&mut self, outcome: &AnswerOutcome) {
        let Some(container) = &self.options else { return };
        for (i, btn) in dom::query_all_in(container, ".option-btn").into_iter().enumerate() {
            if let Some(button) = btn.dyn_ref::<HtmlButtonElement>() {
                button.set_disabled(true);
            }
            let answer = btn.get_attribute("data-answer").unwrap_or_default();
            if answer == outcome.correct {
                dom::add_class(&btn, "correct");
            } else if !outcome.is_correct && outcome.selected_index == Some(i) {
                dom::add_class(&btn, "incorrect");
            }
        }
    }

    fn schedule_feedback(&mut self, delay_ms: u32) {
        dom::set_timeout(delay_ms, || {
            with_quiz(|q| q.reveal_feedback());
        });
    }

    fn show_feedback(&mut self, feedback: &Feedback) {
        dom::set_text_id("feedbackIcon", feedback.icon());
        if let Some(title) = dom::by_id("feedbackTitle") {
            title.set_text_content(Some(feedback.title()));
            dom::set_style(&title, "color", feedback.title_color());
        }
        dom::set_text_id("feedbackChinese", &feedback.chinese);
        dom::set_text_id("feedbackPinyin", &feedback.pinyin);
        dom::set_text_id("feedbackIndonesian", &feedback.correct_answer);
        dom::set_text_id("nextQuestionBtn", feedback.continue_label);
        ui::open_modal(FEEDBACK_MODAL);
    }

    fn hide_feedback(&mut self) {
        ui::close_modal(FEEDBACK_MODAL);
    }

    fn show_results(&mut self, summary: &ScoreSummary) {
        self.hide_all_sections();
        show(self.results.as_ref());
        set_text(self.final_score.as_ref(), &summary.score.to_string());
        set_text(self.score_percentage.as_ref(), &format!("{}%", summary.percentage));
        set_text(self.results_icon.as_ref(), summary.tier.icon());
        set_text(self.results_title.as_ref(), summary.tier.title());
        set_text(self.results_message.as_ref(), summary.tier.message());

        if let Some(counter) = dom::query(".score-number").and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
            let t = config::timings();
            let interval = CountUp::interval_ms(t.score_count_ms, t.score_count_steps);
            dom::run_count_up(counter, CountUp::new(summary.score as u64, t.score_count_steps), interval);
        }
    }

    fn reset_progress(&mut self) {
        self.set_progress_width(0.0);
    }

    fn pronounce(&mut self, text: &str) {
        speech::speak_detached(text.to_owned());
    }
}

/// Kick off `start()`: enter loading synchronously, fetch, then apply.
pub fn start() {
    if !matches!(with_quiz(|q| q.begin_start()), Some(Ok(()))) {
        return;
    }
    let url = config::current().endpoints.quiz;
    wasm_bindgen_futures::spawn_local(async move {
        let fetched = dom::fetch_json::<Vec<QuizQuestion>>(&url).await;
        with_quiz(|q| q.finish_start(fetched).ok());
    });
}

pub fn retake() {
    with_quiz(|q| q.retake());
}

pub fn next() {
    with_quiz(|q| q.next());
}

/// Answer carried by the option button `el` sits in.
pub fn answer_of(el: &Element) -> Option<String> {
    el.closest(".option-btn").ok()??.get_attribute("data-answer")
}

fn clicked_answer(evt: &MouseEvent) -> Option<String> {
    answer_of(&evt.target()?.dyn_into::<Element>().ok()?)
}

fn on_click(id: &str, action: impl Fn() + 'static) {
    if let Some(el) = dom::by_id(id) {
        dom::listen(&el, "click", move |_: MouseEvent| action());
    }
}

/// Quiz page entry point.
pub fn init_quiz_page() -> Result<(), JsValue> {
    let doc = dom::require_document()?;
    let view = DomQuizView::from_document();
    let delay = config::timings().feedback_delay_ms;
    QUIZ.with(|cell| cell.replace(Some(QuizController::new(view, delay))));

    on_click("startQuizBtn", start);
    on_click("retakeQuizBtn", retake);
    on_click("pronounceQuestionBtn", || {
        with_quiz(|q| q.pronounce_current());
    });
    on_click("nextQuestionBtn", next);
    // options are rebuilt per question; listen once on their container
    if let Some(options) = dom::by_id("optionsContainer") {
        dom::listen(&options, "click", |evt: MouseEvent| {
            if let Some(answer) = clicked_answer(&evt) {
                with_quiz(|q| q.answer(&answer));
            }
        });
    }

    dom::listen(&doc, "keydown", |evt: KeyboardEvent| {
        let key = evt.key();
        let consumed = with_quiz(|q| q.handle_key(&key)).unwrap_or(false);
        if consumed && QuizKey::from_key(&key) == Some(QuizKey::Pronounce) {
            evt.prevent_default();
        }
    });

    log::debug!("quiz page initialised");
    Ok(())
}
