//! Runtime configuration: endpoint paths and UI timings.
//!
//! Defaults mirror what the pages were authored against. A page may override
//! any subset by calling the exported `configure(json)` before its entry
//! point; omitted fields keep their defaults.

use serde::Deserialize;
use std::cell::RefCell;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub quiz: String,
    pub vocabulary: String,
    pub categories: String,
    pub speak: String,
    /// Page the "practice" action navigates to.
    pub quiz_page: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            quiz: "/api/quiz".into(),
            vocabulary: "/api/vocabulary".into(),
            categories: "/api/categories".into(),
            speak: "/api/speak".into(),
            quiz_page: "/quiz".into(),
        }
    }
}

/// Every duration is in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub feedback_delay_ms: u32,
    pub error_banner_ms: u32,
    pub success_banner_ms: u32,
    pub score_count_ms: u32,
    pub score_count_steps: u32,
    pub stat_count_ms: u32,
    pub stat_count_steps: u32,
    pub card_kickoff_ms: u32,
    pub card_stagger_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            feedback_delay_ms: 1000,
            error_banner_ms: 5000,
            success_banner_ms: 3000,
            score_count_ms: 1500,
            score_count_steps: 30,
            stat_count_ms: 2000,
            stat_count_steps: 60,
            card_kickoff_ms: 10,
            card_stagger_ms: 50,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoints: Endpoints,
    pub timings: Timings,
    /// Above this viewport width the mobile menu is forced closed.
    pub mobile_breakpoint_px: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timings: Timings::default(),
            mobile_breakpoint_px: 768,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

thread_local! {
    static CONFIG: RefCell<AppConfig> = RefCell::new(AppConfig::default());
}

/// Snapshot of the active configuration.
pub fn current() -> AppConfig {
    CONFIG.with(|c| c.borrow().clone())
}

pub fn timings() -> Timings {
    CONFIG.with(|c| c.borrow().timings)
}

pub fn install(config: AppConfig) {
    log::debug!("installing config: {config:?}");
    CONFIG.with(|c| *c.borrow_mut() = config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = AppConfig::from_json(r#"{"timings":{"feedback_delay_ms":250}}"#).unwrap();
        assert_eq!(cfg.timings.feedback_delay_ms, 250);
        assert_eq!(cfg.timings.error_banner_ms, 5000);
        assert_eq!(cfg.endpoints, Endpoints::default());
        assert_eq!(cfg.mobile_breakpoint_px, 768);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(AppConfig::from_json("{ timings: ").is_err());
        assert!(AppConfig::from_json(r#"{"mobile_breakpoint_px":"wide"}"#).is_err());
    }

    #[test]
    fn install_replaces_thread_config() {
        let mut cfg = AppConfig::default();
        cfg.endpoints.quiz = "/v2/quiz".into();
        install(cfg);
        assert_eq!(current().endpoints.quiz, "/v2/quiz");
        install(AppConfig::default());
        assert_eq!(current().endpoints.quiz, "/api/quiz");
    }
}
