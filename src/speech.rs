//! Pronunciation helper: server-synthesized audio first, on-device speech
//! synthesis second.
//!
//! The caller always gets a [`SpeechOutcome`]; the only case where nothing is
//! spoken is [`SpeechOutcome::Unavailable`], which is logged rather than shown.

use crate::config;
use crate::dom;
use crate::error::{SpeechError, js_message};
use crate::model::{SpeakRequest, SpeakResponse};
use base64::Engine;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, Element, HtmlAudioElement, SpeechSynthesisUtterance,
    SpeechSynthesisVoice, Url, window,
};

/// Which stage ended up speaking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Server audio started playing.
    ServerAudio,
    /// On-device synthesis was queued, with the chosen voice name if a
    /// Chinese voice was found.
    DeviceSynthesis { voice: Option<String> },
    /// No synthesis capability at all; nothing was spoken.
    Unavailable,
}

/// Decide from a `/api/speak` reply whether there is playable audio.
pub fn audio_from_response(status: u16, body: &str) -> Result<Vec<u8>, SpeechError> {
    let resp: SpeakResponse = serde_json::from_str(body)
        .map_err(|e| SpeechError::Decode(format!("status {status}: {e}")))?;
    match resp {
        SpeakResponse { success: true, audio: Some(audio), .. } if !audio.is_empty() => {
            base64::engine::general_purpose::STANDARD
                .decode(audio.as_bytes())
                .map_err(|e| SpeechError::MalformedAudio(e.to_string()))
        }
        SpeakResponse { fallback: true, error, .. } => Err(SpeechError::FallbackRequested(
            error.unwrap_or_else(|| format!("status {status}")),
        )),
        SpeakResponse { error, .. } => Err(SpeechError::Server(
            error.unwrap_or_else(|| "Gagal menghasilkan suara".to_string()),
        )),
    }
}

/// Index of the first voice whose language tag looks Chinese.
pub fn pick_chinese_voice<'a>(langs: impl IntoIterator<Item = &'a str>) -> Option<usize> {
    langs
        .into_iter()
        .position(|lang| lang.contains("zh") || lang.contains("cmn"))
}

/// The platform seam the two-stage strategy runs against.
#[allow(async_fn_in_trait)]
pub trait SpeechBackend {
    fn show_indicator(&self);
    fn hide_indicator(&self);
    /// Raw status and body from the speech endpoint.
    async fn request_audio(&self, text: &str) -> Result<(u16, String), SpeechError>;
    /// Play to the end and clear the indicator. `Err` only when playback
    /// could not start.
    async fn play(&self, audio: Vec<u8>) -> Result<(), SpeechError>;
    fn speak_on_device(&self, text: &str) -> SpeechOutcome;
}

async fn server_stage<B: SpeechBackend>(backend: &B, text: &str) -> Result<(), SpeechError> {
    let (status, body) = backend.request_audio(text).await?;
    let audio = audio_from_response(status, &body)?;
    backend.play(audio).await
}

pub async fn speak_with<B: SpeechBackend>(backend: &B, text: &str) -> SpeechOutcome {
    backend.show_indicator();
    match server_stage(backend, text).await {
        Ok(()) => SpeechOutcome::ServerAudio,
        Err(e) => {
            log::warn!("TTS Error: {e}");
            backend.hide_indicator();
            let outcome = backend.speak_on_device(text);
            if outcome == SpeechOutcome::Unavailable {
                log::warn!("Sintesis suara tidak didukung di browser ini");
            }
            outcome
        }
    }
}

// --- Browser backend --------------------------------------------------------

const INDICATOR_STYLE: &str = "position:fixed; top:20px; right:20px; background:#667eea; color:white; padding:10px 15px; border-radius:8px; z-index:9999; font-size:14px; box-shadow:0 4px 15px rgba(0,0,0,0.2);";

/// Browser implementation: `fetch` + `<audio>` + `speechSynthesis`.
pub struct BrowserSpeech {
    endpoint: String,
    indicator: Option<Element>,
}

impl BrowserSpeech {
    pub fn new() -> Self {
        let indicator = dom::document().and_then(|doc| {
            let el = doc.create_element("div").ok()?;
            el.set_class_name("tts-loading");
            el.set_text_content(Some("🔊 Memuat..."));
            el.set_attribute("style", INDICATOR_STYLE).ok();
            Some(el)
        });
        Self { endpoint: config::current().endpoints.speak, indicator }
    }
}

impl Default for BrowserSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechBackend for BrowserSpeech {
    fn show_indicator(&self) {
        if let (Some(el), Some(body)) = (&self.indicator, dom::document().and_then(|d| d.body())) {
            body.append_child(el).ok();
        }
    }

    fn hide_indicator(&self) {
        if let Some(el) = &self.indicator {
            el.remove();
        }
    }

    async fn request_audio(&self, text: &str) -> Result<(u16, String), SpeechError> {
        dom::post_json(&self.endpoint, &SpeakRequest { text })
            .await
            .map_err(SpeechError::Network)
    }

    async fn play(&self, audio: Vec<u8>) -> Result<(), SpeechError> {
        let bytes = js_sys::Uint8Array::from(audio.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let props = BlobPropertyBag::new();
        props.set_type("audio/mpeg");
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props)
            .map_err(|e| SpeechError::Playback(js_message(&e)))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|e| SpeechError::Playback(js_message(&e)))?;
        let player = HtmlAudioElement::new_with_src(&url)
            .map_err(|e| SpeechError::Playback(js_message(&e)))?;

        if let Some(el) = &self.indicator {
            el.set_text_content(Some("🔊 Memutar..."));
        }
        let finished = js_sys::Promise::new(&mut |resolve, reject| {
            player.set_onended(Some(&resolve));
            player.set_onerror(Some(&reject));
        });

        let played = match player.play() {
            Ok(started) => match JsFuture::from(started).await {
                Ok(_) => {
                    if JsFuture::from(finished).await.is_err() {
                        log::error!("Error playing audio");
                    }
                    self.hide_indicator();
                    Ok(())
                }
                Err(e) => Err(SpeechError::Playback(js_message(&e))),
            },
            Err(e) => Err(SpeechError::Playback(js_message(&e))),
        };
        player.set_onended(None);
        player.set_onerror(None);
        Url::revoke_object_url(&url).ok();
        played
    }

    fn speak_on_device(&self, text: &str) -> SpeechOutcome {
        let Some(win) = window() else {
            return SpeechOutcome::Unavailable;
        };
        let supported = js_sys::Reflect::has(&win, &JsValue::from_str("speechSynthesis")).unwrap_or(false);
        if !supported {
            return SpeechOutcome::Unavailable;
        }
        let Ok(synth) = win.speech_synthesis() else {
            return SpeechOutcome::Unavailable;
        };
        let Ok(utterance) = SpeechSynthesisUtterance::new_with_text(text) else {
            return SpeechOutcome::Unavailable;
        };
        synth.cancel();
        utterance.set_lang("zh-CN");
        utterance.set_rate(0.8);
        utterance.set_pitch(1.0);

        let voices: Vec<SpeechSynthesisVoice> = synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into().ok())
            .collect();
        let langs: Vec<String> = voices.iter().map(|v| v.lang()).collect();
        let chosen = pick_chinese_voice(langs.iter().map(String::as_str)).map(|i| &voices[i]);
        utterance.set_voice(chosen);
        synth.speak(&utterance);

        SpeechOutcome::DeviceSynthesis { voice: chosen.map(|v| v.name()) }
    }
}

/// Speak `text` in the browser, logging which stage handled it.
pub async fn speak(text: &str) -> SpeechOutcome {
    let outcome = speak_with(&BrowserSpeech::new(), text).await;
    log::debug!("speech for {text:?}: {outcome:?}");
    outcome
}

/// Fire-and-forget variant for event handlers.
pub fn speak_detached(text: String) {
    wasm_bindgen_futures::spawn_local(async move {
        speak(&text).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeBackend {
        reply: Option<(u16, String)>,
        device_available: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeBackend {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Some((status, body.to_string())),
                device_available: true,
                ..Self::default()
            }
        }

        fn log(&self, call: &str) {
            self.calls.borrow_mut().push(call.to_string());
        }
    }

    impl SpeechBackend for FakeBackend {
        fn show_indicator(&self) {
            self.log("show");
        }
        fn hide_indicator(&self) {
            self.log("hide");
        }
        async fn request_audio(&self, _text: &str) -> Result<(u16, String), SpeechError> {
            self.log("request");
            self.reply
                .clone()
                .ok_or_else(|| SpeechError::Network("offline".into()))
        }
        async fn play(&self, audio: Vec<u8>) -> Result<(), SpeechError> {
            self.log(&format!("play:{}", audio.len()));
            Ok(())
        }
        fn speak_on_device(&self, text: &str) -> SpeechOutcome {
            self.log(&format!("device:{text}"));
            if self.device_available {
                SpeechOutcome::DeviceSynthesis { voice: None }
            } else {
                SpeechOutcome::Unavailable
            }
        }
    }

    #[test]
    fn fallback_flag_routes_to_device_synthesis() {
        let backend = FakeBackend::replying(503, r#"{"success":false,"fallback":true}"#);
        let outcome = block_on(speak_with(&backend, "你好"));
        assert_eq!(outcome, SpeechOutcome::DeviceSynthesis { voice: None });
        assert_eq!(
            *backend.calls.borrow(),
            vec!["show", "request", "hide", "device:你好"]
        );
    }

    #[test]
    fn server_audio_is_decoded_and_played() {
        // "ID3" base64-encoded
        let backend = FakeBackend::replying(200, r#"{"success":true,"audio":"SUQz"}"#);
        let outcome = block_on(speak_with(&backend, "谢谢"));
        assert_eq!(outcome, SpeechOutcome::ServerAudio);
        assert_eq!(*backend.calls.borrow(), vec!["show", "request", "play:3"]);
    }

    #[test]
    fn network_failure_falls_back() {
        let backend = FakeBackend { device_available: true, ..FakeBackend::default() };
        let outcome = block_on(speak_with(&backend, "水"));
        assert!(matches!(outcome, SpeechOutcome::DeviceSynthesis { .. }));
    }

    #[test]
    fn no_capability_is_an_explicit_outcome() {
        let backend = FakeBackend {
            reply: Some((500, "not json".into())),
            device_available: false,
            ..FakeBackend::default()
        };
        assert_eq!(block_on(speak_with(&backend, "水")), SpeechOutcome::Unavailable);
    }

    #[test]
    fn response_classification() {
        assert!(matches!(
            audio_from_response(200, r#"{"success":true,"audio":"!!notbase64"}"#),
            Err(SpeechError::MalformedAudio(_))
        ));
        assert!(matches!(
            audio_from_response(200, r#"{"success":true}"#),
            Err(SpeechError::Server(_))
        ));
        assert_eq!(
            audio_from_response(400, r#"{"error":"Tidak ada teks yang diberikan"}"#),
            Err(SpeechError::Server("Tidak ada teks yang diberikan".into()))
        );
        assert_eq!(
            audio_from_response(503, r#"{"error":"Layanan TTS tidak tersedia","fallback":true}"#),
            Err(SpeechError::FallbackRequested("Layanan TTS tidak tersedia".into()))
        );
        assert!(matches!(audio_from_response(502, "<html>"), Err(SpeechError::Decode(_))));
    }

    #[test]
    fn chinese_voice_selection() {
        assert_eq!(pick_chinese_voice(["en-US", "zh-CN", "zh-TW"]), Some(1));
        assert_eq!(pick_chinese_voice(["en-GB", "cmn-Hans-CN"]), Some(1));
        assert_eq!(pick_chinese_voice(["en-US", "id-ID"]), None);
    }
}
