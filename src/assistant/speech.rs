//! Platform speech capabilities
//!
//! The machine never touches the platform speech APIs directly; it is
//! handed a recognizer and a synthesizer behind these traits. The real
//! implementations live in the embedding frontend, which forwards
//! recognition callbacks over the bridge. Stub implementations back the
//! daemon when no platform capability is wired in.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fixed synthesis parameters and recognition locale
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Recognition and synthesis locale (single-shot, no interim results)
    pub lang: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 0.8,
            lang: "en-US".to_string(),
        }
    }
}

/// One unit of synthesized speech output
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub lang: String,
}

impl Utterance {
    /// Build an utterance for `text` with the configured parameters
    pub fn new(text: impl Into<String>, config: &SpeechConfig) -> Self {
        Self {
            text: text.into(),
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
            lang: config.lang.clone(),
        }
    }
}

/// Classified recognition failures, each with a fixed user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionErrorKind {
    /// The session ended without hearing anything
    NoSpeech,
    /// Microphone permission was denied
    NotAllowed,
    /// Anything else (aborted, audio-capture, network, ...)
    Other,
}

impl RecognitionErrorKind {
    /// The status-line message shown for this failure
    pub fn message(&self) -> &'static str {
        match self {
            RecognitionErrorKind::NoSpeech => "No speech detected. Please try again.",
            RecognitionErrorKind::NotAllowed => {
                "Microphone access denied. Please enable it in your browser settings."
            }
            RecognitionErrorKind::Other => "Sorry, I couldn't hear you. Please try again.",
        }
    }
}

/// Starts and stops single-shot recognition sessions.
///
/// Transcripts, errors, and session-end notifications come back to the
/// machine as [`AssistantEvent`](super::AssistantEvent)s, not through
/// this trait.
pub trait SpeechRecognizer: Send {
    /// Begin a recognition session
    fn start(&mut self) -> Result<()>;
    /// Stop the active session; the end notification still follows
    fn stop(&mut self);
}

/// Speaks utterances, at most one at a time
pub trait SpeechSynthesizer: Send {
    /// Queue an utterance for playback
    fn speak(&mut self, utterance: &Utterance);
    /// Cancel the in-progress utterance, if any
    fn cancel(&mut self);
    /// Whether an utterance is currently playing
    fn is_speaking(&self) -> bool;
}

/// Recognizer used when no platform recognizer is wired in; sessions are
/// driven entirely by bridge-forwarded callbacks.
#[derive(Default)]
pub struct StubRecognizer;

impl SpeechRecognizer for StubRecognizer {
    fn start(&mut self) -> Result<()> {
        debug!("stub recognizer session started");
        Ok(())
    }

    fn stop(&mut self) {
        debug!("stub recognizer session stopped");
    }
}

/// Synthesizer that logs utterances instead of playing them
#[derive(Default)]
pub struct StubSynthesizer {
    speaking: bool,
}

impl SpeechSynthesizer for StubSynthesizer {
    fn speak(&mut self, utterance: &Utterance) {
        info!(
            rate = utterance.rate,
            volume = utterance.volume,
            "speaking: {}",
            utterance.text
        );
        self.speaking = true;
    }

    fn cancel(&mut self) {
        debug!("speech canceled");
        self.speaking = false;
    }

    fn is_speaking(&self) -> bool {
        self.speaking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_messages() {
        assert_eq!(
            RecognitionErrorKind::NoSpeech.message(),
            "No speech detected. Please try again."
        );
        assert_eq!(
            RecognitionErrorKind::NotAllowed.message(),
            "Microphone access denied. Please enable it in your browser settings."
        );
        assert_eq!(
            RecognitionErrorKind::Other.message(),
            "Sorry, I couldn't hear you. Please try again."
        );
    }

    #[test]
    fn test_error_kind_wire_format() {
        let json = serde_json::to_string(&RecognitionErrorKind::NotAllowed).unwrap();
        assert_eq!(json, r#""not_allowed""#);
    }

    #[test]
    fn test_utterance_carries_config() {
        let config = SpeechConfig::default();
        let utterance = Utterance::new("hello", &config);
        assert_eq!(utterance.rate, 0.9);
        assert_eq!(utterance.pitch, 1.0);
        assert_eq!(utterance.volume, 0.8);
        assert_eq!(utterance.lang, "en-US");
    }
}
