//! UI bridge message protocol
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian
//! length. Frontends send [`Request`]s carrying DOM-side inputs (button
//! clicks, pointer moves, recognition callbacks) and receive
//! [`Response`]s; a subscribed connection is switched to push mode and
//! receives raw [`UiEvent`](crate::events::UiEvent) frames instead.

use serde::{Deserialize, Serialize};

use crate::assistant::speech::RecognitionErrorKind;
use crate::carousel::SlideCommand;

/// Requests from a frontend to the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Ping to check connectivity
    Ping,

    /// Request the current UI snapshot
    GetStatus,

    /// Switch this connection to event-push mode
    Subscribe,

    /// Carousel navigation or pointer input
    Slide(SlideCommand),

    /// The voice trigger button was clicked
    VoiceTrigger,

    /// The platform recognizer produced a final transcript
    Transcript { text: String },

    /// The platform recognizer reported an error
    RecognitionFailed { kind: RecognitionErrorKind },

    /// The recognition session closed
    RecognitionEnded,
}

/// Responses from the daemon to a frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Pong response to ping
    Pong,

    /// Current UI snapshot
    Status(UiSnapshot),

    /// Subscription confirmed; event frames follow
    Subscribed,

    /// Input accepted
    Ack,

    /// Request could not be served
    Error { code: String, message: String },
}

/// Snapshot of both controllers, kept current from the event stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSnapshot {
    /// Daemon version
    pub version: String,

    /// Assistant phase name (idle, listening, processing, ...)
    pub phase: String,

    /// Active slide index
    pub active_slide: usize,

    /// Total slide count (0 when the page has no carousel)
    pub slide_count: usize,

    /// Whether speech recognition is available this session
    pub voice_supported: bool,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

impl Default for UiSnapshot {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            phase: "idle".to_string(),
            active_slide: 0,
            slide_count: 0,
            voice_supported: false,
            uptime_secs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_request_serialization() {
        let req = Request::Slide(SlideCommand::Dot { index: 2 });
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("slide"));
        assert!(json.contains("dot"));
        assert!(json.contains("2"));
    }

    #[test]
    fn test_transcript_request_roundtrip() {
        let json = r#"{"type":"transcript","text":"what goes in pancakes"}"#;
        let req: Request = serde_json::from_str(json).unwrap();
        assert!(matches!(req, Request::Transcript { ref text } if text == "what goes in pancakes"));
    }

    #[test]
    fn test_recognition_failed_kind() {
        let json = r#"{"type":"recognition_failed","kind":"no_speech"}"#;
        let req: Request = serde_json::from_str(json).unwrap();
        assert!(matches!(
            req,
            Request::RecognitionFailed {
                kind: RecognitionErrorKind::NoSpeech
            }
        ));
    }

    #[test]
    fn test_status_response_serialization() {
        let resp = Response::Status(UiSnapshot::default());
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("status"));
        assert!(json.contains("idle"));
    }
}
