//! Voice assistant state machine
//!
//! Handles transitions between Idle, Listening, Processing, Displaying,
//! and Error phases based on trigger clicks, recognition callbacks, and
//! backend replies. One transition function consumes tagged events; the
//! displayed status and response are explicit state, never inferred back
//! from rendered text.

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::events::{ResponseView, StatusTone, UiEvent};

use super::api::{AssistantReply, ReplyOutcome};
use super::backend::BackendError;
use super::speech::{
    RecognitionErrorKind, SpeechConfig, SpeechRecognizer, SpeechSynthesizer, Utterance,
};

/// Default prompt shown whenever no session or result is on screen
pub const IDLE_PROMPT: &str =
    "Click the microphone to ask about ingredients or recipe ingredients";

/// Status shown while a recognition session is open
pub const LISTENING_PROMPT: &str =
    "\u{1F3A4} Listening... Ask about ingredients or recipe ingredients!";

/// Status shown when the backend call fails in transport or decoding
pub const GENERIC_ERROR: &str = "Sorry, I encountered an error. Please try again.";

/// Shown on the disabled trigger when recognition is unavailable
pub const UNSUPPORTED_REASON: &str = "Voice recognition not supported on this platform";

/// The five possible phases of the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the trigger
    Idle,
    /// Recognition session open
    Listening,
    /// Query sent, reply pending
    Processing,
    /// A result (or at least its status line) is on screen
    Displaying,
    /// An error message is on screen, retry possible
    Error,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

impl Phase {
    /// Wire-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Listening => "listening",
            Phase::Processing => "processing",
            Phase::Displaying => "displaying",
            Phase::Error => "error",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged events consumed by the machine
#[derive(Debug)]
pub enum AssistantEvent {
    /// The trigger button was pressed
    ButtonClicked,
    /// Recognition produced a final transcript
    TranscriptReady(String),
    /// Recognition failed
    RecognitionError(RecognitionErrorKind),
    /// The backend worker finished one query
    BackendResponded(Result<AssistantReply, BackendError>),
    /// The recognition session closed (always follows results and errors)
    RecognitionEnded,
}

/// The assistant state machine
pub struct AssistantMachine {
    phase: Phase,
    status: String,
    status_tone: StatusTone,
    response: Option<ResponseView>,
    recognizer: Box<dyn SpeechRecognizer>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    speech: SpeechConfig,
    /// Dispatches transcripts to the backend worker
    query_tx: mpsc::Sender<String>,
    /// Channel for emitting UI notifications
    event_tx: broadcast::Sender<UiEvent>,
}

impl AssistantMachine {
    /// Create a machine with the given capabilities
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        speech: SpeechConfig,
        query_tx: mpsc::Sender<String>,
        event_tx: broadcast::Sender<UiEvent>,
    ) -> Self {
        Self {
            phase: Phase::Idle,
            status: IDLE_PROMPT.to_string(),
            status_tone: StatusTone::Neutral,
            response: None,
            recognizer,
            synthesizer,
            speech,
            query_tx,
            event_tx,
        }
    }

    /// Create a machine only if a recognizer is available.
    ///
    /// With no recognizer the trigger is disabled for the session and no
    /// machine is built. Graceful degradation, not an error.
    pub fn with_capabilities(
        recognizer: Option<Box<dyn SpeechRecognizer>>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        speech: SpeechConfig,
        query_tx: mpsc::Sender<String>,
        event_tx: broadcast::Sender<UiEvent>,
    ) -> Option<Self> {
        match recognizer {
            Some(recognizer) => Some(Self::new(
                recognizer, synthesizer, speech, query_tx, event_tx,
            )),
            None => {
                info!("speech recognition unavailable, voice trigger disabled");
                let _ = event_tx.send(UiEvent::TriggerDisabled {
                    reason: UNSUPPORTED_REASON.to_string(),
                });
                None
            }
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current status line text
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Current status tone
    pub fn status_tone(&self) -> StatusTone {
        self.status_tone
    }

    /// Currently rendered response content, if any
    pub fn response(&self) -> Option<&ResponseView> {
        self.response.as_ref()
    }

    /// Run the machine, processing events until the channel closes
    pub async fn run(&mut self, mut event_rx: mpsc::Receiver<AssistantEvent>) {
        info!("assistant machine started in idle phase");

        while let Some(event) = event_rx.recv().await {
            self.handle(event);
        }

        info!("assistant machine stopped");
    }

    /// The transition function: apply one event
    pub fn handle(&mut self, event: AssistantEvent) {
        debug!(phase = %self.phase, ?event, "assistant event");
        match event {
            AssistantEvent::ButtonClicked => self.on_button_clicked(),
            AssistantEvent::TranscriptReady(transcript) => self.on_transcript(transcript),
            AssistantEvent::RecognitionError(kind) => self.on_recognition_error(kind),
            AssistantEvent::BackendResponded(result) => self.on_backend_responded(result),
            AssistantEvent::RecognitionEnded => self.on_recognition_ended(),
        }
    }

    /// Toggle behavior: a click while listening stops the session, any
    /// other click opens a new one. Never two open sessions.
    fn on_button_clicked(&mut self) {
        if self.phase == Phase::Listening {
            self.recognizer.stop();
            return;
        }

        let _ = self.event_tx.send(UiEvent::PanelShown);

        match self.recognizer.start() {
            Ok(()) => {
                self.set_phase(Phase::Listening);
                let _ = self
                    .event_tx
                    .send(UiEvent::TriggerListening { listening: true });
                self.set_status(LISTENING_PROMPT, StatusTone::Listening);
            }
            Err(e) => {
                warn!(%e, "failed to start recognition");
                self.set_phase(Phase::Error);
                self.set_status(RecognitionErrorKind::Other.message(), StatusTone::Error);
            }
        }
    }

    fn on_transcript(&mut self, transcript: String) {
        self.set_status(
            format!("You asked: \"{transcript}\""),
            StatusTone::Processing,
        );
        self.clear_response();
        self.set_phase(Phase::Processing);

        // One utterance, one in-flight query
        if let Err(e) = self.query_tx.try_send(transcript) {
            warn!(%e, "failed to dispatch query");
            self.set_phase(Phase::Error);
            self.set_status(GENERIC_ERROR, StatusTone::Error);
        }
    }

    fn on_recognition_error(&mut self, kind: RecognitionErrorKind) {
        let _ = self
            .event_tx
            .send(UiEvent::TriggerListening { listening: false });
        self.set_phase(Phase::Error);
        self.set_status(kind.message(), StatusTone::Error);
    }

    fn on_backend_responded(&mut self, result: Result<AssistantReply, BackendError>) {
        let reply = match result {
            Ok(reply) => reply,
            Err(_) => {
                self.set_phase(Phase::Error);
                self.set_status(GENERIC_ERROR, StatusTone::Error);
                self.clear_response();
                return;
            }
        };

        let AssistantReply { message, outcome } = reply;

        match outcome {
            ReplyOutcome::RecipeIngredients {
                recipe,
                recipe_slug,
                ingredients,
            } => {
                self.set_phase(Phase::Displaying);
                self.set_status(format!("Ingredients for {recipe}:"), StatusTone::Success);
                self.render(ResponseView::RecipeIngredients {
                    link: format!("/recipes/{recipe_slug}/"),
                    heading: recipe,
                    ingredients,
                });
                self.speak(&message);
            }
            ReplyOutcome::IngredientInfo {
                ingredient,
                description,
                storage,
                uses,
            } => {
                self.set_phase(Phase::Displaying);
                self.set_status(
                    format!("Information about {ingredient}:"),
                    StatusTone::Success,
                );
                self.render(ResponseView::IngredientInfo {
                    heading: ingredient,
                    description,
                    storage,
                    uses,
                });
                self.speak(&message);
            }
            // Nothing to render beyond the status line already on screen
            ReplyOutcome::Unrecognized => {
                self.set_phase(Phase::Displaying);
                self.speak(&message);
            }
            ReplyOutcome::Failure => {
                self.set_phase(Phase::Error);
                self.set_status(message.clone(), StatusTone::Error);
                self.clear_response();
                self.speak(&message);
            }
        }
    }

    /// The session closed. Results and errors keep their content; an
    /// empty session resets to the default prompt.
    fn on_recognition_ended(&mut self) {
        let _ = self
            .event_tx
            .send(UiEvent::TriggerListening { listening: false });

        if matches!(self.phase, Phase::Idle | Phase::Listening) {
            self.set_phase(Phase::Idle);
            self.set_status(IDLE_PROMPT, StatusTone::Neutral);
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if phase != self.phase {
            info!(from = %self.phase, to = %phase, "assistant transition");
            self.phase = phase;
            let _ = self.event_tx.send(UiEvent::PhaseChanged {
                phase: phase.as_str().to_string(),
            });
        }
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.status = text.into();
        self.status_tone = tone;
        let _ = self.event_tx.send(UiEvent::StatusChanged {
            text: self.status.clone(),
            tone,
        });
    }

    fn render(&mut self, view: ResponseView) {
        self.response = Some(view.clone());
        let _ = self.event_tx.send(UiEvent::ResponseRendered { view });
    }

    fn clear_response(&mut self) {
        self.response = None;
        let _ = self.event_tx.send(UiEvent::ResponseCleared);
    }

    /// Cancel-then-speak: at most one utterance is ever active
    fn speak(&mut self, text: &str) {
        if self.synthesizer.is_speaking() {
            self.synthesizer.cancel();
        }
        self.synthesizer
            .speak(&Utterance::new(text, &self.speech));
    }
}
