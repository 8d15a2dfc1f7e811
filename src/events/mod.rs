//! Notification events published by the UI controllers
//!
//! Both controllers emit `UiEvent`s on a shared broadcast channel. The
//! bridge forwards them to subscribed frontend clients, which apply the
//! corresponding DOM mutations.

use serde::{Deserialize, Serialize};

/// Visual tone of the assistant status line (maps to a CSS class suffix
/// on the frontend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    /// Default prompt, no modifier class
    Neutral,
    /// Recognition session is active
    Listening,
    /// Waiting on the backend
    Processing,
    /// Structured answer rendered
    Success,
    /// Something went wrong, retry possible
    Error,
}

/// Structured content for the assistant response panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseView {
    /// Ingredient list for a recipe, with a link to the full page
    RecipeIngredients {
        heading: String,
        link: String,
        ingredients: Vec<String>,
    },
    /// Knowledge-base entry for a single ingredient
    IngredientInfo {
        heading: String,
        description: String,
        storage: String,
        uses: String,
    },
}

/// Events emitted by the carousel and voice assistant controllers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// The active slide (and its dot) changed
    SlideChanged {
        /// New active index
        index: usize,
    },

    /// Pointer entered the carousel, auto-advance stopped
    AutoAdvancePaused,

    /// Pointer left the carousel, auto-advance restarted
    AutoAdvanceResumed,

    /// The assistant moved to a new phase
    PhaseChanged {
        /// Phase name, snake_case (idle, listening, processing, ...)
        phase: String,
    },

    /// The assistant panel should become visible
    PanelShown,

    /// The trigger button's listening marker changed
    TriggerListening { listening: bool },

    /// Speech recognition is unavailable, trigger disabled for the session
    TriggerDisabled { reason: String },

    /// The status line changed
    StatusChanged { text: String, tone: StatusTone },

    /// Structured content rendered into the response panel
    ResponseRendered { view: ResponseView },

    /// The response panel was emptied
    ResponseCleared,
}

impl std::fmt::Display for UiEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiEvent::SlideChanged { index } => write!(f, "SLIDE_CHANGED ({})", index),
            UiEvent::AutoAdvancePaused => write!(f, "AUTO_ADVANCE_PAUSED"),
            UiEvent::AutoAdvanceResumed => write!(f, "AUTO_ADVANCE_RESUMED"),
            UiEvent::PhaseChanged { phase } => write!(f, "PHASE_CHANGED ({})", phase),
            UiEvent::PanelShown => write!(f, "PANEL_SHOWN"),
            UiEvent::TriggerListening { listening } => {
                write!(f, "TRIGGER_LISTENING ({})", listening)
            }
            UiEvent::TriggerDisabled { reason } => write!(f, "TRIGGER_DISABLED ({})", reason),
            UiEvent::StatusChanged { text, tone } => {
                write!(f, "STATUS_CHANGED ({:?}: {})", tone, text)
            }
            UiEvent::ResponseRendered { .. } => write!(f, "RESPONSE_RENDERED"),
            UiEvent::ResponseCleared => write!(f, "RESPONSE_CLEARED"),
        }
    }
}
