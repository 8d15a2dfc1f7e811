//! Voice assistant module
//!
//! An explicit state machine (Idle, Listening, Processing, Displaying,
//! Error) wired to injected speech capabilities and a backend worker.
//! Recognition callbacks arrive as tagged [`AssistantEvent`]s; replies
//! are decoded by [`api`] and rendered as structured views.

pub mod api;
mod backend;
mod machine;
pub mod speech;

pub use backend::{BackendClient, BackendError};
pub use machine::{AssistantEvent, AssistantMachine, Phase};
