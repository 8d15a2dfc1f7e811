//! UI bridge for frontend communication
//!
//! Replaces ambient DOM event listeners with an explicit delivery
//! surface: a Unix-socket server over which frontends send inputs and
//! subscribe to controller notifications.

mod protocol;
mod server;

pub use protocol::{Request, Response, UiSnapshot};
pub use server::Server;
