//! Unix domain socket server for the UI bridge
//!
//! Frontends deliver DOM-side inputs as request frames and may switch a
//! connection into push mode to receive every controller notification.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, error, info, warn};

use crate::assistant::AssistantEvent;
use crate::carousel::SlideCommand;
use crate::events::UiEvent;

use super::protocol::{Request, Response, UiSnapshot};

/// Frames larger than this are treated as a protocol violation
const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Bridge server handling frontend connections
pub struct Server {
    socket_path: PathBuf,
    listener: Option<UnixListener>,
    state: Arc<RwLock<BridgeState>>,
    shutdown_tx: broadcast::Sender<()>,
    /// Notification stream handed to subscribing clients
    event_tx: broadcast::Sender<UiEvent>,
    /// Carousel input channel; `None` when the page has no carousel
    slide_tx: Option<mpsc::Sender<SlideCommand>>,
    /// Assistant input channel; `None` when voice is unsupported
    assistant_tx: Option<mpsc::Sender<AssistantEvent>>,
}

/// Shared server state
struct BridgeState {
    snapshot: UiSnapshot,
    start_time: std::time::Instant,
}

impl Server {
    /// Bind the bridge socket
    pub fn new(
        socket_path: &Path,
        event_tx: broadcast::Sender<UiEvent>,
        slide_tx: Option<mpsc::Sender<SlideCommand>>,
        assistant_tx: Option<mpsc::Sender<AssistantEvent>>,
        slide_count: usize,
    ) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        // Remove stale socket if it exists
        if socket_path.exists() {
            std::fs::remove_file(socket_path).context("failed to remove stale socket")?;
        }

        let listener = UnixListener::bind(socket_path).context("failed to bind Unix socket")?;

        // Owner-only socket
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        let snapshot = UiSnapshot {
            slide_count,
            voice_supported: assistant_tx.is_some(),
            ..UiSnapshot::default()
        };

        let state = Arc::new(RwLock::new(BridgeState {
            snapshot,
            start_time: std::time::Instant::now(),
        }));

        info!(?socket_path, "bridge listening");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener: Some(listener),
            state,
            shutdown_tx,
            event_tx,
            slide_tx,
            assistant_tx,
        })
    }

    /// Record the assistant's current phase in the snapshot
    pub async fn set_phase(&self, phase: &str) {
        let mut state = self.state.write().await;
        if state.snapshot.phase != phase {
            debug!(phase, "bridge snapshot: phase updated");
            state.snapshot.phase = phase.to_string();
        }
    }

    /// Record the active slide in the snapshot
    pub async fn set_active_slide(&self, index: usize) {
        let mut state = self.state.write().await;
        state.snapshot.active_slide = index;
    }

    /// Run the server, accepting connections
    pub async fn run(&self) -> Result<()> {
        let listener = self.listener.as_ref().context("server not initialized")?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("frontend connected");
                    let state = Arc::clone(&self.state);
                    let event_tx = self.event_tx.clone();
                    let slide_tx = self.slide_tx.clone();
                    let assistant_tx = self.assistant_tx.clone();
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = Self::handle_client(stream, state, event_tx, slide_tx, assistant_tx) => {
                                if let Err(e) = result {
                                    warn!(?e, "client handler error");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("client handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "accept error");
                }
            }
        }
    }

    /// Handle one frontend connection
    async fn handle_client(
        mut stream: UnixStream,
        state: Arc<RwLock<BridgeState>>,
        event_tx: broadcast::Sender<UiEvent>,
        slide_tx: Option<mpsc::Sender<SlideCommand>>,
        assistant_tx: Option<mpsc::Sender<AssistantEvent>>,
    ) -> Result<()> {
        loop {
            let request = match Self::read_frame::<Request>(&mut stream).await? {
                Some(request) => request,
                None => {
                    debug!("frontend disconnected");
                    return Ok(());
                }
            };

            debug!(?request, "received request");

            if matches!(request, Request::Subscribe) {
                // Subscribe before acking so no event published after the
                // ack can be missed
                let event_rx = event_tx.subscribe();
                Self::write_frame(&mut stream, &Response::Subscribed).await?;
                return Self::push_events(stream, event_rx).await;
            }

            let response =
                Self::process_request(request, &state, &slide_tx, &assistant_tx).await;
            Self::write_frame(&mut stream, &response).await?;
        }
    }

    /// Forward every notification until the client goes away
    async fn push_events(
        mut stream: UnixStream,
        mut event_rx: broadcast::Receiver<UiEvent>,
    ) -> Result<()> {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    if Self::write_frame(&mut stream, &event).await.is_err() {
                        debug!("subscriber disconnected");
                        return Ok(());
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return Ok(()),
            }
        }
    }

    /// Process a request and build its response
    async fn process_request(
        request: Request,
        state: &Arc<RwLock<BridgeState>>,
        slide_tx: &Option<mpsc::Sender<SlideCommand>>,
        assistant_tx: &Option<mpsc::Sender<AssistantEvent>>,
    ) -> Response {
        match request {
            Request::Ping => Response::Pong,

            Request::GetStatus => {
                let mut state = state.write().await;
                state.snapshot.uptime_secs = state.start_time.elapsed().as_secs();
                Response::Status(state.snapshot.clone())
            }

            // Handled in handle_client before we get here
            Request::Subscribe => Response::Subscribed,

            Request::Slide(command) => match slide_tx {
                Some(tx) if tx.send(command).await.is_ok() => Response::Ack,
                _ => Response::Error {
                    code: "carousel_unavailable".to_string(),
                    message: "no carousel on this page".to_string(),
                },
            },

            Request::VoiceTrigger => {
                Self::forward_assistant(assistant_tx, AssistantEvent::ButtonClicked).await
            }
            Request::Transcript { text } => {
                Self::forward_assistant(assistant_tx, AssistantEvent::TranscriptReady(text)).await
            }
            Request::RecognitionFailed { kind } => {
                Self::forward_assistant(assistant_tx, AssistantEvent::RecognitionError(kind)).await
            }
            Request::RecognitionEnded => {
                Self::forward_assistant(assistant_tx, AssistantEvent::RecognitionEnded).await
            }
        }
    }

    async fn forward_assistant(
        assistant_tx: &Option<mpsc::Sender<AssistantEvent>>,
        event: AssistantEvent,
    ) -> Response {
        match assistant_tx {
            Some(tx) if tx.send(event).await.is_ok() => Response::Ack,
            _ => Response::Error {
                code: "voice_unsupported".to_string(),
                message: "speech recognition is not available".to_string(),
            },
        }
    }

    /// Read one length-prefixed JSON frame; `None` on clean disconnect
    async fn read_frame<T: serde::de::DeserializeOwned>(
        stream: &mut UnixStream,
    ) -> Result<Option<T>> {
        let mut len_buf = [0u8; 4];
        match stream.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_le_bytes(len_buf) as usize;
        if len > MAX_FRAME_LEN {
            anyhow::bail!("frame too large: {len} bytes");
        }

        let mut msg_buf = vec![0u8; len];
        stream.read_exact(&mut msg_buf).await?;

        let msg = serde_json::from_slice(&msg_buf).context("failed to parse frame")?;
        Ok(Some(msg))
    }

    /// Write one length-prefixed JSON frame
    async fn write_frame<T: serde::Serialize>(stream: &mut UnixStream, msg: &T) -> Result<()> {
        let msg_bytes = serde_json::to_vec(msg)?;
        let msg_len = (msg_bytes.len() as u32).to_le_bytes();

        stream.write_all(&msg_len).await?;
        stream.write_all(&msg_bytes).await?;

        Ok(())
    }

    /// Gracefully shutdown the server
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove socket file");
            }
        }

        info!("bridge shutdown complete");
    }
}
