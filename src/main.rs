//! cookbook-ui-daemon: event-driven host for the cookbook site's UI controllers
//!
//! The daemon runs two independent controllers:
//! - Carousel: featured-recipe slider with dot indicators and a
//!   pause-on-hover auto-advance timer
//! - Voice assistant: explicit state machine over injected speech
//!   capabilities, querying the recipe backend and speaking its replies
//!
//! Frontends connect over the Unix-socket bridge to deliver inputs
//! (clicks, pointer moves, recognition callbacks) and subscribe to
//! notifications describing what to render.

mod assistant;
mod bridge;
mod carousel;
mod config;
mod events;
mod lifecycle;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::assistant::speech::{SpeechRecognizer, StubRecognizer, StubSynthesizer};
use crate::assistant::{AssistantMachine, BackendClient};
use crate::bridge::Server;
use crate::carousel::{Carousel, CarouselController, Slide};
use crate::config::Config;
use crate::events::UiEvent;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "cookbook-ui-daemon starting"
    );

    // Load configuration
    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(?config.socket_path, endpoint = %config.endpoint, "configuration loaded");

    // Shared notification stream consumed by the bridge and its subscribers
    let (event_tx, _event_rx) = broadcast::channel::<UiEvent>(64);

    // Carousel controller; absent when the page defines no slides
    let (slide_tx, slide_rx) = mpsc::channel(32);
    let slides: Vec<Slide> = config.slides.iter().map(|label| Slide::new(label.as_str())).collect();
    let carousel = Carousel::new(slides, event_tx.clone());
    let slide_count = carousel.as_ref().map_or(0, Carousel::len);
    let carousel_controller = carousel
        .map(|c| CarouselController::new(c, config.advance_interval, event_tx.clone()));

    // Voice assistant; absent when the platform offers no recognition
    let (assistant_tx, assistant_rx) = mpsc::channel(32);
    let (query_tx, query_rx) = mpsc::channel(4);
    let recognizer: Option<Box<dyn SpeechRecognizer>> = config
        .speech_supported
        .then(|| Box::new(StubRecognizer) as Box<dyn SpeechRecognizer>);
    let machine = AssistantMachine::with_capabilities(
        recognizer,
        Box::new(StubSynthesizer::default()),
        config.speech.clone(),
        query_tx,
        event_tx.clone(),
    );

    // Bridge: channels are advertised only for the controllers that exist
    let server = Server::new(
        &config.socket_path,
        event_tx.clone(),
        carousel_controller.as_ref().map(|_| slide_tx.clone()),
        machine.as_ref().map(|_| assistant_tx.clone()),
        slide_count,
    )?;

    // Run the controllers
    match carousel_controller {
        Some(mut controller) => {
            tokio::spawn(async move { controller.run(slide_rx).await });
        }
        None => {
            warn!("no slides configured, carousel disabled");
            drop(slide_rx);
        }
    }

    match machine {
        Some(mut machine) => {
            let backend = BackendClient::new(&config.endpoint, config.request_timeout)?;
            tokio::spawn(async move { machine.run(assistant_rx).await });
            tokio::spawn(backend.run(query_rx, assistant_tx.clone()));
        }
        None => {
            drop(assistant_rx);
            drop(query_rx);
        }
    }

    // Keep the bridge snapshot in sync with controller notifications
    let mut snapshot_rx = event_tx.subscribe();
    let server_for_events = &server;

    info!("daemon initialized, entering main loop");

    tokio::select! {
        // Accept frontend connections
        result = server.run() => {
            if let Err(e) = result {
                error!(?e, "bridge error");
            }
        }

        // Mirror phase and slide changes into the status snapshot
        _ = async {
            loop {
                match snapshot_rx.recv().await {
                    Ok(UiEvent::PhaseChanged { phase }) => {
                        server_for_events.set_phase(&phase).await;
                    }
                    Ok(UiEvent::SlideChanged { index }) => {
                        server_for_events.set_active_slide(index).await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "snapshot receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        } => {
            info!("snapshot sync exited");
        }

        // Wait for shutdown signal
        _ = lifecycle::shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    info!("shutting down...");
    server.shutdown().await;
    info!("cookbook-ui-daemon stopped");

    Ok(())
}
