//! Carousel input loop and auto-advance timer
//!
//! One task owns the carousel state, consuming navigation commands from
//! the bridge and ticking the auto-advance timer. At most one timer
//! exists; hovering suspends it and leaving restarts it from a full
//! period.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, Instant, Interval};
use tracing::{debug, info};

use crate::events::UiEvent;

use super::slides::Carousel;

/// Navigation commands delivered by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SlideCommand {
    /// Next button pressed
    Next,
    /// Previous button pressed
    Prev,
    /// A dot indicator was pressed
    Dot { index: usize },
    /// Pointer entered the carousel area
    PointerEntered,
    /// Pointer left the carousel area
    PointerLeft,
}

/// Drives a [`Carousel`] from bridge commands and a repeating timer
pub struct CarouselController {
    carousel: Carousel,
    advance_interval: Duration,
    hovered: bool,
    event_tx: broadcast::Sender<UiEvent>,
}

impl CarouselController {
    /// Create a controller over an initialized carousel
    pub fn new(
        carousel: Carousel,
        advance_interval: Duration,
        event_tx: broadcast::Sender<UiEvent>,
    ) -> Self {
        Self {
            carousel,
            advance_interval,
            hovered: false,
            event_tx,
        }
    }

    /// Run the controller, processing commands until the channel closes
    pub async fn run(&mut self, mut command_rx: mpsc::Receiver<SlideCommand>) {
        info!(
            slides = self.carousel.len(),
            period_ms = self.advance_interval.as_millis() as u64,
            "carousel controller started"
        );

        let mut ticker = self.fresh_ticker();

        loop {
            tokio::select! {
                _ = ticker.tick(), if !self.hovered => {
                    debug!("auto-advance tick");
                    self.carousel.next();
                }
                command = command_rx.recv() => {
                    match command {
                        Some(command) => self.handle_command(command, &mut ticker),
                        None => break,
                    }
                }
            }
        }

        info!("carousel controller stopped");
    }

    /// Apply one navigation command
    fn handle_command(&mut self, command: SlideCommand, ticker: &mut Interval) {
        debug!(?command, "carousel command");
        match command {
            SlideCommand::Next => self.carousel.next(),
            SlideCommand::Prev => self.carousel.prev(),
            SlideCommand::Dot { index } => self.carousel.go_to(index as isize),
            SlideCommand::PointerEntered => {
                if !self.hovered {
                    self.hovered = true;
                    let _ = self.event_tx.send(UiEvent::AutoAdvancePaused);
                }
            }
            SlideCommand::PointerLeft => {
                if self.hovered {
                    self.hovered = false;
                    // Restart from a full period, never a partial one
                    ticker.reset();
                    let _ = self.event_tx.send(UiEvent::AutoAdvanceResumed);
                }
            }
        }
    }

    /// A timer whose first tick fires one full period from now
    fn fresh_ticker(&self) -> Interval {
        time::interval_at(Instant::now() + self.advance_interval, self.advance_interval)
    }

    /// Current active slide index
    pub fn active_index(&self) -> usize {
        self.carousel.active_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::slides::Slide;

    const PERIOD: Duration = Duration::from_millis(6000);

    fn setup() -> (
        CarouselController,
        mpsc::Sender<SlideCommand>,
        mpsc::Receiver<SlideCommand>,
        broadcast::Receiver<UiEvent>,
    ) {
        let (event_tx, event_rx) = broadcast::channel(64);
        let slides = (0..3).map(|i| Slide::new(format!("s{i}"))).collect();
        let carousel = Carousel::new(slides, event_tx.clone()).unwrap();
        let controller = CarouselController::new(carousel, PERIOD, event_tx);
        let (tx, rx) = mpsc::channel(8);
        (controller, tx, rx, event_rx)
    }

    /// Let the spawned controller task observe sends and timers
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn drain(rx: &mut broadcast::Receiver<UiEvent>) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn slide_changes(events: &[UiEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                UiEvent::SlideChanged { index } => Some(*index),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_advance_fires_each_period() {
        let (mut controller, _tx, rx, mut event_rx) = setup();
        tokio::spawn(async move { controller.run(rx).await });
        settle().await;

        time::advance(PERIOD + Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(slide_changes(&drain(&mut event_rx)), vec![1]);

        time::advance(PERIOD).await;
        settle().await;
        assert_eq!(slide_changes(&drain(&mut event_rx)), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_pauses_and_leave_resumes() {
        let (mut controller, tx, rx, mut event_rx) = setup();
        tokio::spawn(async move { controller.run(rx).await });
        settle().await;

        tx.send(SlideCommand::PointerEntered).await.unwrap();
        settle().await;
        let events = drain(&mut event_rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, UiEvent::AutoAdvancePaused)));

        // Two full periods pass while hovered, no slide changes
        time::advance(PERIOD * 2 + Duration::from_millis(10)).await;
        settle().await;
        assert!(slide_changes(&drain(&mut event_rx)).is_empty());

        tx.send(SlideCommand::PointerLeft).await.unwrap();
        settle().await;
        let events = drain(&mut event_rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, UiEvent::AutoAdvanceResumed)));

        time::advance(PERIOD + Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(slide_changes(&drain(&mut event_rx)), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_navigation_commands() {
        let (mut controller, tx, rx, mut event_rx) = setup();
        tokio::spawn(async move { controller.run(rx).await });
        settle().await;

        tx.send(SlideCommand::Next).await.unwrap();
        tx.send(SlideCommand::Dot { index: 2 }).await.unwrap();
        tx.send(SlideCommand::Prev).await.unwrap();
        settle().await;

        assert_eq!(slide_changes(&drain(&mut event_rx)), vec![1, 2, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_pointer_entry_is_idempotent() {
        let (mut controller, tx, rx, mut event_rx) = setup();
        tokio::spawn(async move { controller.run(rx).await });
        settle().await;

        tx.send(SlideCommand::PointerEntered).await.unwrap();
        tx.send(SlideCommand::PointerEntered).await.unwrap();
        settle().await;

        let pauses = drain(&mut event_rx)
            .iter()
            .filter(|e| matches!(e, UiEvent::AutoAdvancePaused))
            .count();
        assert_eq!(pauses, 1);
    }
}
