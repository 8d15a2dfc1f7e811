//! Carousel slide and dot state
//!
//! Holds the ordered slide set and its dot indicators, keeps the
//! exactly-one-active invariant, and wraps indices in both directions.

use tokio::sync::broadcast;
use tracing::debug;

use crate::events::UiEvent;

/// One content panel in the carousel
#[derive(Debug, Clone)]
pub struct Slide {
    /// Stable identifier, e.g. the featured recipe's slug
    pub label: String,
    /// Active marker (the frontend's `is-active` class)
    pub active: bool,
}

impl Slide {
    /// Create an inactive slide
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            active: false,
        }
    }
}

/// One dot indicator, positionally tied to a slide
#[derive(Debug, Clone)]
pub struct Dot {
    /// Accessible label, 1-based ("Go to slide 3")
    pub label: String,
    /// Current marker (the frontend's `aria-current` attribute)
    pub current: bool,
}

/// The carousel's slide set, dot set, and active index
pub struct Carousel {
    slides: Vec<Slide>,
    dots: Vec<Dot>,
    active_index: usize,
    event_tx: broadcast::Sender<UiEvent>,
}

impl Carousel {
    /// Create a carousel over the given slides.
    ///
    /// Returns `None` for an empty slide set (the page has no carousel).
    /// A pre-marked active slide is honored; with none marked, index 0
    /// becomes active. Extra active markers are normalized off.
    pub fn new(slides: Vec<Slide>, event_tx: broadcast::Sender<UiEvent>) -> Option<Self> {
        if slides.is_empty() {
            return None;
        }

        let active_index = slides.iter().position(|s| s.active).unwrap_or(0);

        let dots = (0..slides.len())
            .map(|i| Dot {
                label: format!("Go to slide {}", i + 1),
                current: false,
            })
            .collect();

        let mut carousel = Self {
            slides,
            dots,
            active_index,
            event_tx,
        };
        carousel.sync_markers();

        debug!(
            slides = carousel.slides.len(),
            active = carousel.active_index,
            "carousel initialized"
        );

        Some(carousel)
    }

    /// Number of slides
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Current active index
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The slide set
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// The dot indicator set
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Activate the slide at `index`, wrapping modulo the slide count in
    /// both directions. Afterwards exactly one slide is active and
    /// exactly one dot is current, both at the new index.
    pub fn go_to(&mut self, index: isize) {
        let n = self.slides.len() as isize;
        self.active_index = index.rem_euclid(n) as usize;
        self.sync_markers();

        let _ = self.event_tx.send(UiEvent::SlideChanged {
            index: self.active_index,
        });
    }

    /// Advance to the next slide
    pub fn next(&mut self) {
        self.go_to(self.active_index as isize + 1);
    }

    /// Step back to the previous slide
    pub fn prev(&mut self) {
        self.go_to(self.active_index as isize - 1);
    }

    /// Re-derive every slide and dot marker from the active index
    fn sync_markers(&mut self) {
        for (i, slide) in self.slides.iter_mut().enumerate() {
            slide.active = i == self.active_index;
        }
        for (i, dot) in self.dots.iter_mut().enumerate() {
            dot.current = i == self.active_index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(n: usize) -> Carousel {
        let (tx, _) = broadcast::channel(16);
        let slides = (0..n).map(|i| Slide::new(format!("slide-{i}"))).collect();
        Carousel::new(slides, tx).unwrap()
    }

    fn assert_single_active(c: &Carousel) {
        let active: Vec<usize> = c
            .slides()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(active, vec![c.active_index()]);

        let current: Vec<usize> = c
            .dots()
            .iter()
            .enumerate()
            .filter(|(_, d)| d.current)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(current, vec![c.active_index()]);
    }

    #[test]
    fn test_empty_slide_set_aborts() {
        let (tx, _) = broadcast::channel(16);
        assert!(Carousel::new(Vec::new(), tx).is_none());
    }

    #[test]
    fn test_initial_default_active() {
        let c = carousel(3);
        assert_eq!(c.active_index(), 0);
        assert_single_active(&c);
    }

    #[test]
    fn test_premarked_active_honored() {
        let (tx, _) = broadcast::channel(16);
        let mut slides: Vec<Slide> = (0..4).map(|i| Slide::new(format!("s{i}"))).collect();
        slides[2].active = true;
        let c = Carousel::new(slides, tx).unwrap();
        assert_eq!(c.active_index(), 2);
        assert_single_active(&c);
    }

    #[test]
    fn test_extra_markers_normalized() {
        let (tx, _) = broadcast::channel(16);
        let mut slides: Vec<Slide> = (0..4).map(|i| Slide::new(format!("s{i}"))).collect();
        slides[1].active = true;
        slides[3].active = true;
        let c = Carousel::new(slides, tx).unwrap();
        assert_eq!(c.active_index(), 1);
        assert_single_active(&c);
    }

    #[test]
    fn test_wraparound_both_directions() {
        let mut c = carousel(5);
        c.go_to(-1);
        assert_eq!(c.active_index(), 4);
        c.go_to(5);
        assert_eq!(c.active_index(), 0);
        c.go_to(-7);
        assert_eq!(c.active_index(), 3);
        assert_single_active(&c);
    }

    #[test]
    fn test_next_prev_sequence_keeps_invariant() {
        let mut c = carousel(4);
        c.next();
        c.next();
        c.prev();
        c.go_to(9);
        c.prev();
        assert_eq!(c.active_index(), 0);
        assert_single_active(&c);
    }

    #[test]
    fn test_single_slide_wraps_onto_itself() {
        let mut c = carousel(1);
        c.next();
        c.prev();
        assert_eq!(c.active_index(), 0);
        assert_single_active(&c);
    }

    #[test]
    fn test_dot_count_and_labels() {
        let c = carousel(3);
        assert_eq!(c.dots().len(), c.len());
        assert_eq!(c.dots()[0].label, "Go to slide 1");
        assert_eq!(c.dots()[2].label, "Go to slide 3");
    }

    #[test]
    fn test_slide_changed_emitted() {
        let (tx, mut rx) = broadcast::channel(16);
        let slides = (0..3).map(|i| Slide::new(format!("s{i}"))).collect();
        let mut c = Carousel::new(slides, tx).unwrap();
        c.next();
        match rx.try_recv().unwrap() {
            UiEvent::SlideChanged { index } => assert_eq!(index, 1),
            other => panic!("unexpected event: {other}"),
        }
    }
}
