//! Carousel module for the featured-recipe slider
//!
//! State lives in [`Carousel`]: an ordered slide set with exactly one
//! active slide, plus a 1:1 dot indicator set. [`CarouselController`]
//! drives it from bridge commands and the auto-advance timer.

mod controller;
mod slides;

pub use controller::{CarouselController, SlideCommand};
pub use slides::{Carousel, Dot, Slide};
