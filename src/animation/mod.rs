//! # Animations
//!
//! The display cycles through a short, fixed playlist of animations. Each one
//! is a small state machine driven by the render loop:
//!
//! 1. `init` is called whenever the loop switches to the animation (including
//!    on wrap-around) and resets all progress.
//! 2. `tick` renders exactly one frame into a cleared buffer and reports
//!    whether this cycle of the animation is finished.
//! 3. `sleep_interval` tells the loop how long to show that frame.
//!
//! The set of animations is closed, so they are variants of one enum rather
//! than trait objects.

use crate::canvas::Canvas;
use std::time::Duration;

pub mod picker;
pub mod scrolling_text;
pub mod sprite_playback;
pub mod wave_chart;

pub use picker::{ColumnPicker, RoundRobin, UniformPicker};
pub use scrolling_text::ScrollingText;
pub use sprite_playback::{SpritePlayback, Stage};
pub use wave_chart::WaveChart;

/// The capability the render loop drives.
pub trait Animate {
    /// Reset progress before the animation is (re)entered.
    fn init<C: Canvas>(&mut self, canvas: &C);

    /// Render one frame; returns `true` once this cycle has completed.
    fn tick<C: Canvas>(&mut self, canvas: &mut C) -> bool;

    /// Delay to apply after the frame just rendered.
    fn sleep_interval(&self) -> Duration;
}

pub enum Animation {
    SpritePlayback(SpritePlayback),
    ScrollingText(ScrollingText),
    WaveChart(WaveChart),
}

impl Animation {
    pub fn name(&self) -> &'static str {
        match self {
            Animation::SpritePlayback(_) => "sprite-playback",
            Animation::ScrollingText(_) => "scrolling-text",
            Animation::WaveChart(_) => "wave-chart",
        }
    }
}

impl Animate for Animation {
    fn init<C: Canvas>(&mut self, canvas: &C) {
        match self {
            Animation::SpritePlayback(a) => a.init(canvas),
            Animation::ScrollingText(a) => a.init(canvas),
            Animation::WaveChart(a) => a.init(canvas),
        }
    }

    fn tick<C: Canvas>(&mut self, canvas: &mut C) -> bool {
        match self {
            Animation::SpritePlayback(a) => a.tick(canvas),
            Animation::ScrollingText(a) => a.tick(canvas),
            Animation::WaveChart(a) => a.tick(canvas),
        }
    }

    fn sleep_interval(&self) -> Duration {
        match self {
            Animation::SpritePlayback(a) => a.sleep_interval(),
            Animation::ScrollingText(a) => a.sleep_interval(),
            Animation::WaveChart(a) => a.sleep_interval(),
        }
    }
}

impl From<SpritePlayback> for Animation {
    fn from(a: SpritePlayback) -> Self {
        Animation::SpritePlayback(a)
    }
}

impl From<ScrollingText> for Animation {
    fn from(a: ScrollingText) -> Self {
        Animation::ScrollingText(a)
    }
}

impl From<WaveChart> for Animation {
    fn from(a: WaveChart) -> Self {
        Animation::WaveChart(a)
    }
}
