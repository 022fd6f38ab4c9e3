//! # Playlist
//!
//! The fixed animation sequence shown on the panel:
//!
//! 1. the wave sprite intro, played `wave_repeat` times
//! 2. per station, the headline scrolling in behind its trend arrow
//! 3. per station with a height profile, the wave chart
//!
//! The render loop then repeats the list from the top.

use crate::animation::{
    scrolling_text::Layout, Animation, ScrollingText, SpritePlayback, Stage, UniformPicker,
    WaveChart,
};
use crate::config::Config;
use crate::observation::{Headline, StationReport};
use crate::sprite::Sprite;
use crate::text::Glyphs;
use embedded_graphics::pixelcolor::Rgb888;
use std::rc::Rc;
use tracing::debug;

/// Arrow sprite frame for a rising trend; frame 1 is falling.
const ARROW_UP: usize = 0;
const ARROW_DOWN: usize = 1;

/// Decoded sprites and the font, shared by every animation.
#[derive(Debug, Clone)]
pub struct Assets {
    pub wave: Rc<Sprite>,
    pub arrows: Rc<Sprite>,
    pub glyphs: Glyphs,
}

/// What the playlist shows for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSlot {
    pub headline: Headline,
    /// Empty when there is no chart for the station
    pub profile: Vec<f32>,
}

impl From<&StationReport> for StationSlot {
    fn from(report: &StationReport) -> Self {
        Self {
            headline: Headline::from(report),
            profile: report.profile.clone(),
        }
    }
}

impl From<Headline> for StationSlot {
    fn from(headline: Headline) -> Self {
        Self {
            headline,
            profile: Vec::new(),
        }
    }
}

/// Assemble the animation sequence. Every chart draws columns from the
/// same `picker`.
pub fn build(
    config: &Config,
    assets: &Assets,
    stations: &[StationSlot],
    picker: &UniformPicker,
) -> Vec<Animation> {
    let timing = &config.timing;
    let [r, g, b] = config.text.color;
    let color = Rgb888::new(r, g, b);
    let layout = Layout {
        icon_top: config.text.icon_top,
        gap: config.text.gap,
    };

    let mut animations = vec![Animation::from(SpritePlayback::new(
        vec![Stage::new(
            Rc::clone(&assets.wave),
            config.assets.wave_repeat,
        )],
        timing.sprite_interval(),
    ))];

    for station in stations {
        let arrow = if station.headline.rising {
            ARROW_UP
        } else {
            ARROW_DOWN
        };
        animations.push(
            ScrollingText::new(
                Rc::clone(&assets.arrows),
                arrow,
                station.headline.label.clone(),
                assets.glyphs,
                color,
                layout,
                timing.scroll_interval(),
            )
            .into(),
        );

        if !station.profile.is_empty() {
            animations.push(
                WaveChart::new(
                    station.profile.clone(),
                    timing.chart_hold_ticks,
                    timing.chart_interval(),
                    Box::new(picker.clone()),
                )
                .into(),
            );
        }
    }

    debug!(
        animations = animations.len(),
        stations = stations.len(),
        "playlist built"
    );
    animations
}
