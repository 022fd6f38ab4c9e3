//! Multi-stage sprite playback.
//!
//! A playback is a list of stages, each a sprite played a fixed number of
//! times in a row. One tick shows one frame at the top-left corner.

use super::Animate;
use crate::canvas::{render_frame, Canvas};
use crate::sprite::Sprite;
use std::{rc::Rc, time::Duration};

/// One sprite and how many full play-throughs it gets.
#[derive(Clone, Debug)]
pub struct Stage {
    pub sprite: Rc<Sprite>,
    pub repeat: u32,
}

impl Stage {
    pub fn new(sprite: Rc<Sprite>, repeat: u32) -> Self {
        Self { sprite, repeat }
    }
}

#[derive(Debug)]
pub struct SpritePlayback {
    stages: Vec<Stage>,
    interval: Duration,
    stage_index: usize,
    loop_index: u32,
    frame_index: usize,
}

impl SpritePlayback {
    pub fn new(stages: Vec<Stage>, interval: Duration) -> Self {
        Self {
            stages,
            interval,
            stage_index: 0,
            loop_index: 0,
            frame_index: 0,
        }
    }

    /// Number of ticks one full cycle takes.
    pub fn cycle_length(&self) -> usize {
        self.stages
            .iter()
            .map(|s| s.sprite.len() * s.repeat.max(1) as usize)
            .sum()
    }

    /// Move to the next stage; returns `true` when the list is exhausted.
    fn next_stage(&mut self) -> bool {
        self.frame_index = 0;
        self.loop_index = 0;
        self.stage_index += 1;
        self.stage_index >= self.stages.len()
    }
}

impl Animate for SpritePlayback {
    fn init<C: Canvas>(&mut self, _canvas: &C) {
        self.stage_index = 0;
        self.loop_index = 0;
        self.frame_index = 0;
    }

    fn tick<C: Canvas>(&mut self, canvas: &mut C) -> bool {
        // Skip stages that have nothing to show.
        loop {
            let Some(stage) = self.stages.get(self.stage_index) else {
                return true;
            };
            if !stage.sprite.is_empty() {
                break;
            }
            if self.next_stage() {
                return true;
            }
        }

        let stage = &self.stages[self.stage_index];
        if let Some(frame) = stage.sprite.frame(self.frame_index) {
            render_frame(frame, canvas, 0, 0);
        }

        self.frame_index += 1;
        if self.frame_index < stage.sprite.len() {
            return false;
        }
        self.frame_index = 0;
        self.loop_index += 1;
        if self.loop_index < stage.repeat.max(1) {
            return false;
        }
        self.next_stage()
    }

    fn sleep_interval(&self) -> Duration {
        self.interval
    }
}
