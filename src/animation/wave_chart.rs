//! # Wave-Height Chart
//!
//! Shows a station's hourly wave-height profile as columns of falling light
//! "drops". Each display column gets one height sample; a sample of `h` feet
//! becomes `ceil(h)` drops that fall one at a time and stack up from the
//! bottom row, so the resting stack is as tall as the measured height. The
//! top drop of a fractional height is dimmed by the fractional part.
//!
//! ## Simulation
//!
//! Each drop moves through `Pending -> Falling -> Exiting`. Every tick:
//!
//! 1. Exiting drops, and falling drops above their floor, move down one row.
//!    A drop's floor is `rows - 1 - index` where `index` is its position in
//!    the column, so later drops settle on top of earlier ones.
//! 2. Creating: while anything is pending, one drop (in a randomly chosen
//!    column, probing right on a miss) starts falling.
//! 3. Holding: once nothing is pending, the settled chart stays up for a
//!    fixed number of ticks.
//! 4. Draining: one falling drop per tick starts exiting, chosen the same way
//!    as in step 2. Exiting drops fall through the floor and off the display.
//! 5. Every drop that has left `Pending` is painted blue, scaled by its
//!    brightness.
//!
//! The chart is done once every drop is exiting and below the last row.

use super::{Animate, ColumnPicker};
use crate::canvas::Canvas;
use embedded_graphics::pixelcolor::Rgb888;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropState {
    Pending,
    Falling,
    Exiting,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Droplet {
    pub state: DropState,
    pub row: i32,
    /// 0.0..=1.0, only below 1.0 for the top drop of a fractional height
    pub brightness: f32,
}

impl Droplet {
    fn pending(brightness: f32) -> Self {
        Self {
            state: DropState::Pending,
            row: 0,
            brightness,
        }
    }
}

/// Build the drops for one height sample.
///
/// Negative and NaN heights produce an empty column.
pub fn column_drops(height: f32) -> Vec<Droplet> {
    if height.is_nan() || height <= 0.0 {
        return Vec::new();
    }
    let count = height.ceil() as usize;
    let fraction = height - height.floor();
    let top = if fraction == 0.0 { 1.0 } else { fraction };

    let mut drops = vec![Droplet::pending(1.0); count];
    if let Some(last) = drops.last_mut() {
        last.brightness = top;
    }
    drops
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Creating,
    Holding(u32),
    Draining,
}

pub struct WaveChart {
    profile: Vec<f32>,
    hold_ticks: u32,
    interval: Duration,
    picker: Box<dyn ColumnPicker>,
    columns: Vec<Vec<Droplet>>,
    rows: i32,
    phase: Phase,
}

impl WaveChart {
    /// `profile` holds one height in feet per display column.
    pub fn new(
        profile: Vec<f32>,
        hold_ticks: u32,
        interval: Duration,
        picker: Box<dyn ColumnPicker>,
    ) -> Self {
        Self {
            profile,
            hold_ticks,
            interval,
            picker,
            columns: Vec::new(),
            rows: 0,
            phase: Phase::Creating,
        }
    }

    pub fn columns(&self) -> &[Vec<Droplet>] {
        &self.columns
    }

    /// All drops have exited below the last row.
    pub fn is_drained(&self) -> bool {
        self.phase == Phase::Draining
            && self
                .columns
                .iter()
                .flatten()
                .all(|d| d.state == DropState::Exiting && d.row >= self.rows)
    }

    fn advance(&mut self) {
        let rows = self.rows;
        for column in &mut self.columns {
            for (index, drop) in column.iter_mut().enumerate() {
                let floor = rows - 1 - index as i32;
                let moving = match drop.state {
                    DropState::Pending => false,
                    DropState::Falling => drop.row < floor,
                    DropState::Exiting => true,
                };
                if moving {
                    drop.row += 1;
                }
            }
        }
    }

    /// Move the first drop in state `from` of a randomly picked column to
    /// `to`, probing rightwards past columns that have none.
    fn promote(&mut self, from: DropState, to: DropState) -> bool {
        let count = self.columns.len();
        if count == 0 {
            return false;
        }
        let start = self.picker.pick(count);
        for offset in 0..count {
            let column = &mut self.columns[(start + offset) % count];
            if let Some(drop) = column.iter_mut().find(|d| d.state == from) {
                drop.state = to;
                return true;
            }
        }
        false
    }

    fn has_pending(&self) -> bool {
        self.columns
            .iter()
            .flatten()
            .any(|d| d.state == DropState::Pending)
    }

    fn step(&mut self) {
        match self.phase {
            Phase::Creating => {
                self.promote(DropState::Pending, DropState::Falling);
                if !self.has_pending() {
                    self.phase = Phase::Holding(self.hold_ticks);
                }
            }
            Phase::Holding(0) => {
                self.phase = Phase::Draining;
                self.promote(DropState::Falling, DropState::Exiting);
            }
            Phase::Holding(remaining) => self.phase = Phase::Holding(remaining - 1),
            Phase::Draining => {
                self.promote(DropState::Falling, DropState::Exiting);
            }
        }
    }

    fn paint<C: Canvas>(&self, canvas: &mut C) {
        for (x, column) in self.columns.iter().enumerate() {
            for drop in column.iter().filter(|d| d.state != DropState::Pending) {
                let blue = (255.0 * drop.brightness.clamp(0.0, 1.0)) as u8;
                canvas.set_pixel(x as i32, drop.row, Rgb888::new(0, 0, blue));
            }
        }
    }
}

impl Animate for WaveChart {
    fn init<C: Canvas>(&mut self, canvas: &C) {
        self.rows = canvas.height();
        self.columns = self.profile.iter().map(|&h| column_drops(h)).collect();
        self.phase = if self.has_pending() {
            Phase::Creating
        } else {
            Phase::Holding(self.hold_ticks)
        };
    }

    fn tick<C: Canvas>(&mut self, canvas: &mut C) -> bool {
        self.advance();
        self.step();
        self.paint(canvas);
        self.is_drained()
    }

    fn sleep_interval(&self) -> Duration {
        self.interval
    }
}

impl std::fmt::Debug for WaveChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveChart")
            .field("profile", &self.profile)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
