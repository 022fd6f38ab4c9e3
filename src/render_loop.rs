//! # Render Loop
//!
//! Runs the animation playlist on a single thread:
//!
//! ```text
//! clear buffer -> tick current animation -> submit + swap -> pause
//! ```
//!
//! When an animation reports completion the loop moves on to the next one
//! (wrapping around after the last) and calls its `init` before the pause,
//! so the new animation's pacing takes effect straight away.
//!
//! Cancellation is cooperative. The token is checked at every tick boundary
//! and again before a frame is submitted; once it is set, nothing more is
//! shown and `run` returns so the caller can blank the panel.

use crate::animation::Animate;
use crate::display::Display;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::{thread, time::Duration};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
#[error("render loop needs at least one animation")]
pub struct EmptySequence;

/// Shared stop flag, set from the signal handler.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Applies the delay between frames.
pub trait Pacer {
    fn pause(&mut self, interval: Duration);
}

/// Blocks the render thread for the requested interval.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, interval: Duration) {
        thread::sleep(interval);
    }
}

pub struct RenderLoop<A> {
    animations: Vec<A>,
    current: usize,
}

impl<A: Animate> RenderLoop<A> {
    pub fn new(animations: Vec<A>) -> Result<Self, EmptySequence> {
        if animations.is_empty() {
            return Err(EmptySequence);
        }
        Ok(Self {
            animations,
            current: 0,
        })
    }

    /// Index of the animation currently playing.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn animations(&self) -> &[A] {
        &self.animations
    }

    /// Run until `token` is cancelled. Returns the number of frames shown.
    pub fn run<D, P>(&mut self, display: &mut D, pacer: &mut P, token: &CancellationToken) -> u64
    where
        D: Display,
        P: Pacer,
    {
        let (width, height) = (display.width(), display.height());
        info!(
            animations = self.animations.len(),
            width,
            height,
            "render loop starting"
        );

        let mut buffer = display.create_frame_buffer();
        self.current = 0;
        self.animations[0].init(&buffer);

        let mut frames = 0;
        while !token.is_cancelled() {
            display.clear(&mut buffer);
            let complete = self.animations[self.current].tick(&mut buffer);

            if token.is_cancelled() {
                break;
            }
            buffer = display.submit_and_swap(buffer);
            frames += 1;

            if complete {
                self.current = (self.current + 1) % self.animations.len();
                debug!(next = self.current, frames, "animation complete");
                self.animations[self.current].init(&buffer);
            }

            pacer.pause(self.animations[self.current].sleep_interval());
        }

        info!(frames, "render loop cancelled");
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::display::MemoryDisplay;
    use embedded_graphics::pixelcolor::Rgb888;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Init(usize),
        Tick(usize),
    }

    /// Animation that completes every `length` ticks and logs its calls.
    struct Scripted {
        id: usize,
        length: usize,
        ticks: usize,
        interval: Duration,
        log: Rc<RefCell<Vec<Event>>>,
    }

    impl Animate for Scripted {
        fn init<C: Canvas>(&mut self, _canvas: &C) {
            self.ticks = 0;
            self.log.borrow_mut().push(Event::Init(self.id));
        }

        fn tick<C: Canvas>(&mut self, canvas: &mut C) -> bool {
            self.ticks += 1;
            self.log.borrow_mut().push(Event::Tick(self.id));
            canvas.set_pixel(self.id as i32, 0, Rgb888::new(255, 255, 255));
            self.ticks >= self.length
        }

        fn sleep_interval(&self) -> Duration {
            self.interval
        }
    }

    /// Records pauses and cancels after a fixed number of them.
    struct StopAfter {
        remaining: usize,
        token: CancellationToken,
        pauses: Vec<Duration>,
    }

    impl Pacer for StopAfter {
        fn pause(&mut self, interval: Duration) {
            self.pauses.push(interval);
            self.remaining -= 1;
            if self.remaining == 0 {
                self.token.cancel();
            }
        }
    }

    fn scripted(lengths: &[usize], log: &Rc<RefCell<Vec<Event>>>) -> Vec<Scripted> {
        lengths
            .iter()
            .enumerate()
            .map(|(id, &length)| Scripted {
                id,
                length,
                ticks: 0,
                interval: Duration::from_millis(10 * (id as u64 + 1)),
                log: Rc::clone(log),
            })
            .collect()
    }

    #[test]
    fn test_empty_sequence_rejected() {
        assert!(RenderLoop::<Scripted>::new(Vec::new()).is_err());
    }

    #[test]
    fn test_init_order_follows_cycle() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut render = RenderLoop::new(scripted(&[2, 3], &log)).unwrap();
        let token = CancellationToken::new();
        let mut pacer = StopAfter {
            remaining: 11,
            token: token.clone(),
            pauses: Vec::new(),
        };
        let mut display = MemoryDisplay::new(32, 16);

        let frames = render.run(&mut display, &mut pacer, &token);

        use Event::*;
        assert_eq!(
            *log.borrow(),
            vec![
                Init(0),
                Tick(0),
                Tick(0),
                Init(1),
                Tick(1),
                Tick(1),
                Tick(1),
                Init(0),
                Tick(0),
                Tick(0),
                Init(1),
                Tick(1),
                Tick(1),
                Tick(1),
                Init(0),
                Tick(0),
            ]
        );
        assert_eq!(frames, 11);
        assert_eq!(display.submitted().len(), 11);
        assert_eq!(render.current(), 0);
    }

    #[test]
    fn test_pause_uses_interval_of_next_animation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut render = RenderLoop::new(scripted(&[1, 2], &log)).unwrap();
        let token = CancellationToken::new();
        let mut pacer = StopAfter {
            remaining: 4,
            token: token.clone(),
            pauses: Vec::new(),
        };
        let mut display = MemoryDisplay::new(32, 16);

        render.run(&mut display, &mut pacer, &token);

        let ms: Vec<u64> = pacer.pauses.iter().map(|d| d.as_millis() as u64).collect();
        // a pause always uses the animation that will tick next
        assert_eq!(ms, vec![20, 20, 10, 20]);
    }

    #[test]
    fn test_cancelled_before_start_submits_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut render = RenderLoop::new(scripted(&[5], &log)).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let mut display = MemoryDisplay::new(32, 16);

        let frames = render.run(&mut display, &mut ThreadPacer, &token);

        assert_eq!(frames, 0);
        assert!(display.submitted().is_empty());
        assert_eq!(*log.borrow(), vec![Event::Init(0)]);
    }

    /// Animation that cancels the loop while rendering.
    struct CancelInTick(CancellationToken);

    impl Animate for CancelInTick {
        fn init<C: Canvas>(&mut self, _canvas: &C) {}

        fn tick<C: Canvas>(&mut self, _canvas: &mut C) -> bool {
            self.0.cancel();
            false
        }

        fn sleep_interval(&self) -> Duration {
            Duration::ZERO
        }
    }

    #[test]
    fn test_no_submit_after_cancellation_mid_tick() {
        let token = CancellationToken::new();
        let mut render = RenderLoop::new(vec![CancelInTick(token.clone())]).unwrap();
        let mut display = MemoryDisplay::new(32, 16);

        let frames = render.run(&mut display, &mut ThreadPacer, &token);

        assert_eq!(frames, 0);
        assert!(display.submitted().is_empty());
    }

    #[test]
    fn test_each_frame_starts_cleared() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut render = RenderLoop::new(scripted(&[1, 1, 1], &log)).unwrap();
        let token = CancellationToken::new();
        let mut pacer = StopAfter {
            remaining: 3,
            token: token.clone(),
            pauses: Vec::new(),
        };
        let mut display = MemoryDisplay::new(4, 2);

        render.run(&mut display, &mut pacer, &token);

        for (id, frame) in display.submitted().iter().enumerate() {
            assert_eq!(frame.lit(), 1);
            assert_eq!(frame.get(id as i32, 0), Some(Rgb888::new(255, 255, 255)));
        }
    }
}
