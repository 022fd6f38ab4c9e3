//! # Display Drivers
//!
//! The render loop only needs a handful of operations from a display: a
//! frame buffer to draw into, a way to blank it, and a double-buffered swap
//! that shows the finished frame and hands back the off-screen one.
//!
//! Implementations:
//! - [`MemoryDisplay`]: keeps every submitted frame, used by tests
//! - [`TerminalDisplay`]: ANSI true-colour rendering for development (`--stdout`)
//! - `MatrixDisplay`: the HUB75 LED panel, only with the `hardware` feature

use crate::canvas::{Canvas, FrameBuffer};

#[cfg(feature = "hardware")]
pub mod matrix;
pub mod terminal;

#[cfg(feature = "hardware")]
pub use matrix::MatrixDisplay;
pub use terminal::TerminalDisplay;

pub trait Display {
    type Buffer: Canvas;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Allocate an off-screen buffer matching the display.
    fn create_frame_buffer(&mut self) -> Self::Buffer;

    /// Blank a buffer before an animation draws into it.
    fn clear(&mut self, buffer: &mut Self::Buffer);

    /// Show `buffer` on the next refresh and return a buffer that is no
    /// longer visible, ready to be drawn again.
    fn submit_and_swap(&mut self, buffer: Self::Buffer) -> Self::Buffer;

    /// Blank the panel before the process exits.
    fn shutdown(&mut self) {}
}

/// In-memory display that records every frame it is asked to show.
#[derive(Debug)]
pub struct MemoryDisplay {
    width: u32,
    height: u32,
    front: Option<FrameBuffer>,
    submitted: Vec<FrameBuffer>,
}

impl MemoryDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            front: None,
            submitted: Vec::new(),
        }
    }

    pub fn submitted(&self) -> &[FrameBuffer] {
        &self.submitted
    }

    /// Frame currently on screen.
    pub fn front(&self) -> Option<&FrameBuffer> {
        self.front.as_ref()
    }
}

impl Display for MemoryDisplay {
    type Buffer = FrameBuffer;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn create_frame_buffer(&mut self) -> FrameBuffer {
        FrameBuffer::new(self.width, self.height)
    }

    fn clear(&mut self, buffer: &mut FrameBuffer) {
        buffer.clear();
    }

    fn submit_and_swap(&mut self, buffer: FrameBuffer) -> FrameBuffer {
        self.submitted.push(buffer.clone());
        self.front
            .replace(buffer)
            .unwrap_or_else(|| FrameBuffer::new(self.width, self.height))
    }

    fn shutdown(&mut self) {
        if let Some(front) = self.front.as_mut() {
            front.clear();
        }
    }
}
