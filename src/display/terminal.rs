//! Development display: draws each frame in the terminal with 24-bit ANSI
//! colours, two characters per LED so the panel keeps its aspect ratio.

use super::Display;
use crate::canvas::FrameBuffer;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use std::io::{self, Write};
use tracing::warn;

const HOME: &str = "\x1b[H";
const CLEAR_SCREEN: &str = "\x1b[2J";
const RESET: &str = "\x1b[0m";

pub struct TerminalDisplay<W: Write = io::Stdout> {
    out: W,
    width: u32,
    height: u32,
    failed: bool,
}

impl TerminalDisplay {
    pub fn stdout(width: u32, height: u32) -> Self {
        Self::new(io::stdout(), width, height)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, width: u32, height: u32) -> Self {
        Self {
            out,
            width,
            height,
            failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, buffer: &FrameBuffer) -> io::Result<()> {
        let mut screen = String::with_capacity((self.width * self.height * 24) as usize);
        screen.push_str(HOME);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                match buffer.get(x, y) {
                    Some(color) if color != Rgb888::BLACK => {
                        screen.push_str(&format!(
                            "\x1b[38;2;{};{};{}m██",
                            color.r(),
                            color.g(),
                            color.b()
                        ));
                    }
                    _ => screen.push_str("  "),
                }
            }
            screen.push_str(RESET);
            screen.push('\n');
        }
        self.out.write_all(screen.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    type Buffer = FrameBuffer;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn create_frame_buffer(&mut self) -> FrameBuffer {
        if let Err(e) = write!(self.out, "{}", CLEAR_SCREEN) {
            warn!("terminal write failed: {}", e);
        }
        FrameBuffer::new(self.width, self.height)
    }

    fn clear(&mut self, buffer: &mut FrameBuffer) {
        buffer.clear();
    }

    fn submit_and_swap(&mut self, buffer: FrameBuffer) -> FrameBuffer {
        if let Err(e) = self.draw(&buffer) {
            // a closed pipe would otherwise log once per frame
            if !self.failed {
                warn!("terminal write failed: {}", e);
                self.failed = true;
            }
        }
        buffer
    }

    fn shutdown(&mut self) {
        let blank = FrameBuffer::new(self.width, self.height);
        if self.draw(&blank).is_err() {
            return;
        }
        let _ = write!(self.out, "{}", RESET);
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    #[test]
    fn test_frame_is_written_as_coloured_blocks() {
        let mut display = TerminalDisplay::new(Vec::new(), 3, 2);
        let mut buffer = display.create_frame_buffer();
        buffer.set_pixel(1, 0, Rgb888::new(1, 2, 3));

        let buffer = display.submit_and_swap(buffer);
        assert_eq!(buffer.lit(), 1);

        let out = String::from_utf8(display.into_inner()).unwrap();
        assert!(out.starts_with(CLEAR_SCREEN));
        assert!(out.contains("\x1b[38;2;1;2;3m██"));
        assert_eq!(out.matches('\n').count(), 2);
        assert_eq!(out.matches('█').count(), 2);
    }
}
