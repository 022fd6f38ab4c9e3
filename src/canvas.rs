//! # Pixel Buffers and Frame Rendering
//!
//! Everything the animations draw on is an `embedded-graphics` draw target
//! with an RGB888 colour space. The in-memory [`FrameBuffer`] backs the
//! terminal and test displays; the LED panel driver wraps its own canvas.
//!
//! [`render_frame`] is the single place where sprite frames reach a buffer.
//! Pixels landing outside the buffer are dropped, which is what lets sprites
//! and headlines slide in from the right and out past the left edge without
//! any special casing in the animations.

use crate::sprite::Frame;
use core::convert::Infallible;
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

/// Anything an animation can render into.
pub trait Canvas: DrawTarget<Color = Rgb888, Error = Infallible> + OriginDimensions {
    fn width(&self) -> i32 {
        self.size().width as i32
    }

    fn height(&self) -> i32 {
        self.size().height as i32
    }

    /// Write one pixel, ignoring coordinates outside the canvas.
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        if x < 0 || y < 0 || x >= Canvas::width(self) || y >= Canvas::height(self) {
            return;
        }
        let drawn = self.draw_iter(core::iter::once(Pixel(Point::new(x, y), color)));
        if let Err(never) = drawn {
            match never {}
        }
    }
}

impl<T> Canvas for T where T: DrawTarget<Color = Rgb888, Error = Infallible> + OriginDimensions {}

/// Owned row-major RGB buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb888::BLACK; (width * height) as usize],
        }
    }

    /// Reset every pixel to black.
    pub fn clear(&mut self) {
        self.pixels.fill(Rgb888::BLACK);
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgb888> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        self.pixels.get((y as u32 * self.width + x as u32) as usize).copied()
    }

    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Number of pixels that are not black.
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|p| **p != Rgb888::BLACK).count()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < self.width && y < self.height {
                self.pixels[(y * self.width + x) as usize] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

/// Paint `frame` with its top-left corner at `(left, top)`.
///
/// Only pixels whose buffer coordinates fall inside the canvas are written.
pub fn render_frame<C: Canvas>(frame: &Frame, canvas: &mut C, left: i32, top: i32) {
    let (width, height) = (Canvas::width(canvas), Canvas::height(canvas));
    let frame_width = frame.width() as i32;

    let visible = frame
        .pixels()
        .iter()
        .enumerate()
        .filter_map(|(i, color)| {
            let x = left + i as i32 % frame_width;
            let y = top + i as i32 / frame_width;
            (x >= 0 && y >= 0 && x < width && y < height).then_some(Pixel(Point::new(x, y), *color))
        });

    if let Err(never) = canvas.draw_iter(visible) {
        match never {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    fn solid(width: u8, height: u8, color: Rgb888) -> Frame {
        Frame::new(width, height, vec![color; width as usize * height as usize]).unwrap()
    }

    #[test]
    fn test_render_inside_bounds() {
        let mut buffer = FrameBuffer::new(32, 16);
        render_frame(&solid(2, 3, Rgb888::RED), &mut buffer, 4, 5);

        assert_eq!(buffer.lit(), 6);
        assert_eq!(buffer.get(4, 5), Some(Rgb888::RED));
        assert_eq!(buffer.get(5, 7), Some(Rgb888::RED));
        assert_eq!(buffer.get(6, 5), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_render_fully_outside_leaves_buffer_untouched() {
        let mut buffer = FrameBuffer::new(32, 16);
        let frame = solid(8, 8, Rgb888::GREEN);

        for (left, top) in [(32, 0), (-8, 0), (0, 16), (0, -8), (-100, -100), (500, 3)] {
            render_frame(&frame, &mut buffer, left, top);
        }

        assert_eq!(buffer, FrameBuffer::new(32, 16));
    }

    #[test]
    fn test_render_straddling_edges_writes_in_bounds_subset() {
        let mut buffer = FrameBuffer::new(32, 16);
        // 4x4 frame hanging two columns off the left and one row off the top
        render_frame(&solid(4, 4, Rgb888::BLUE), &mut buffer, -2, -1);

        assert_eq!(buffer.lit(), 2 * 3);
        assert_eq!(buffer.get(0, 0), Some(Rgb888::BLUE));
        assert_eq!(buffer.get(1, 2), Some(Rgb888::BLUE));
        assert_eq!(buffer.get(2, 0), Some(Rgb888::BLACK));

        let mut buffer = FrameBuffer::new(32, 16);
        render_frame(&solid(4, 4, Rgb888::BLUE), &mut buffer, 30, 14);
        assert_eq!(buffer.lit(), 4);
        assert_eq!(buffer.get(31, 15), Some(Rgb888::BLUE));
    }

    #[test]
    fn test_render_never_draws_out_of_bounds() {
        // MockDisplay panics on any out-of-bounds pixel
        let mut display = MockDisplay::<Rgb888>::new();
        render_frame(&solid(10, 10, Rgb888::WHITE), &mut display, 58, 60);

        assert_eq!(display.get_pixel(Point::new(63, 63)), Some(Rgb888::WHITE));
        assert_eq!(display.get_pixel(Point::new(57, 63)), None);
    }

    #[test]
    fn test_zero_sized_frame_renders_nothing() {
        let mut buffer = FrameBuffer::new(32, 16);
        render_frame(&solid(0, 5, Rgb888::WHITE), &mut buffer, 0, 0);
        render_frame(&solid(5, 0, Rgb888::WHITE), &mut buffer, 0, 0);
        assert_eq!(buffer.lit(), 0);
    }

    #[test]
    fn test_set_pixel_clips() {
        let mut buffer = FrameBuffer::new(4, 4);
        buffer.set_pixel(-1, 0, Rgb888::RED);
        buffer.set_pixel(4, 0, Rgb888::RED);
        buffer.set_pixel(3, 3, Rgb888::RED);
        assert_eq!(buffer.lit(), 1);

        buffer.clear();
        assert_eq!(buffer.lit(), 0);
    }
}
