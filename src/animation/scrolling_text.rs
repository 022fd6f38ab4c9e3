//! Headline ticker: an icon followed by a line of text, scrolling right to
//! left one column per tick until both have left the display.

use super::Animate;
use crate::canvas::{render_frame, Canvas};
use crate::sprite::Sprite;
use crate::text::{draw_text, Glyphs};
use embedded_graphics::pixelcolor::Rgb888;
use std::{rc::Rc, time::Duration};

/// Where the icon and text sit relative to each other.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    /// Row of the icon's top edge
    pub icon_top: i32,
    /// Blank columns between icon and text
    pub gap: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Self { icon_top: 4, gap: 2 }
    }
}

#[derive(Debug)]
pub struct ScrollingText {
    icon: Rc<Sprite>,
    icon_frame: usize,
    text: String,
    glyphs: Glyphs,
    color: Rgb888,
    layout: Layout,
    interval: Duration,
    left: i32,
}

impl ScrollingText {
    pub fn new(
        icon: Rc<Sprite>,
        icon_frame: usize,
        text: impl Into<String>,
        glyphs: Glyphs,
        color: Rgb888,
        layout: Layout,
        interval: Duration,
    ) -> Self {
        Self {
            icon,
            icon_frame,
            text: text.into(),
            glyphs,
            color,
            layout,
            interval,
            left: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn icon_width(&self) -> i32 {
        self.icon
            .frame(self.icon_frame)
            .map_or(0, |frame| frame.width() as i32)
    }
}

impl Animate for ScrollingText {
    fn init<C: Canvas>(&mut self, canvas: &C) {
        self.left = canvas.width();
    }

    fn tick<C: Canvas>(&mut self, canvas: &mut C) -> bool {
        self.left -= 1;

        if let Some(frame) = self.icon.frame(self.icon_frame) {
            render_frame(frame, canvas, self.left, self.layout.icon_top);
        }

        let text_left = self.left + self.icon_width() + self.layout.gap;
        let advance = draw_text(
            canvas,
            &self.glyphs,
            text_left,
            self.glyphs.baseline(),
            self.color,
            &self.text,
        );

        text_left + advance < 0
    }

    fn sleep_interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::FrameBuffer;
    use crate::sprite::Frame;
    use embedded_graphics::pixelcolor::RgbColor;

    fn arrow(width: u8) -> Rc<Sprite> {
        let pixels = vec![Rgb888::GREEN; width as usize * 5];
        Rc::new(Sprite::new(vec![Frame::new(width, 5, pixels).unwrap()]))
    }

    fn ticker(icon_width: u8, text: &str) -> ScrollingText {
        ScrollingText::new(
            arrow(icon_width),
            0,
            text,
            Glyphs::by_name("6x10").unwrap(),
            Rgb888::WHITE,
            Layout { icon_top: 4, gap: 2 },
            Duration::from_millis(50),
        )
    }

    fn ticks_to_complete(animation: &mut ScrollingText, width: u32) -> usize {
        animation.init(&FrameBuffer::new(width, 16));
        for n in 1..=10_000 {
            if animation.tick(&mut FrameBuffer::new(width, 16)) {
                return n;
            }
        }
        panic!("ticker never completed");
    }

    #[test]
    fn test_completion_tick_count() {
        // W + Fw + G + T + 1 = 32 + 5 + 2 + 12 + 1
        let mut animation = ticker(5, "AB");
        assert_eq!(ticks_to_complete(&mut animation, 32), 52);

        // re-entering starts from the right edge again
        assert_eq!(ticks_to_complete(&mut animation, 32), 52);
    }

    #[test]
    fn test_completion_without_text_or_icon() {
        let mut animation = ticker(7, "");
        assert_eq!(ticks_to_complete(&mut animation, 32), 32 + 7 + 2 + 1);

        let mut missing_icon = ScrollingText::new(
            Rc::new(Sprite::default()),
            3,
            "A",
            Glyphs::by_name("6x10").unwrap(),
            Rgb888::WHITE,
            Layout { icon_top: 0, gap: 1 },
            Duration::from_millis(50),
        );
        assert_eq!(ticks_to_complete(&mut missing_icon, 16), 16 + 1 + 6 + 1);
    }

    #[test]
    fn test_first_tick_shows_icon_at_right_edge() {
        let mut animation = ticker(3, "x");
        animation.init(&FrameBuffer::new(32, 16));

        let mut buffer = FrameBuffer::new(32, 16);
        assert!(!animation.tick(&mut buffer));

        // only the icon's first column is on screen
        assert_eq!(buffer.get(31, 4), Some(Rgb888::GREEN));
        assert_eq!(buffer.get(30, 4), Some(Rgb888::BLACK));
        assert_eq!(buffer.get(31, 3), Some(Rgb888::BLACK));
        assert_eq!(buffer.lit(), 5);
    }

    #[test]
    fn test_text_follows_icon() {
        let mut animation = ticker(3, "HHHH");
        animation.init(&FrameBuffer::new(32, 16));

        let mut buffer = FrameBuffer::new(32, 16);
        for _ in 0..20 {
            buffer.clear();
            animation.tick(&mut buffer);
        }

        // icon at x = 12..15, text from x = 17
        assert_eq!(buffer.get(12, 4), Some(Rgb888::GREEN));
        let text_pixels = (17..32)
            .flat_map(|x| (0..16).map(move |y| (x, y)))
            .filter(|&(x, y)| buffer.get(x, y) == Some(Rgb888::WHITE))
            .count();
        assert!(text_pixels > 0);
        assert!((0..12).all(|x| (0..16).all(|y| buffer.get(x, y) == Some(Rgb888::BLACK))));
    }
}
