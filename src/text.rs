//! Glyph sets and text drawing for headlines.
//!
//! Fonts are the monospaced bitmap fonts bundled with `embedded-graphics`,
//! picked by their `WxH` name in the configuration.

use crate::canvas::Canvas;
use embedded_graphics::{
    mono_font::{ascii, MonoFont, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("unknown font '{0}'")]
    Unknown(String),
}

/// A bitmap glyph set.
#[derive(Clone, Copy)]
pub struct Glyphs {
    font: &'static MonoFont<'static>,
}

impl Glyphs {
    pub const NAMES: [&'static str; 12] = [
        "4x6", "5x7", "5x8", "6x9", "6x10", "6x12", "6x13", "7x13", "7x14", "8x13", "9x15",
        "10x20",
    ];

    /// Look up a font by name, e.g. `"6x10"`.
    pub fn by_name(name: &str) -> Result<Self, FontError> {
        let font = match name {
            "4x6" => &ascii::FONT_4X6,
            "5x7" => &ascii::FONT_5X7,
            "5x8" => &ascii::FONT_5X8,
            "6x9" => &ascii::FONT_6X9,
            "6x10" => &ascii::FONT_6X10,
            "6x12" => &ascii::FONT_6X12,
            "6x13" => &ascii::FONT_6X13,
            "7x13" => &ascii::FONT_7X13,
            "7x14" => &ascii::FONT_7X14,
            "8x13" => &ascii::FONT_8X13,
            "9x15" => &ascii::FONT_9X15,
            "10x20" => &ascii::FONT_10X20,
            other => return Err(FontError::Unknown(other.to_string())),
        };
        Ok(Self { font })
    }

    /// Distance from the top of a glyph cell to its baseline.
    pub fn baseline(&self) -> i32 {
        self.font.baseline as i32
    }

    pub fn height(&self) -> i32 {
        self.font.character_size.height as i32
    }
}

impl std::fmt::Debug for Glyphs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Glyphs")
            .field("size", &self.font.character_size)
            .finish()
    }
}

/// Draw `text` with its baseline at `y_baseline`, starting at `x`.
///
/// Returns the horizontal advance in pixels, which is also correct for text
/// drawn partly or completely off the canvas.
pub fn draw_text<C: Canvas>(
    canvas: &mut C,
    glyphs: &Glyphs,
    x: i32,
    y_baseline: i32,
    color: Rgb888,
    text: &str,
) -> i32 {
    let style = MonoTextStyle::new(glyphs.font, color);
    let start = Point::new(x, y_baseline);
    let next = match Text::with_baseline(text, start, style, Baseline::Alphabetic).draw(canvas) {
        Ok(next) => next,
        Err(never) => match never {},
    };
    next.x - start.x
}
