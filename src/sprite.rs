//! # Sprite Binary Format
//!
//! Sprites are produced offline by rasterizing layered SVG artwork into a flat
//! byte stream. There is no magic number, version, palette or timing metadata;
//! every field is a single byte, so byte order never matters:
//!
//! ```text
//! byte  frame_count
//! repeat frame_count times:
//!   byte width
//!   byte height
//!   repeat width * height times (row-major):
//!     byte r, byte g, byte b
//! ```
//!
//! Timing is supplied by whichever animation plays the sprite. The loader only
//! checks that the stream holds everything the headers promise; a frame with a
//! zero width or height is legal and simply renders nothing.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while decoding a sprite.
///
/// Any of these is fatal at startup: a partially decoded sprite would index
/// out of bounds once an animation starts playing it.
#[derive(Error, Debug)]
pub enum SpriteError {
    /// The stream ended before the declared frames or pixels were read
    #[error("sprite truncated in frame {frame} at byte {offset}")]
    Truncated { frame: usize, offset: usize },

    /// Sprite file could not be read
    #[error("sprite IO: {0}")]
    Io(#[from] io::Error),
}

/// One still image: `width * height` pixels in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u8,
    height: u8,
    pixels: Vec<Rgb888>,
}

impl Frame {
    /// Build a frame, returning `None` when the pixel count does not match
    /// the dimensions.
    pub fn new(width: u8, height: u8, pixels: Vec<Rgb888>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Pixel at `(x, y)` within the frame, if inside it.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixels.get((y * self.width() + x) as usize).copied()
    }
}

/// An ordered sequence of frames, immutable once loaded.
///
/// Animations share sprites through `Rc<Sprite>`; the same arrow sprite is
/// referenced by every scrolling headline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sprite {
    frames: Vec<Frame>,
}

impl Sprite {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Decode a sprite from its binary representation.
    ///
    /// # Example
    /// ```
    /// use buoy_matrix_lib::sprite::Sprite;
    ///
    /// // one 1x1 frame holding a single red pixel
    /// let sprite = Sprite::load(&[1, 1, 1, 255, 0, 0]).unwrap();
    /// assert_eq!(sprite.len(), 1);
    /// assert_eq!(sprite.frames()[0].width(), 1);
    /// ```
    pub fn load(bytes: &[u8]) -> Result<Self, SpriteError> {
        let mut reader = Reader::new(bytes);
        let count = reader.byte()?;

        let mut frames = Vec::with_capacity(count as usize);
        for n in 0..count as usize {
            reader.frame = n;
            let width = reader.byte()?;
            let height = reader.byte()?;

            let count = width as usize * height as usize;
            let mut pixels = Vec::with_capacity(count);
            for _ in 0..count {
                let r = reader.byte()?;
                let g = reader.byte()?;
                let b = reader.byte()?;
                pixels.push(Rgb888::new(r, g, b));
            }

            frames.push(Frame {
                width,
                height,
                pixels,
            });
        }

        Ok(Self { frames })
    }

    /// Read and decode a sprite file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, SpriteError> {
        let bytes = fs::read(&path)?;
        let sprite = Self::load(&bytes)?;
        info!(
            path = %path.as_ref().display(),
            frames = sprite.len(),
            "loaded sprite"
        );
        Ok(sprite)
    }

    /// Encode into the binary format read by [`Sprite::load`].
    ///
    /// The format stores the frame count in one byte, so at most 255 frames
    /// are written.
    pub fn to_bytes(&self) -> Vec<u8> {
        let frames = &self.frames[..self.frames.len().min(u8::MAX as usize)];
        let mut bytes = vec![frames.len() as u8];
        for frame in frames {
            bytes.push(frame.width);
            bytes.push(frame.height);
            for pixel in &frame.pixels {
                bytes.extend_from_slice(&[pixel.r(), pixel.g(), pixel.b()]);
            }
        }
        bytes
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Byte cursor that reports where the stream ran out.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
    frame: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            frame: 0,
        }
    }

    fn byte(&mut self) -> Result<u8, SpriteError> {
        let byte = self
            .bytes
            .get(self.offset)
            .copied()
            .ok_or(SpriteError::Truncated {
                frame: self.frame,
                offset: self.offset,
            })?;
        self.offset += 1;
        Ok(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    fn gradient(width: u8, height: u8, seed: u8) -> Frame {
        let pixels = (0..width as usize * height as usize)
            .map(|i| {
                let v = (i as u8).wrapping_mul(7).wrapping_add(seed);
                Rgb888::new(v, v.wrapping_add(1), 255 - v)
            })
            .collect();
        Frame::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_encode_decode_preserves_structure() {
        let sprite = Sprite::new(vec![gradient(32, 16, 0), gradient(3, 2, 9), gradient(0, 4, 0)]);

        let decoded = Sprite::load(&sprite.to_bytes()).unwrap();

        assert_eq!(decoded, sprite);
        assert_eq!(decoded.frames()[1].pixel(2, 1), sprite.frames()[1].pixel(2, 1));
        assert_eq!(decoded.frames()[2].pixels().len(), 0);
    }

    #[test]
    fn test_decode_layout_is_row_major() {
        // 2x2 frame: red, green / blue, white
        let bytes = [1, 2, 2, 255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let sprite = Sprite::load(&bytes).unwrap();
        let frame = &sprite.frames()[0];

        assert_eq!(frame.pixel(1, 0), Some(Rgb888::GREEN));
        assert_eq!(frame.pixel(0, 1), Some(Rgb888::BLUE));
        assert_eq!(frame.pixel(1, 1), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn test_empty_stream_is_truncated() {
        assert!(matches!(
            Sprite::load(&[]),
            Err(SpriteError::Truncated { frame: 0, offset: 0 })
        ));
    }

    #[test]
    fn test_truncated_mid_pixel() {
        // second frame declares 1x1 but only two colour bytes follow
        let bytes = [2, 1, 1, 1, 2, 3, 1, 1, 9, 9];
        match Sprite::load(&bytes) {
            Err(SpriteError::Truncated { frame, offset }) => {
                assert_eq!(frame, 1);
                assert_eq!(offset, 10);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_before_frame_header() {
        let bytes = [3, 0, 0];
        assert!(matches!(
            Sprite::load(&bytes),
            Err(SpriteError::Truncated { frame: 1, .. })
        ));
    }

    #[test]
    fn test_zero_frames_and_trailing_bytes() {
        assert!(Sprite::load(&[0]).unwrap().is_empty());
        // bytes past the declared frames are ignored
        assert_eq!(Sprite::load(&[1, 0, 0, 42, 42]).unwrap().len(), 1);
    }

    #[test]
    fn test_frame_new_rejects_wrong_pixel_count() {
        assert!(Frame::new(2, 2, vec![Rgb888::BLACK; 3]).is_none());
        assert!(Frame::new(0, 7, Vec::new()).is_some());
    }

    #[test]
    fn test_load_file() {
        let sprite = Sprite::new(vec![gradient(4, 4, 3)]);
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), sprite.to_bytes()).unwrap();

        assert_eq!(Sprite::load_file(file.path()).unwrap(), sprite);
        assert!(matches!(
            Sprite::load_file("/nonexistent/wave.bin"),
            Err(SpriteError::Io(_))
        ));
    }
}
