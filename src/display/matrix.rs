//! HUB75 RGB LED panel driven through hzeller's rpi-rgb-led-matrix library.
//!
//! Requires root (or the right GPIO permissions) on a Raspberry Pi. The
//! library refreshes the panel from its own thread; `swap` waits for the next
//! vertical sync before handing back the off-screen canvas.

use super::Display;
use crate::config::DisplayConfig;
use core::convert::Infallible;
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use rpi_led_matrix::{LedCanvas, LedColor, LedMatrix, LedMatrixOptions};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum MatrixError {
    /// The driver refused the options or could not access the GPIO pins
    #[error("LED matrix initialization failed: {0}")]
    Init(String),
}

/// Off-screen canvas owned by the driver.
pub struct MatrixCanvas {
    canvas: LedCanvas,
    size: Size,
}

impl OriginDimensions for MatrixCanvas {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for MatrixCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = (self.size.width as i32, self.size.height as i32);
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= width || point.y >= height {
                continue;
            }
            let color = LedColor {
                red: color.r(),
                green: color.g(),
                blue: color.b(),
            };
            self.canvas.set(point.x, point.y, &color);
        }
        Ok(())
    }
}

pub struct MatrixDisplay {
    matrix: LedMatrix,
    width: u32,
    height: u32,
}

impl MatrixDisplay {
    pub fn new(config: &DisplayConfig) -> Result<Self, MatrixError> {
        let mut options = LedMatrixOptions::new();
        options.set_rows(config.rows);
        options.set_cols(config.cols);
        options.set_chain_length(config.chain_length);
        options.set_parallel(config.parallel);
        options.set_hardware_mapping(&config.hardware_mapping);
        options.set_refresh_rate(config.show_refresh_rate);

        let matrix = LedMatrix::new(Some(options), None)
            .map_err(|e| MatrixError::Init(e.to_string()))?;

        let (width, height) = matrix.canvas().canvas_size();
        info!(
            width,
            height,
            mapping = %config.hardware_mapping,
            "LED matrix ready"
        );

        Ok(Self {
            matrix,
            width: width as u32,
            height: height as u32,
        })
    }

    fn wrap(&self, canvas: LedCanvas) -> MatrixCanvas {
        MatrixCanvas {
            canvas,
            size: Size::new(self.width, self.height),
        }
    }
}

impl Display for MatrixDisplay {
    type Buffer = MatrixCanvas;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn create_frame_buffer(&mut self) -> MatrixCanvas {
        self.wrap(self.matrix.offscreen_canvas())
    }

    fn clear(&mut self, buffer: &mut MatrixCanvas) {
        buffer.canvas.clear();
    }

    fn submit_and_swap(&mut self, buffer: MatrixCanvas) -> MatrixCanvas {
        let back = self.matrix.swap(buffer.canvas);
        self.wrap(back)
    }

    fn shutdown(&mut self) {
        self.matrix.canvas().clear();
    }
}
