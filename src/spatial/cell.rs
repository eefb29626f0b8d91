//! Owned RGBA working buffers for per-cell processing

use crate::math::color::Rgb;
use crate::spatial::bbox::BoundingBox;
use crate::spatial::template::CellRect;
use image::{Rgba, RgbaImage};
use ndarray::Array3;

const CHANNELS: usize = 4;

/// Owned RGBA pixel buffer for one grid cell
///
/// Channels are stored as `f64` in 0-255 space so the decontamination math
/// works without repeated conversions. The buffer is exclusively owned by
/// the per-cell pipeline: each stage takes it by value and returns it,
/// which keeps stage order explicit and every stage independently testable.
#[derive(Clone, Debug)]
pub struct CellBuffer {
    data: Array3<f64>,
    width: usize,
    height: usize,
}

impl CellBuffer {
    /// Create a fully transparent buffer
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: Array3::zeros((height, width, CHANNELS)),
            width,
            height,
        }
    }

    /// Slice a cell out of a source image
    ///
    /// The rectangle is clamped to the image bounds; a rectangle that
    /// clamps away entirely produces an empty buffer, which flows through
    /// the pipeline as an empty cell rather than an error.
    pub fn from_image(image: &RgbaImage, rect: &CellRect) -> Self {
        let x0 = rect.x0.min(image.width());
        let y0 = rect.y0.min(image.height());
        let x1 = rect.x1.min(image.width());
        let y1 = rect.y1.min(image.height());

        let width = x1.saturating_sub(x0) as usize;
        let height = y1.saturating_sub(y0) as usize;
        let mut buffer = Self::new(width, height);

        for row in 0..height {
            for col in 0..width {
                let pixel = image
                    .get_pixel_checked(x0 + col as u32, y0 + row as u32)
                    .map_or([0; 4], |p| p.0);
                for (channel, &value) in pixel.iter().enumerate() {
                    if let Some(slot) = buffer.data.get_mut((row, col, channel)) {
                        *slot = f64::from(value);
                    }
                }
            }
        }

        buffer
    }

    /// Buffer width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Test whether the buffer holds no pixels
    pub const fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// RGB channels at a position, 0-255 space
    ///
    /// Out-of-bounds reads return black.
    pub fn rgb(&self, row: usize, col: usize) -> Rgb {
        let mut rgb = [0.0; 3];
        for (channel, slot) in rgb.iter_mut().enumerate() {
            *slot = self.data.get((row, col, channel)).copied().unwrap_or(0.0);
        }
        rgb
    }

    /// Alpha channel at a position, 0-255 space
    pub fn alpha(&self, row: usize, col: usize) -> f64 {
        self.data.get((row, col, 3)).copied().unwrap_or(0.0)
    }

    /// Overwrite all four channels at a position
    pub fn set_rgba(&mut self, row: usize, col: usize, rgb: Rgb, alpha: f64) {
        for (channel, &value) in rgb.iter().enumerate() {
            if let Some(slot) = self.data.get_mut((row, col, channel)) {
                *slot = value;
            }
        }
        self.set_alpha(row, col, alpha);
    }

    /// Overwrite the alpha channel at a position
    pub fn set_alpha(&mut self, row: usize, col: usize, alpha: f64) {
        if let Some(slot) = self.data.get_mut((row, col, 3)) {
            *slot = alpha;
        }
    }

    /// Zero all four channels at a position
    pub fn clear_pixel(&mut self, row: usize, col: usize) {
        self.set_rgba(row, col, [0.0, 0.0, 0.0], 0.0);
    }

    /// Count pixels with non-zero alpha
    pub fn opaque_count(&self) -> usize {
        let mut count = 0;
        for row in 0..self.height {
            for col in 0..self.width {
                if self.alpha(row, col) > 0.0 {
                    count += 1;
                }
            }
        }
        count
    }

    /// Copy the content inside inclusive bounds into an `RgbaImage`
    pub fn crop(&self, bounds: &BoundingBox) -> RgbaImage {
        let width = bounds.width() as u32;
        let height = bounds.height() as u32;
        let mut image = RgbaImage::new(width, height);

        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let row = bounds.min_row + y as usize;
            let col = bounds.min_col + x as usize;
            *pixel = self.pixel_at(row, col);
        }

        image
    }

    /// Convert the whole buffer into an `RgbaImage`
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width as u32, self.height as u32);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = self.pixel_at(y as usize, x as usize);
        }
        image
    }

    fn pixel_at(&self, row: usize, col: usize) -> Rgba<u8> {
        let rgb = self.rgb(row, col);
        let alpha = self.alpha(row, col);
        Rgba([
            quantize(rgb[0]),
            quantize(rgb[1]),
            quantize(rgb[2]),
            quantize(alpha),
        ])
    }
}

fn quantize(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
