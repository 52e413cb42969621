//! Raster image container and pixel helpers

use crate::error::{Error, Result};

/// Number of channels in a [`RasterImage`] pixel
pub const CHANNELS: usize = 4;

/// A fixed-size grid of RGBA samples stored row-major, 4 bytes per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Create an image from a flat RGBA buffer
    ///
    /// The buffer must hold exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::InvalidData(format!(
                "RGBA buffer for {}x{} image must be {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Create an image from a list of RGBA pixels in scan order
    pub fn from_pixels(width: u32, height: u32, pixels: &[[u8; 4]]) -> Result<Self> {
        Self::new(width, height, pixels.iter().flatten().copied().collect())
    }

    /// Create an image with every pixel set to `pixel`
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let data = std::iter::repeat(pixel).take(count).flatten().collect();
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of pixels in the image
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// RGBA sample at `(x, y)`
    ///
    /// Panics if the coordinate lies outside the image.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Iterate over RGBA samples in scan order
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Per-pixel mean of all four channels, in byte scale
    pub fn channel_means(&self) -> Vec<f32> {
        self.pixels()
            .map(|[r, g, b, a]| (r as f32 + g as f32 + b as f32 + a as f32) / CHANNELS as f32)
            .collect()
    }
}

/// Arithmetic mean of a slice, 0 for an empty slice
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Keep whole batches of `step` elements for which `keep` returns true
///
/// A trailing batch shorter than `step` is offered to `keep` as well.
pub fn filter_stepped<T, F>(data: &[T], step: usize, mut keep: F) -> Result<Vec<T>>
where
    T: Clone,
    F: FnMut(&[T]) -> bool,
{
    if step == 0 {
        return Err(Error::InvalidData("step must be greater than 0".to_string()));
    }

    let mut filtered = Vec::new();
    for batch in data.chunks(step) {
        if keep(batch) {
            filtered.extend_from_slice(batch);
        }
    }
    Ok(filtered)
}
