//! Core types shared by every pipeline stage.

use thiserror::Error;

/// Number of bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Error types for compression simulation.
///
/// Every variant describes malformed input; a well-formed run cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompressionError {
    /// Width or height is zero, or the buffer size overflows `usize`.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Quality is non-finite or outside 1..=100
    #[error("Invalid quality: {0} (expected a finite value between 1 and 100)")]
    InvalidQuality(f64),

    /// The suspension interval must be at least one block
    #[error("Invalid yield interval: must be at least 1 block")]
    InvalidYieldInterval,
}

impl CompressionError {
    /// True for every variant. Kept as a method so hosts can branch on the
    /// error kind without matching the full enum.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CompressionError::InvalidDimensions { .. }
                | CompressionError::InvalidPixelData { .. }
                | CompressionError::InvalidQuality(_)
                | CompressionError::InvalidYieldInterval
        )
    }
}

/// An RGBA8 pixel buffer in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap RGBA pixel data, checking that it matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CompressionError> {
        let expected = expected_len(width, height)?;
        if pixels.len() != expected {
            return Err(CompressionError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, CompressionError> {
        let count = expected_len(width, height)? / BYTES_PER_PIXEL;
        let pixels = rgba.repeat(count);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Internal constructor for buffers whose length is correct by construction.
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * BYTES_PER_PIXEL,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the buffer, returning the raw RGBA bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len() / BYTES_PER_PIXEL
    }

    /// RGBA value at (x, y). Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

/// Byte length of a `width` x `height` RGBA buffer, rejecting empty or
/// overflowing sizes.
pub(crate) fn expected_len(width: u32, height: u32) -> Result<usize, CompressionError> {
    if width == 0 || height == 0 {
        return Err(CompressionError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(CompressionError::InvalidDimensions { width, height })
}
