//! WASM-compatible wrapper types for image data.
//!
//! `ImageData` mirrors the browser's own `ImageData` shape (RGBA bytes plus
//! dimensions) so the host can move canvas pixels in and out with a single
//! copy each way.

use compress_jpeg_core::{CompressionError, PixelBuffer};
use wasm_bindgen::prelude::*;
use wasm_bindgen::Clamped;

/// RGBA image exchanged with JavaScript.
///
/// # Memory Management
///
/// Pixel data lives in WASM memory. `data()` copies it out to a
/// `Uint8ClampedArray`. Call the generated `free()` to release the WASM copy
/// early; otherwise the finalizer reclaims it.
#[wasm_bindgen(js_name = ImageData)]
pub struct JsImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

#[wasm_bindgen(js_class = ImageData)]
impl JsImageData {
    /// Create an image from RGBA bytes.
    ///
    /// # Arguments
    /// * `data` - RGBA pixel data (4 bytes per pixel, row-major order)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    ///
    /// Throws when `data.length != width * height * 4` or a dimension is zero.
    #[wasm_bindgen(constructor)]
    pub fn new(data: Clamped<Vec<u8>>, width: u32, height: u32) -> Result<JsImageData, JsValue> {
        Self::try_new(data.0, width, height).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA bytes as a `Uint8ClampedArray` (copied).
    pub fn data(&self) -> Clamped<Vec<u8>> {
        Clamped(self.data.clone())
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.data.len()
    }
}

impl JsImageData {
    /// Validating constructor usable from Rust on every target.
    pub(crate) fn try_new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, CompressionError> {
        let buffer = PixelBuffer::new(width, height, data)?;
        Ok(Self::from_buffer(buffer))
    }

    pub(crate) fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            width: buffer.width(),
            height: buffer.height(),
            data: buffer.into_pixels(),
        }
    }

    /// Convert into a core buffer, consuming the wrapper.
    pub(crate) fn into_buffer(self) -> Result<PixelBuffer, CompressionError> {
        PixelBuffer::new(self.width, self.height, self.data)
    }
}
