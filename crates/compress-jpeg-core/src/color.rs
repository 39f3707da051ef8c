//! RGB <-> YCbCr conversion using the JFIF (ITU-R BT.601 full range) coefficients.
//!
//! The forward direction produces unclamped `f64` samples; the inverse
//! direction rounds and clamps to 0-255 and always writes an opaque alpha.

use crate::plane::Plane;
use crate::types::{PixelBuffer, BYTES_PER_PIXEL};

/// Offset applied to both chroma channels.
pub const CHROMA_OFFSET: f64 = 128.0;

/// Convert one RGB sample to (Y, Cb, Cr).
#[inline]
pub fn rgb_to_ycbcr(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.168736 * r - 0.331264 * g + 0.5 * b + CHROMA_OFFSET;
    let cr = 0.5 * r - 0.418688 * g - 0.081312 * b + CHROMA_OFFSET;
    (y, cb, cr)
}

/// Convert one (Y, Cb, Cr) sample back to clamped RGB bytes.
#[inline]
pub fn ycbcr_to_rgb(y: f64, cb: f64, cr: f64) -> [u8; 3] {
    let cb = cb - CHROMA_OFFSET;
    let cr = cr - CHROMA_OFFSET;
    let r = y + 1.402 * cr;
    let g = y - 0.344136 * cb - 0.714136 * cr;
    let b = y + 1.772 * cb;
    [clamp_to_u8(r), clamp_to_u8(g), clamp_to_u8(b)]
}

/// Round half away from zero and clamp to 0-255.
#[inline]
fn clamp_to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Full-resolution luma and chroma planes of one image.
#[derive(Debug, Clone)]
pub struct YCbCrPlanes {
    pub y: Plane,
    pub cb: Plane,
    pub cr: Plane,
}

/// Split an RGBA buffer into full-resolution Y, Cb and Cr planes. Alpha is ignored.
pub fn split_planes(image: &PixelBuffer) -> YCbCrPlanes {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let mut y_plane = Plane::zeroed(width, height);
    let mut cb_plane = Plane::zeroed(width, height);
    let mut cr_plane = Plane::zeroed(width, height);

    for (i, px) in image.pixels().chunks_exact(BYTES_PER_PIXEL).enumerate() {
        let (x, y) = (i % width, i / width);
        let (luma, cb, cr) = rgb_to_ycbcr(px[0] as f64, px[1] as f64, px[2] as f64);
        y_plane.set(x, y, luma);
        cb_plane.set(x, y, cb);
        cr_plane.set(x, y, cr);
    }

    YCbCrPlanes {
        y: y_plane,
        cb: cb_plane,
        cr: cr_plane,
    }
}

/// Reassemble an opaque RGBA buffer from three planes of identical size.
pub fn merge_planes(y: &Plane, cb: &Plane, cr: &Plane) -> PixelBuffer {
    debug_assert_eq!((y.width(), y.height()), (cb.width(), cb.height()));
    debug_assert_eq!((y.width(), y.height()), (cr.width(), cr.height()));

    let mut pixels = Vec::with_capacity(y.width() * y.height() * BYTES_PER_PIXEL);
    for row in 0..y.height() {
        for col in 0..y.width() {
            let [r, g, b] = ycbcr_to_rgb(y.get(col, row), cb.get(col, row), cr.get(col, row));
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }

    PixelBuffer::from_parts(y.width() as u32, y.height() as u32, pixels)
}
