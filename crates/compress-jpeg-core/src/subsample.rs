//! 2x2 chroma subsampling and the matching upsampling.
//!
//! Downsampling point-samples the even coordinates instead of averaging each
//! 2x2 neighborhood, and upsampling is nearest-neighbor. When the full plane
//! has an odd width or height, the last column/row of the upsampled plane has
//! no source sample and is filled with zero.

use crate::plane::Plane;

/// Size of a subsampled chroma plane for a `width` x `height` image.
#[inline]
pub fn subsampled_dimensions(width: usize, height: usize) -> (usize, usize) {
    (width / 2, height / 2)
}

/// Point-sample `plane` at every even (x, y) into a half-size plane.
pub fn downsample(plane: &Plane) -> Plane {
    let (w, h) = subsampled_dimensions(plane.width(), plane.height());
    Plane::from_fn(w, h, |x, y| plane.get(x * 2, y * 2))
}

/// Nearest-neighbor upsample of `sub` to `width` x `height`, substituting 0
/// where the source position falls outside `sub`.
pub fn upsample(sub: &Plane, width: usize, height: usize) -> Plane {
    Plane::from_fn(width, height, |x, y| {
        sub.get_checked(x / 2, y / 2).unwrap_or(0.0)
    })
}
