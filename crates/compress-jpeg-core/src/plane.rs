//! Single-channel sample grids.

/// A 2D grid of real-valued samples for one channel, row-major.
///
/// Samples are not clamped: the block transform can push them outside
/// 0-255 and clamping is deferred to the final color conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    samples: Vec<f64>,
}

impl Plane {
    /// Create a plane with every sample set to zero.
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![0.0; width * height],
        }
    }

    /// Build a plane by evaluating `f(x, y)` at every position.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the plane has no samples (a chroma plane of a 1-pixel-wide
    /// or 1-pixel-tall image).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at (x, y). Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.samples[y * self.width + x]
    }

    /// Sample at (x, y), or `None` when out of bounds.
    #[inline]
    pub fn get_checked(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.samples[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.samples[y * self.width + x] = value;
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}
