//! Change detection and naming helpers for the host application.
//!
//! The host only regenerates the degraded image when either the source
//! pixels or the quality changed since the last run. Hashing every byte of a
//! large canvas would cost as much as a small run, so the fingerprint samples
//! every 100th byte.

/// Distance between sampled bytes.
pub const FINGERPRINT_STRIDE: usize = 100;

/// Fallback stem when a file name has nothing left after removing its extension.
pub const DEFAULT_STEM: &str = "processed";

/// Cheap content hash of an RGBA buffer.
///
/// `h = h * 31 + byte` over every 100th byte, in wrapping 32-bit signed
/// arithmetic so the value matches the host's own implementation.
pub fn image_fingerprint(pixels: &[u8]) -> i32 {
    pixels
        .iter()
        .step_by(FINGERPRINT_STRIDE)
        .fold(0i32, |hash, &byte| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(byte as i32)
        })
}

/// Inputs that determine a run's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunKey {
    pub fingerprint: i32,
    pub quality: f64,
}

impl RunKey {
    pub fn new(pixels: &[u8], quality: f64) -> Self {
        Self {
            fingerprint: image_fingerprint(pixels),
            quality,
        }
    }

    /// True unless `previous` describes exactly the same inputs.
    pub fn needs_regeneration(&self, previous: Option<&RunKey>) -> bool {
        previous != Some(self)
    }
}

/// Name for the downloaded result: the last extension of `file_name` is
/// replaced with `.jpg`.
///
/// An extension is a final `.` followed by one or more characters other than
/// `.` and `/`.
pub fn download_file_name(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(dot) => {
            let ext = &file_name[dot + 1..];
            if !ext.is_empty() && !ext.contains('/') {
                &file_name[..dot]
            } else {
                file_name
            }
        }
        None => file_name,
    };
    let stem = if stem.is_empty() { DEFAULT_STEM } else { stem };
    format!("{}.jpg", stem)
}
