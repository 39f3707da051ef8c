//! Host helpers: change detection and download naming.

use compress_jpeg_core::fingerprint;
use wasm_bindgen::prelude::*;

/// Cheap content hash of RGBA pixel data.
///
/// The host compares `(image_fingerprint(data), quality)` with the values of
/// its last run and skips regeneration when both match.
#[wasm_bindgen]
pub fn image_fingerprint(data: &[u8]) -> i32 {
    fingerprint::image_fingerprint(data)
}

/// File name for downloading the result, e.g. `photo.png` -> `photo.jpg`.
#[wasm_bindgen]
pub fn download_file_name(file_name: &str) -> String {
    fingerprint::download_file_name(file_name)
}
