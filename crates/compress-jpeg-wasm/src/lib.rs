//! compress-jpeg WASM - WebAssembly bindings for the artifact simulator
//!
//! This crate exposes compress-jpeg-core to the browser host.
//!
//! # Module Structure
//!
//! - `types` - The `ImageData` wrapper exchanged with JavaScript
//! - `compress` - Async compression simulation with progress callbacks
//! - `fingerprint` - Change detection and download naming helpers
//!
//! # Usage
//!
//! ```typescript
//! import init, { ImageData as RustImageData, compress_jpeg } from 'compress-jpeg';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const input = new RustImageData(new Uint8ClampedArray(pixels), width, height);
//! const output = await compress_jpeg(input, 30);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod fingerprint;
mod types;

// Re-export public types
pub use compress::{compress_jpeg, compress_jpeg_with_options};
pub use fingerprint::{download_file_name, image_fingerprint};
pub use types::JsImageData;

/// Runs once when the module is instantiated: routes Rust panics to the
/// browser console.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
