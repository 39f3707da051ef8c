//! Compression simulation WASM bindings.
//!
//! Runs the core pipeline on the browser's main thread without blocking it:
//! every time the run reaches a suspension point the binding awaits a
//! zero-delay `setTimeout`, letting the page repaint and handle input before
//! the next batch of blocks.
//!
//! # Example
//!
//! ```typescript
//! import init, { ImageData as RustImageData, compress_jpeg } from 'compress-jpeg';
//!
//! await init();
//! const input = new RustImageData(new Uint8ClampedArray(img.data), img.width, img.height);
//! const output = await compress_jpeg(input, 30, (p: number) => setProgress(p));
//! const result = new ImageData(output.data(), output.width(), output.height());
//! output.free();
//! ```

use crate::types::JsImageData;
use compress_jpeg_core::{CompressionOptions, CompressionRun, ProgressObserver, Step};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = setTimeout)]
    fn set_timeout(handler: &js_sys::Function, timeout: i32) -> JsValue;
}

/// Forwards progress to an optional JS callback `(percent: number) => void`.
struct JsProgress {
    callback: Option<js_sys::Function>,
}

impl ProgressObserver for JsProgress {
    fn on_progress(&mut self, percent: u8) {
        if let Some(callback) = &self.callback {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from(percent)) {
                web_sys::console::warn_2(&JsValue::from_str("progress callback threw:"), &err);
            }
        }
    }
}

/// Resolve after the host event loop has run once.
async fn yield_to_event_loop() -> Result<(), JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        set_timeout(&resolve, 0);
    });
    JsFuture::from(promise).await.map(|_| ())
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    let message = err.to_string();
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

async fn drive(
    image: JsImageData,
    options: CompressionOptions,
    on_progress: Option<js_sys::Function>,
) -> Result<JsImageData, JsValue> {
    let buffer = image.into_buffer().map_err(to_js_error)?;
    let mut run = CompressionRun::new(buffer, &options).map_err(to_js_error)?;
    let mut observer = JsProgress {
        callback: on_progress,
    };

    loop {
        match run.resume(&mut observer) {
            Step::Suspended(next) => {
                yield_to_event_loop().await?;
                run = next;
            }
            Step::Complete(output) => return Ok(JsImageData::from_buffer(output)),
        }
    }
}

/// Simulate JPEG compression artifacts.
///
/// # Arguments
///
/// * `image` - Source image (consumed; its WASM memory is reused)
/// * `quality` - Quality (1-100, lower = more artifacts)
/// * `on_progress` - Optional callback receiving 0-100 after every block
///
/// # Returns
///
/// A promise resolving to a new opaque `ImageData` of the same size. Rejects
/// when quality is non-finite or outside 1-100.
#[wasm_bindgen]
pub async fn compress_jpeg(
    image: JsImageData,
    quality: f64,
    on_progress: Option<js_sys::Function>,
) -> Result<JsImageData, JsValue> {
    drive(image, CompressionOptions::with_quality(quality), on_progress).await
}

/// Like [`compress_jpeg`], taking an options object
/// `{ quality?: number, yieldInterval?: number }`.
#[wasm_bindgen]
pub async fn compress_jpeg_with_options(
    image: JsImageData,
    options: JsValue,
    on_progress: Option<js_sys::Function>,
) -> Result<JsImageData, JsValue> {
    let options: CompressionOptions = serde_wasm_bindgen::from_value(options)
        .map_err(|e| to_js_error(format!("Invalid options: {}", e)))?;
    drive(image, options, on_progress).await
}


/// WASM-specific tests that require JsValue.
///
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn gray(width: u32, height: u32) -> JsImageData {
        JsImageData::try_new(vec![128u8; (width * height * 4) as usize], width, height).unwrap()
    }

    #[wasm_bindgen_test]
    async fn test_compress_jpeg_basic() {
        let output = compress_jpeg(gray(16, 16), 50.0, None).await.unwrap();
        assert_eq!(output.width(), 16);
        assert_eq!(output.height(), 16);
    }

    #[wasm_bindgen_test]
    async fn test_compress_jpeg_reports_progress() {
        let seen = Rc::new(RefCell::new(Vec::<f64>::new()));
        let sink = seen.clone();
        let callback = Closure::<dyn FnMut(f64)>::new(move |p: f64| sink.borrow_mut().push(p));

        compress_jpeg(
            gray(40, 40),
            30.0,
            Some(callback.as_ref().unchecked_ref::<js_sys::Function>().clone()),
        )
        .await
        .unwrap();

        let seen = seen.borrow();
        // 25 luma blocks + 2 * 9 chroma blocks
        assert_eq!(seen.len(), 43);
        assert_eq!(seen.last(), Some(&100.0));
    }

    #[wasm_bindgen_test]
    async fn test_compress_jpeg_invalid_quality() {
        assert!(compress_jpeg(gray(8, 8), 0.0, None).await.is_err());
        assert!(compress_jpeg(gray(8, 8), f64::NAN, None).await.is_err());
    }

    #[wasm_bindgen_test]
    async fn test_compress_jpeg_with_options() {
        let options = serde_wasm_bindgen::to_value(&CompressionOptions {
            quality: 10.0,
            yield_interval: 1,
        })
        .unwrap();
        let output = compress_jpeg_with_options(gray(24, 24), options, None).await.unwrap();
        assert_eq!(output.byte_length(), 24 * 24 * 4);
    }

    #[wasm_bindgen_test]
    async fn test_compress_jpeg_with_invalid_options() {
        let options = JsValue::from_str("not an object");
        assert!(compress_jpeg_with_options(gray(8, 8), options, None).await.is_err());
    }
}
