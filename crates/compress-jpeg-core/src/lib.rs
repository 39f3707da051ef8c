//! compress-jpeg core - JPEG artifact simulation
//!
//! This crate reproduces the visible effect of lossy JPEG compression on an
//! RGBA image without producing a bitstream: color conversion to YCbCr,
//! 2x2 chroma subsampling, 8x8 DCT with quality-scaled quantization, and
//! the inverse path back to RGBA.
//!
//! # Module Structure
//!
//! - `color` - RGB <-> YCbCr conversion
//! - `subsample` - Chroma down/upsampling
//! - `quant` - Quality-scaled quantization tables
//! - `dct` / `block` - Block transform engine
//! - `progress` / `schedule` - Progress reporting and suspension hooks
//! - `pipeline` - Stage sequencing
//! - `fingerprint` - Change detection and file naming for hosts
//!
//! # Example
//!
//! ```ignore
//! use compress_jpeg_core::{simulate_compression, PixelBuffer};
//!
//! let image = PixelBuffer::filled(64, 64, [200, 40, 40, 255])?;
//! let degraded = simulate_compression(image, 10.0, &mut |p: u8| println!("{}%", p))?;
//! ```

pub mod block;
pub mod color;
pub mod dct;
pub mod fingerprint;
pub mod options;
pub mod pipeline;
pub mod plane;
pub mod progress;
pub mod quant;
pub mod schedule;
pub mod subsample;
pub mod types;

pub use fingerprint::{download_file_name, image_fingerprint, RunKey};
pub use options::CompressionOptions;
pub use pipeline::{run_to_completion, simulate_compression, CompressionRun, Stage, Step};
pub use progress::{NoProgress, ProgressLog, ProgressObserver};
pub use quant::QuantizationTable;
pub use schedule::{CountingScheduler, Immediate, Scheduler, ThreadYield};
pub use types::{CompressionError, PixelBuffer};
