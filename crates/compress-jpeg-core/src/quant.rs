//! Quality-scaled quantization tables.
//!
//! The divisor table is derived from the standard luminance table in
//! ITU-T T.81 Annex K using the IJG quality scaling curve. The same table is
//! applied to the luma and both chroma planes.

use crate::block::BLOCK_SIZE;

/// Standard JPEG luminance quantization table (ITU-T T.81 Table K.1), row-major.
pub const BASE_LUMA: [[u32; BLOCK_SIZE]; BLOCK_SIZE] = [
    [16, 11, 10, 16, 24, 40, 51, 61],
    [12, 12, 14, 19, 26, 58, 60, 55],
    [14, 13, 16, 24, 40, 57, 69, 56],
    [14, 17, 22, 29, 51, 87, 80, 62],
    [18, 22, 37, 56, 68, 109, 103, 77],
    [24, 35, 55, 64, 81, 104, 113, 92],
    [49, 64, 78, 87, 103, 121, 120, 101],
    [72, 92, 95, 98, 112, 100, 103, 99],
];

/// An 8x8 table of quantization divisors, every entry at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    entries: [[u32; BLOCK_SIZE]; BLOCK_SIZE],
}

impl QuantizationTable {
    /// Build the table for `quality`.
    ///
    /// Quality is expected in 1..=100 (validated by the caller); lower values
    /// give larger divisors and coarser output.
    pub fn from_quality(quality: f64) -> Self {
        let scale = quality_scale(quality);
        let mut entries = [[1u32; BLOCK_SIZE]; BLOCK_SIZE];
        for (row, base_row) in entries.iter_mut().zip(BASE_LUMA.iter()) {
            for (entry, &base) in row.iter_mut().zip(base_row.iter()) {
                *entry = ((base as f64 * scale).floor() as u32).max(1);
            }
        }
        Self { entries }
    }

    /// A table of all ones: quantization only rounds coefficients.
    pub fn flat() -> Self {
        Self {
            entries: [[1; BLOCK_SIZE]; BLOCK_SIZE],
        }
    }

    /// Divisor for coefficient (u, v).
    #[inline]
    pub fn get(&self, u: usize, v: usize) -> u32 {
        self.entries[u][v]
    }

    pub fn entries(&self) -> &[[u32; BLOCK_SIZE]; BLOCK_SIZE] {
        &self.entries
    }

    /// Mean divisor, a rough measure of how coarse the table is.
    pub fn mean(&self) -> f64 {
        let sum: u32 = self.entries.iter().flatten().sum();
        sum as f64 / (BLOCK_SIZE * BLOCK_SIZE) as f64
    }
}

/// IJG quality curve, expressed as a multiplier on the base table.
fn quality_scale(quality: f64) -> f64 {
    let percent = if quality < 50.0 {
        5000.0 / quality
    } else {
        200.0 - quality * 2.0
    };
    percent / 100.0
}
