//! Block transform engine.
//!
//! A plane is tiled into 8x8 blocks starting at (0, 0). Blocks on the right
//! and bottom edges may overhang the plane: overhanging positions read as 0
//! and their reconstructed values are discarded on write-back.
//!
//! Each block goes through forward DCT, quantization, dequantization and
//! inverse DCT. Rounding in the quantization step is the only lossy step.

use crate::dct::DctBasis;
use crate::plane::Plane;
use crate::quant::QuantizationTable;

/// Edge length of a transform block.
pub const BLOCK_SIZE: usize = 8;

/// An 8x8 block of samples or coefficients, indexed `[row][col]`.
pub type Block = [[f64; BLOCK_SIZE]; BLOCK_SIZE];

/// Number of blocks needed to tile a `width` x `height` plane.
#[inline]
pub fn block_count(width: usize, height: usize) -> usize {
    width.div_ceil(BLOCK_SIZE) * height.div_ceil(BLOCK_SIZE)
}

/// Top-left corner of a block, in plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOrigin {
    pub x: usize,
    pub y: usize,
}

/// Row-major walk over the block origins of one plane.
///
/// The cursor is a plain position, so a caller can stop between blocks and
/// pick up at the same block later.
#[derive(Debug, Clone)]
pub struct BlockCursor {
    width: usize,
    height: usize,
    next: BlockOrigin,
}

impl BlockCursor {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            next: BlockOrigin { x: 0, y: 0 },
        }
    }

    /// True once every block of the plane has been handed out.
    pub fn is_finished(&self) -> bool {
        self.width == 0 || self.next.y >= self.height
    }
}

impl Iterator for BlockCursor {
    type Item = BlockOrigin;

    fn next(&mut self) -> Option<BlockOrigin> {
        if self.is_finished() {
            return None;
        }
        let origin = self.next;
        self.next.x += BLOCK_SIZE;
        if self.next.x >= self.width {
            self.next.x = 0;
            self.next.y += BLOCK_SIZE;
        }
        Some(origin)
    }
}

/// Applies the lossy DCT round trip to individual blocks.
#[derive(Debug, Clone)]
pub struct BlockTransformer {
    basis: DctBasis,
    table: QuantizationTable,
}

impl BlockTransformer {
    pub fn new(table: QuantizationTable) -> Self {
        Self {
            basis: DctBasis::new(),
            table,
        }
    }

    pub fn table(&self) -> &QuantizationTable {
        &self.table
    }

    /// Run one block of `plane` through the transform and write it back in place.
    ///
    /// Blocks never overlap, so reading the whole block before writing any of
    /// it leaves neighboring blocks untouched.
    pub fn process(&self, plane: &mut Plane, origin: BlockOrigin) {
        let samples = read_block(plane, origin);
        let mut coeffs = self.basis.forward(&samples);
        self.quantize_in_place(&mut coeffs);
        let restored = self.basis.inverse(&coeffs);
        write_block(plane, origin, &restored);
    }

    /// Quantize and immediately dequantize every coefficient.
    pub fn quantize_in_place(&self, coeffs: &mut Block) {
        for (u, row) in coeffs.iter_mut().enumerate() {
            for (v, coeff) in row.iter_mut().enumerate() {
                let divisor = self.table.get(u, v) as f64;
                *coeff = round_half_up(*coeff / divisor) * divisor;
            }
        }
    }
}

/// Round to nearest with ties towards positive infinity, as `Math.round` does
/// in browser hosts.
#[inline]
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Copy a block out of `plane`, reading 0 past the plane edges.
fn read_block(plane: &Plane, origin: BlockOrigin) -> Block {
    let mut block = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for (dy, row) in block.iter_mut().enumerate() {
        for (dx, value) in row.iter_mut().enumerate() {
            *value = plane
                .get_checked(origin.x + dx, origin.y + dy)
                .unwrap_or(0.0);
        }
    }
    block
}

/// Write the in-bounds part of `block` back to `plane`.
fn write_block(plane: &mut Plane, origin: BlockOrigin, block: &Block) {
    let rows = BLOCK_SIZE.min(plane.height().saturating_sub(origin.y));
    let cols = BLOCK_SIZE.min(plane.width().saturating_sub(origin.x));
    for dy in 0..rows {
        for dx in 0..cols {
            plane.set(origin.x + dx, origin.y + dy, block[dy][dx]);
        }
    }
}
