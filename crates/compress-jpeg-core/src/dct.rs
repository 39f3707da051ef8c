//! Floating-point 8x8 DCT-II and its inverse.
//!
//! Implements the orthonormal 2-D transform
//!
//! ```text
//! F(u,v) = 1/4 C(u) C(v) sum_x sum_y f(x,y) cos((2x+1)u pi/16) cos((2y+1)v pi/16)
//! f(x,y) = 1/4 sum_u sum_v C(u) C(v) F(u,v) cos((2x+1)u pi/16) cos((2y+1)v pi/16)
//! ```
//!
//! with C(0) = 1/sqrt(2) and C(k) = 1 otherwise. The 2-D sums are separable,
//! so each direction is evaluated as a 1-D pass over rows followed by a 1-D
//! pass over columns against a precomputed basis. The result matches the
//! direct quadruple sum up to floating-point rounding.

use crate::block::{Block, BLOCK_SIZE};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Precomputed scaled cosine basis.
///
/// `basis[u][x] = 1/2 C(u) cos((2x+1) u pi / 16)`; the 1/4 normalization of
/// the 2-D transform is split evenly between the two 1-D passes.
#[derive(Debug, Clone)]
pub struct DctBasis {
    basis: [[f64; BLOCK_SIZE]; BLOCK_SIZE],
}

impl Default for DctBasis {
    fn default() -> Self {
        Self::new()
    }
}

impl DctBasis {
    pub fn new() -> Self {
        let mut basis = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
        for (u, row) in basis.iter_mut().enumerate() {
            let cu = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
            for (x, value) in row.iter_mut().enumerate() {
                let angle = ((2 * x + 1) * u) as f64 * PI / (2 * BLOCK_SIZE) as f64;
                *value = 0.5 * cu * angle.cos();
            }
        }
        Self { basis }
    }

    /// Forward 2-D DCT of a spatial block, indexed `[row][col]`.
    pub fn forward(&self, block: &Block) -> Block {
        // Rows: tmp[x][v] = sum_y f[x][y] * basis[v][y]
        let mut tmp = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
        for x in 0..BLOCK_SIZE {
            for v in 0..BLOCK_SIZE {
                let mut sum = 0.0;
                for y in 0..BLOCK_SIZE {
                    sum += block[x][y] * self.basis[v][y];
                }
                tmp[x][v] = sum;
            }
        }

        // Columns: out[u][v] = sum_x basis[u][x] * tmp[x][v]
        let mut out = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
        for u in 0..BLOCK_SIZE {
            for v in 0..BLOCK_SIZE {
                let mut sum = 0.0;
                for x in 0..BLOCK_SIZE {
                    sum += self.basis[u][x] * tmp[x][v];
                }
                out[u][v] = sum;
            }
        }
        out
    }

    /// Inverse 2-D DCT of a coefficient block, indexed `[u][v]`.
    pub fn inverse(&self, coeffs: &Block) -> Block {
        // tmp[u][y] = sum_v F[u][v] * basis[v][y]
        let mut tmp = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
        for u in 0..BLOCK_SIZE {
            for y in 0..BLOCK_SIZE {
                let mut sum = 0.0;
                for v in 0..BLOCK_SIZE {
                    sum += coeffs[u][v] * self.basis[v][y];
                }
                tmp[u][y] = sum;
            }
        }

        // out[x][y] = sum_u basis[u][x] * tmp[u][y]
        let mut out = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
        for x in 0..BLOCK_SIZE {
            for y in 0..BLOCK_SIZE {
                let mut sum = 0.0;
                for u in 0..BLOCK_SIZE {
                    sum += self.basis[u][x] * tmp[u][y];
                }
                out[x][y] = sum;
            }
        }
        out
    }
}
