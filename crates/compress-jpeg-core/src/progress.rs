//! Block-level progress reporting.
//!
//! A run reports a percentage after every completed block. Percentages are
//! `round(100 * completed / total)`, so they never decrease and the last
//! block always reports exactly 100.

use crate::block::block_count;
use crate::subsample::subsampled_dimensions;

/// Receives progress percentages (0-100) from a running pipeline.
pub trait ProgressObserver {
    fn on_progress(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressObserver for F {
    fn on_progress(&mut self, percent: u8) {
        self(percent)
    }
}

/// Observer that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _percent: u8) {}
}

/// Observer that records every update, in order.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    pub events: Vec<u8>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reported percentage, if any.
    pub fn last(&self) -> Option<u8> {
        self.events.last().copied()
    }

    /// True when no update was ever lower than the one before it.
    pub fn is_non_decreasing(&self) -> bool {
        self.events.windows(2).all(|w| w[0] <= w[1])
    }
}

impl ProgressObserver for ProgressLog {
    fn on_progress(&mut self, percent: u8) {
        self.events.push(percent);
    }
}

/// Total number of blocks a run processes for a `width` x `height` image:
/// the full-size luma plane plus two subsampled chroma planes.
pub fn total_blocks(width: usize, height: usize) -> usize {
    let (cw, ch) = subsampled_dimensions(width, height);
    block_count(width, height) + 2 * block_count(cw, ch)
}

/// Result of completing one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Progress after this block, 0-100.
    pub percent: u8,
    /// Whether the run should suspend before the next block.
    pub suspend: bool,
}

/// Per-run block counter.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    completed: usize,
    total: usize,
    yield_interval: usize,
}

impl ProgressTracker {
    /// `yield_interval` must be non-zero (validated by `CompressionOptions`).
    pub fn new(total: usize, yield_interval: usize) -> Self {
        debug_assert!(yield_interval > 0);
        Self {
            completed: 0,
            total,
            yield_interval,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Current percentage without advancing.
    pub fn percent(&self) -> u8 {
        percent_of(self.completed, self.total)
    }

    /// Record one finished block.
    pub fn advance(&mut self) -> Tick {
        self.completed += 1;
        Tick {
            percent: self.percent(),
            suspend: self.completed % self.yield_interval == 0,
        }
    }
}

fn percent_of(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = completed.min(total) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}
