//! Compression simulation pipeline.
//!
//! A [`CompressionRun`] walks a fixed sequence of stages:
//!
//! ```text
//! Idle -> ColorConvert -> Subsample -> ProcessY -> ProcessCb -> ProcessCr
//!      -> Upsample -> Reassemble -> Done
//! ```
//!
//! Only the three block-processing stages can suspend, and only between two
//! blocks. `resume` consumes the run and either hands it back at a suspension
//! point or returns the finished image, so a run can be driven synchronously
//! ([`run_to_completion`]) or from an async event loop without the engine
//! knowing which.
//!
//! All state, including the progress counter, belongs to the run value.
//! Dropping a suspended run abandons it.

use crate::block::{BlockCursor, BlockTransformer};
use crate::color::{merge_planes, split_planes};
use crate::options::CompressionOptions;
use crate::plane::Plane;
use crate::progress::{total_blocks, ProgressObserver, ProgressTracker};
use crate::quant::QuantizationTable;
use crate::schedule::{Immediate, Scheduler};
use crate::subsample::{downsample, upsample};
use crate::types::{CompressionError, PixelBuffer};
use tracing::{debug, trace};

/// Pipeline stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ColorConvert,
    Subsample,
    ProcessY,
    ProcessCb,
    ProcessCr,
    Upsample,
    Reassemble,
    Done,
}

impl Stage {
    fn next(self) -> Stage {
        match self {
            Stage::Idle => Stage::ColorConvert,
            Stage::ColorConvert => Stage::Subsample,
            Stage::Subsample => Stage::ProcessY,
            Stage::ProcessY => Stage::ProcessCb,
            Stage::ProcessCb => Stage::ProcessCr,
            Stage::ProcessCr => Stage::Upsample,
            Stage::Upsample => Stage::Reassemble,
            Stage::Reassemble | Stage::Done => Stage::Done,
        }
    }
}

/// Outcome of [`CompressionRun::resume`].
#[derive(Debug)]
pub enum Step {
    /// The run stopped at a suspension point; resume it to continue.
    Suspended(CompressionRun),
    /// The run finished.
    Complete(PixelBuffer),
}

/// One in-flight compression simulation.
#[derive(Debug)]
pub struct CompressionRun {
    stage: Stage,
    source: PixelBuffer,
    transformer: BlockTransformer,
    tracker: ProgressTracker,
    cursor: BlockCursor,
    y: Plane,
    cb: Plane,
    cr: Plane,
    cb_sub: Plane,
    cr_sub: Plane,
}

impl CompressionRun {
    /// Start a run with the table derived from `options.quality`.
    pub fn new(image: PixelBuffer, options: &CompressionOptions) -> Result<Self, CompressionError> {
        options.validate()?;
        let table = QuantizationTable::from_quality(options.quality);
        Ok(Self::build(image, table, options.yield_interval))
    }

    /// Start a run with an explicit quantization table. `options.quality` is
    /// ignored; the yield interval is still validated.
    pub fn with_table(
        image: PixelBuffer,
        table: QuantizationTable,
        options: &CompressionOptions,
    ) -> Result<Self, CompressionError> {
        if options.yield_interval == 0 {
            return Err(CompressionError::InvalidYieldInterval);
        }
        Ok(Self::build(image, table, options.yield_interval))
    }

    fn build(image: PixelBuffer, table: QuantizationTable, yield_interval: u32) -> Self {
        let total = total_blocks(image.width() as usize, image.height() as usize);
        debug!(
            width = image.width(),
            height = image.height(),
            total_blocks = total,
            "starting compression run"
        );
        Self {
            stage: Stage::Idle,
            source: image,
            transformer: BlockTransformer::new(table),
            tracker: ProgressTracker::new(total, yield_interval as usize),
            cursor: BlockCursor::new(0, 0),
            y: Plane::default(),
            cb: Plane::default(),
            cr: Plane::default(),
            cb_sub: Plane::default(),
            cr_sub: Plane::default(),
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Progress so far, 0-100.
    pub fn progress(&self) -> u8 {
        self.tracker.percent()
    }

    pub fn completed_blocks(&self) -> usize {
        self.tracker.completed()
    }

    pub fn total_blocks(&self) -> usize {
        self.tracker.total()
    }

    pub fn quantization_table(&self) -> &QuantizationTable {
        self.transformer.table()
    }

    /// Advance until the next suspension point or the end of the run.
    pub fn resume(mut self, observer: &mut impl ProgressObserver) -> Step {
        loop {
            match self.stage {
                Stage::Idle => {}
                Stage::ColorConvert => {
                    let planes = split_planes(&self.source);
                    self.y = planes.y;
                    self.cb = planes.cb;
                    self.cr = planes.cr;
                }
                Stage::Subsample => {
                    // Full-resolution chroma is rebuilt by Upsample
                    self.cb_sub = downsample(&std::mem::take(&mut self.cb));
                    self.cr_sub = downsample(&std::mem::take(&mut self.cr));
                }
                Stage::ProcessY | Stage::ProcessCb | Stage::ProcessCr => {
                    if self.process_blocks(observer) {
                        trace!(
                            completed = self.tracker.completed(),
                            "suspending compression run"
                        );
                        return Step::Suspended(self);
                    }
                }
                Stage::Upsample => {
                    let (width, height) = (self.y.width(), self.y.height());
                    self.cb = upsample(&self.cb_sub, width, height);
                    self.cr = upsample(&self.cr_sub, width, height);
                }
                Stage::Reassemble => {
                    let output = merge_planes(&self.y, &self.cb, &self.cr);
                    self.enter(Stage::Done);
                    return Step::Complete(output);
                }
                Stage::Done => {
                    // Unreachable through the public API: Reassemble returns
                    // the output and consumes the run.
                    return Step::Complete(merge_planes(&self.y, &self.cb, &self.cr));
                }
            }
            self.enter(self.stage.next());
        }
    }

    /// Process blocks of the current plane. Returns true when the run should
    /// suspend, false once the plane is finished.
    fn process_blocks(&mut self, observer: &mut impl ProgressObserver) -> bool {
        let plane = match self.stage {
            Stage::ProcessY => &mut self.y,
            Stage::ProcessCb => &mut self.cb_sub,
            Stage::ProcessCr => &mut self.cr_sub,
            _ => return false,
        };

        while let Some(origin) = self.cursor.next() {
            self.transformer.process(plane, origin);
            let tick = self.tracker.advance();
            observer.on_progress(tick.percent);
            if tick.suspend {
                return true;
            }
        }
        false
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        let plane = match stage {
            Stage::ProcessY => Some(&self.y),
            Stage::ProcessCb => Some(&self.cb_sub),
            Stage::ProcessCr => Some(&self.cr_sub),
            _ => None,
        };
        if let Some(plane) = plane {
            self.cursor = BlockCursor::new(plane.width(), plane.height());
        }
        debug!(?stage, progress = self.tracker.percent(), "entering stage");
    }
}

/// Drive `run` to the end, calling `scheduler` at every suspension point.
pub fn run_to_completion(
    mut run: CompressionRun,
    scheduler: &mut impl Scheduler,
    observer: &mut impl ProgressObserver,
) -> PixelBuffer {
    loop {
        match run.resume(observer) {
            Step::Suspended(next) => {
                scheduler.suspend();
                run = next;
            }
            Step::Complete(output) => return output,
        }
    }
}

/// Simulate lossy compression of `image` at `quality`, synchronously.
///
/// # Arguments
///
/// * `image` - RGBA source image
/// * `quality` - Compression quality (1-100, lower = more artifacts)
/// * `observer` - Receives a percentage after every processed block
///
/// # Returns
///
/// An opaque image of the same dimensions, or `InvalidQuality` when quality
/// is non-finite or outside 1-100.
pub fn simulate_compression(
    image: PixelBuffer,
    quality: f64,
    observer: &mut impl ProgressObserver,
) -> Result<PixelBuffer, CompressionError> {
    let run = CompressionRun::new(image, &CompressionOptions::with_quality(quality))?;
    Ok(run_to_completion(run, &mut Immediate, observer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoProgress, ProgressLog};
    use crate::schedule::CountingScheduler;

    /// Deterministic RGBA test pattern with detail in every channel.
    fn pattern(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 37 + y * 11) % 256) as u8);
                pixels.push(((x * 7 + y * 53) % 256) as u8);
                pixels.push(((x ^ y) * 9 % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    fn mean_abs_deviation(a: &PixelBuffer, b: &PixelBuffer) -> f64 {
        let total: u64 = a
            .pixels()
            .chunks_exact(4)
            .zip(b.pixels().chunks_exact(4))
            .map(|(p, q)| {
                (0..3)
                    .map(|c| (p[c] as i32 - q[c] as i32).unsigned_abs() as u64)
                    .sum::<u64>()
            })
            .sum();
        total as f64 / (a.pixel_count() * 3) as f64
    }

    #[test]
    fn test_uniform_gray_16x16_quality_50() {
        let image = PixelBuffer::filled(16, 16, [128, 128, 128, 255]).unwrap();
        let run = CompressionRun::new(image, &CompressionOptions::with_quality(50.0)).unwrap();
        assert_eq!(run.total_blocks(), 6);

        let mut log = ProgressLog::new();
        let output = run_to_completion(run, &mut Immediate, &mut log);

        assert_eq!(log.events.len(), 6);
        assert_eq!(log.last(), Some(100));
        for px in output.pixels().chunks_exact(4) {
            for &c in &px[..3] {
                assert!((c as i32 - 128).abs() <= 2, "channel {} too far from 128", c);
            }
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_output_dimensions_and_alpha() {
        for (w, h) in [(1, 1), (1, 9), (9, 1), (10, 10), (17, 5), (33, 24)] {
            let output = simulate_compression(pattern(w, h), 30.0, &mut NoProgress).unwrap();
            assert_eq!(output.width(), w);
            assert_eq!(output.height(), h);
            assert_eq!(output.pixels().len(), (w * h * 4) as usize);
            assert!(output.pixels().chunks_exact(4).all(|px| px[3] == 255));
        }
    }

    #[test]
    fn test_non_multiple_of_eight() {
        let image = pattern(10, 10);
        let run = CompressionRun::new(image, &CompressionOptions::with_quality(50.0)).unwrap();
        // 4 luma blocks, chroma planes are 5x5 -> 1 block each
        assert_eq!(run.total_blocks(), 6);

        let mut log = ProgressLog::new();
        let output = run_to_completion(run, &mut Immediate, &mut log);
        assert_eq!(output.pixel_count(), 100);
        assert_eq!(log.events, vec![17, 33, 50, 67, 83, 100]);
    }

    #[test]
    fn test_progress_non_decreasing_and_ends_at_100() {
        let mut log = ProgressLog::new();
        simulate_compression(pattern(67, 45), 20.0, &mut log).unwrap();
        assert!(log.is_non_decreasing());
        assert_eq!(log.last(), Some(100));
        assert_eq!(log.events.len(), total_blocks(67, 45));
    }

    #[test]
    fn test_suspends_every_ten_blocks() {
        let image = pattern(64, 64);
        let run = CompressionRun::new(image, &CompressionOptions::with_quality(50.0)).unwrap();
        // 64 luma + 2 * 16 chroma
        assert_eq!(run.total_blocks(), 96);

        let mut scheduler = CountingScheduler::default();
        run_to_completion(run, &mut scheduler, &mut NoProgress);
        assert_eq!(scheduler.suspensions, 9);
    }

    #[test]
    fn test_suspension_does_not_change_output() {
        let image = pattern(40, 28);

        let once = {
            let mut opts = CompressionOptions::with_quality(25.0);
            opts.yield_interval = u32::MAX;
            let run = CompressionRun::new(image.clone(), &opts).unwrap();
            run_to_completion(run, &mut Immediate, &mut NoProgress)
        };
        let every_block = {
            let mut opts = CompressionOptions::with_quality(25.0);
            opts.yield_interval = 1;
            let run = CompressionRun::new(image.clone(), &opts).unwrap();
            let mut scheduler = CountingScheduler::default();
            let output = run_to_completion(run, &mut scheduler, &mut NoProgress);
            assert_eq!(scheduler.suspensions, total_blocks(40, 28));
            output
        };

        assert_eq!(once, every_block);
    }

    #[test]
    fn test_manual_resume_walks_stages() {
        let image = pattern(32, 32);
        let mut opts = CompressionOptions::with_quality(50.0);
        opts.yield_interval = 4;
        let mut run = CompressionRun::new(image, &opts).unwrap();
        assert_eq!(run.stage(), Stage::Idle);
        assert_eq!(run.progress(), 0);

        // 16 luma blocks + 2 * 4 chroma blocks = 24, suspending every 4th
        let mut stages = Vec::new();
        let mut log = ProgressLog::new();
        let output = loop {
            match run.resume(&mut log) {
                Step::Suspended(next) => {
                    assert_eq!(next.completed_blocks() % 4, 0);
                    stages.push(next.stage());
                    run = next;
                }
                Step::Complete(output) => break output,
            }
        };

        assert_eq!(
            stages,
            vec![
                Stage::ProcessY,
                Stage::ProcessY,
                Stage::ProcessY,
                Stage::ProcessY,
                Stage::ProcessCb,
                Stage::ProcessCr,
            ]
        );
        assert_eq!(output.width(), 32);
        assert_eq!(log.last(), Some(100));
    }

    #[test]
    fn test_flat_table_round_trip_gray_gradient() {
        let mut pixels = Vec::new();
        for y in 0..16u32 {
            for x in 0..16u32 {
                let v = (x * 12 + y * 3) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let image = PixelBuffer::new(16, 16, pixels).unwrap();
        let run = CompressionRun::with_table(
            image.clone(),
            QuantizationTable::flat(),
            &CompressionOptions::default(),
        )
        .unwrap();
        let output = run_to_completion(run, &mut Immediate, &mut NoProgress);

        for (p, q) in image.pixels().chunks_exact(4).zip(output.pixels().chunks_exact(4)) {
            for c in 0..3 {
                assert!(
                    (p[c] as i32 - q[c] as i32).abs() <= 1,
                    "expected {:?}, got {:?}",
                    p,
                    q
                );
            }
        }
    }

    #[test]
    fn test_flat_table_round_trip_uniform_colors() {
        for rgba in [[255, 0, 0, 255], [12, 200, 77, 255], [3, 4, 250, 0], [250, 250, 5, 128]] {
            let image = PixelBuffer::filled(16, 16, rgba).unwrap();
            let run = CompressionRun::with_table(
                image,
                QuantizationTable::flat(),
                &CompressionOptions::default(),
            )
            .unwrap();
            let output = run_to_completion(run, &mut Immediate, &mut NoProgress);
            for px in output.pixels().chunks_exact(4) {
                for c in 0..3 {
                    assert!((px[c] as i32 - rgba[c] as i32).abs() <= 1);
                }
                assert_eq!(px[3], 255);
            }
        }
    }

    #[test]
    fn test_low_quality_deviates_more() {
        let image = pattern(32, 32);
        let low = simulate_compression(image.clone(), 1.0, &mut NoProgress).unwrap();
        let high = simulate_compression(image.clone(), 99.0, &mut NoProgress).unwrap();
        assert!(mean_abs_deviation(&image, &low) > mean_abs_deviation(&image, &high));
    }

    #[test]
    fn test_independent_runs_do_not_share_state() {
        let a = CompressionRun::new(pattern(24, 24), &CompressionOptions::with_quality(10.0)).unwrap();
        let b = CompressionRun::new(pattern(24, 24), &CompressionOptions::with_quality(10.0)).unwrap();

        // Interleave two runs suspension by suspension
        let (mut a, mut b) = (Some(a), Some(b));
        let (mut out_a, mut out_b) = (None, None);
        let (mut log_a, mut log_b) = (ProgressLog::new(), ProgressLog::new());
        while out_a.is_none() || out_b.is_none() {
            if let Some(run) = a.take() {
                match run.resume(&mut log_a) {
                    Step::Suspended(next) => a = Some(next),
                    Step::Complete(output) => out_a = Some(output),
                }
            }
            if let Some(run) = b.take() {
                match run.resume(&mut log_b) {
                    Step::Suspended(next) => b = Some(next),
                    Step::Complete(output) => out_b = Some(output),
                }
            }
        }

        assert_eq!(out_a, out_b);
        assert_eq!(log_a.events, log_b.events);
        assert_eq!(log_a.events.len(), total_blocks(24, 24));
    }

    #[test]
    fn test_invalid_quality_rejected() {
        let image = PixelBuffer::filled(8, 8, [0, 0, 0, 255]).unwrap();
        for q in [0.0, 100.5, f64::NAN] {
            let result = simulate_compression(image.clone(), q, &mut NoProgress);
            assert!(matches!(result, Err(CompressionError::InvalidQuality(_))));
        }
    }

    #[test]
    fn test_with_table_rejects_zero_interval() {
        let image = PixelBuffer::filled(8, 8, [0, 0, 0, 255]).unwrap();
        let mut opts = CompressionOptions::default();
        opts.yield_interval = 0;
        let result = CompressionRun::with_table(image, QuantizationTable::flat(), &opts);
        assert!(matches!(result, Err(CompressionError::InvalidYieldInterval)));
    }
}
