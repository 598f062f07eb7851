//! ABOUTME: Sampled luminance-difference motion detector over a region of interest
//! ABOUTME: Owns the previous-cycle sample buffer and evaluates one frame at a time

use crate::decision::is_motion;
use crate::frame::{Frame, FrameDescriptor};
use crate::params::{ColdStartPolicy, DetectionParameters};
use crate::region::{map_region, RegionConfig, RegionRect};
use crate::sampling::{accumulate_diffs, SampleBuffer, SampleGrid};
use md_core::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of evaluating one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Whether motion was detected
    pub motion: bool,
    /// Samples whose grayscale value moved by more than the threshold
    pub diff_count: usize,
    /// Samples on this cycle's grid
    pub sample_count: usize,
    /// `diff_count / sample_count`, zero for an empty grid
    pub change_ratio: f64,
    /// Region actually sampled, after clamping to the frame
    pub region: RegionRect,
    /// Whether the sample buffer had no comparable previous cycle
    pub cold_start: bool,
}

/// Single-previous-frame motion detector
#[derive(Debug, Clone)]
pub struct MotionDetector {
    region: RegionConfig,
    params: DetectionParameters,
    buffer: SampleBuffer,
}

impl MotionDetector {
    /// Create a detector with an empty, cold sample buffer
    pub fn new(region: RegionConfig, params: DetectionParameters) -> Result<Self> {
        region.check()?;
        params.check()?;

        Ok(Self {
            region,
            params,
            buffer: SampleBuffer::new(),
        })
    }

    /// Run one detection pass over `frame`
    pub fn evaluate(&mut self, frame: &FrameDescriptor<'_>) -> CycleReport {
        let requested = map_region(&self.region, frame.width(), frame.height());
        let rect = requested.clamp_to(frame.width(), frame.height());
        if rect != requested {
            debug!(
                ?requested,
                clamped = ?rect,
                frame_width = frame.width(),
                frame_height = frame.height(),
                "Region exceeds frame, clamping"
            );
        }

        let grid = SampleGrid::new(rect, self.params.stride);
        let sample_count = grid.sample_count();
        let cold_start = self.buffer.prepare(&grid);
        if cold_start {
            debug!(sample_count, policy = ?self.params.cold_start, "Cold start cycle");
        }

        let diff_count = accumulate_diffs(
            frame,
            &grid,
            self.buffer.samples_mut(),
            self.params.threshold,
        );
        self.buffer.mark_warm();

        let suppressed = cold_start && self.params.cold_start == ColdStartPolicy::Suppress;
        let motion = !suppressed && is_motion(diff_count, sample_count);
        let change_ratio = if sample_count == 0 {
            0.0
        } else {
            diff_count as f64 / sample_count as f64
        };

        debug!(
            diff_count,
            sample_count,
            change_ratio,
            cold_start,
            motion,
            "Motion analysis"
        );

        CycleReport {
            motion,
            diff_count,
            sample_count,
            change_ratio,
            region: rect,
            cold_start,
        }
    }

    /// Boolean form of [`evaluate`](Self::evaluate)
    pub fn evaluate_frame<F: Frame + ?Sized>(&mut self, frame: &F) -> bool {
        self.evaluate(&frame.descriptor()).motion
    }

    /// Discard stored samples so the next cycle cold-starts
    pub fn reset(&mut self) {
        debug!("Resetting motion detector state");
        self.buffer.mark_cold();
    }

    pub fn region(&self) -> &RegionConfig {
        &self.region
    }

    pub fn params(&self) -> &DetectionParameters {
        &self.params
    }

    pub fn sample_buffer(&self) -> &SampleBuffer {
        &self.buffer
    }
}
