//! ABOUTME: Sparse sampling grid, persistent sample buffer, and the per-cycle diff pass
//! ABOUTME: Buffer index i always maps to the same grid position while the grid layout holds

use crate::frame::FrameDescriptor;
use crate::luminance::rgb565_to_gray;
use crate::region::RegionRect;
use tracing::{debug, trace};

/// Fixed-stride grid of sample positions inside a pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleGrid {
    origin_x: u32,
    origin_y: u32,
    cols: u32,
    rows: u32,
    stride: u32,
}

impl SampleGrid {
    /// Lay a grid over `rect`; a zero stride yields an empty grid
    pub fn new(rect: RegionRect, stride: u32) -> Self {
        let (cols, rows) = match stride {
            0 => (0, 0),
            s => (rect.width / s, rect.height / s),
        };

        Self {
            origin_x: rect.x,
            origin_y: rect.y,
            cols,
            rows,
            stride,
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn sample_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Sample coordinates in row-major order
    ///
    /// Exactly `cols` samples per row and `rows` rows, so the iterator length
    /// always equals [`sample_count`](Self::sample_count).
    pub fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> {
        let Self {
            origin_x,
            origin_y,
            cols,
            rows,
            stride,
        } = *self;

        (0..rows).flat_map(move |row| {
            let y = origin_y + row * stride;
            (0..cols).map(move |col| (origin_x + col * stride, y))
        })
    }
}

/// Grayscale samples from the previous cycle, in grid-scan order
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<u8>,
    layout: Option<SampleGrid>,
    warm: bool,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay the buffer out for this cycle's grid and report whether it is a cold start
    ///
    /// Any change of grid layout (origin, columns, rows, or stride) discards
    /// every stored sample, even when the sample count is unchanged. A cold
    /// buffer is always zero-filled before use.
    pub fn prepare(&mut self, grid: &SampleGrid) -> bool {
        if self.layout.as_ref() != Some(grid) {
            debug!(
                previous = ?self.layout,
                current = ?grid,
                "Sample grid layout changed, resetting buffer"
            );
            self.samples.clear();
            self.samples.resize(grid.sample_count(), 0);
            self.layout = Some(*grid);
            self.warm = false;
        } else if !self.warm {
            self.samples.fill(0);
        }

        !self.warm
    }

    /// Record that the buffer now holds a full cycle of samples
    pub fn mark_warm(&mut self) {
        self.warm = true;
    }

    /// Force the next cycle to cold-start
    pub fn mark_cold(&mut self) {
        self.warm = false;
    }

    pub fn is_warm(&self) -> bool {
        self.warm
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }
}

/// Compare each grid sample against `previous`, overwriting as it goes
///
/// Returns how many samples moved by strictly more than `threshold`. Every
/// visited slot ends up holding the new value whether or not it differed.
pub fn accumulate_diffs(
    frame: &FrameDescriptor<'_>,
    grid: &SampleGrid,
    previous: &mut [u8],
    threshold: u32,
) -> usize {
    debug_assert_eq!(previous.len(), grid.sample_count());

    let mut diff_count = 0;
    for ((x, y), stored) in grid.coordinates().zip(previous.iter_mut()) {
        let Some(pixel) = frame.pixel(x, y) else {
            trace!(x, y, "Sample outside frame, keeping previous value");
            continue;
        };
        let gray = rgb565_to_gray(pixel);

        if u32::from(gray.abs_diff(*stored)) > threshold {
            diff_count += 1;
        }
        *stored = gray;
    }

    diff_count
}
