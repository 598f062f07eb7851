//! ABOUTME: Region of interest expressed as frame fractions and mapped to pixels
//! ABOUTME: Mapping is recomputed per frame and clamped to the frame bounds

use md_core::{Error, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Region of interest as fractions of the current frame size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegionConfig {
    /// Left edge (0.0 to 1.0)
    #[validate(range(min = 0.0, max = 1.0))]
    pub x_start: f64,
    /// Top edge (0.0 to 1.0)
    #[validate(range(min = 0.0, max = 1.0))]
    pub y_start: f64,
    /// Width (0.0 to 1.0)
    #[validate(range(min = 0.0, max = 1.0))]
    pub width: f64,
    /// Height (0.0 to 1.0)
    #[validate(range(min = 0.0, max = 1.0))]
    pub height: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self::full_frame()
    }
}

impl RegionConfig {
    /// Create a checked region
    pub fn new(x_start: f64, y_start: f64, width: f64, height: f64) -> Result<Self> {
        let region = Self {
            x_start,
            y_start,
            width,
            height,
        };
        region.check()?;
        Ok(region)
    }

    /// The whole frame
    pub fn full_frame() -> Self {
        Self {
            x_start: 0.0,
            y_start: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }

    /// Reject fractions that are NaN, infinite, or outside `[0, 1]`
    ///
    /// A region may still extend past the frame edge (`x_start + width > 1`);
    /// that case is handled by clamping in [`RegionRect::clamp_to`].
    pub fn check(&self) -> Result<()> {
        for (name, value) in [
            ("x_start", self.x_start),
            ("y_start", self.y_start),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::Validation(format!(
                    "Region {} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Absolute pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RegionRect {
    /// Restrict the rectangle to `[0, frame_width) x [0, frame_height)`
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> RegionRect {
        let x = self.x.min(frame_width);
        let y = self.y.min(frame_height);
        let right = self.x.saturating_add(self.width).min(frame_width);
        let bottom = self.y.saturating_add(self.height).min(frame_height);

        RegionRect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Map a fractional region onto a frame of the given size, truncating toward zero
pub fn map_region(region: &RegionConfig, frame_width: u32, frame_height: u32) -> RegionRect {
    RegionRect {
        x: scale(region.x_start, frame_width),
        y: scale(region.y_start, frame_height),
        width: scale(region.width, frame_width),
        height: scale(region.height, frame_height),
    }
}

// Float-to-int `as` saturates and maps NaN to 0.
fn scale(fraction: f64, extent: u32) -> u32 {
    (fraction * f64::from(extent)).floor() as u32
}
