//! ABOUTME: Detection tuning parameters fixed at construction
//! ABOUTME: Threshold, sampling stride, cycle rate, and cold-start behavior

use md_core::{Error, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How a cycle without a comparable previous sample buffer is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColdStartPolicy {
    /// Compare against a zero-filled buffer and report whatever that yields
    #[default]
    ZeroBaseline,
    /// Fill the buffer but always report no motion for the cold cycle
    Suppress,
}

/// Detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DetectionParameters {
    /// Grayscale delta a sample must exceed to count as changed
    pub threshold: u32,
    /// Pixels between neighbouring samples on both axes
    #[validate(range(min = 1))]
    pub stride: u32,
    /// Target detection cycles per second
    #[validate(range(exclusive_min = 0.0))]
    pub rate: f64,
    pub cold_start: ColdStartPolicy,
}

impl Default for DetectionParameters {
    fn default() -> Self {
        Self {
            threshold: 10,
            stride: 2,
            rate: 5.0,
            cold_start: ColdStartPolicy::ZeroBaseline,
        }
    }
}

impl DetectionParameters {
    /// Create checked parameters with the default cold-start policy
    pub fn new(threshold: u32, stride: u32, rate: f64) -> Result<Self> {
        let params = Self {
            threshold,
            stride,
            rate,
            cold_start: ColdStartPolicy::default(),
        };
        params.check()?;
        Ok(params)
    }

    pub fn with_cold_start(mut self, policy: ColdStartPolicy) -> Self {
        self.cold_start = policy;
        self
    }

    /// Reject a zero stride and any rate that is not a positive finite number
    pub fn check(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(Error::Validation("Sampling stride must be at least 1".to_string()));
        }
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(Error::Validation(format!(
                "Cycle rate must be positive, got {}",
                self.rate
            )));
        }
        Ok(())
    }
}
