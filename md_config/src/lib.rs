//! ABOUTME: Configuration management with validation and environment loading
//! ABOUTME: Loads region and detection settings from defaults, a TOML file, and env vars

use config::{Config as ConfigBuilder, Environment, File};
use md_core::{Error, Result};
use md_vision::{DetectionParameters, MotionDetector, RegionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "motion.toml";

/// Main configuration struct
#[derive(Debug, Clone, Deserialize, Serialize, Validate, Default)]
#[serde(default)]
pub struct Config {
    #[validate(nested)]
    pub region: RegionConfig,
    #[validate(nested)]
    pub detection: DetectionParameters,
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
    #[validate(nested)]
    pub source: SourceConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct TelemetryConfig {
    /// "production" switches to JSON logs
    #[validate(length(min = 1))]
    pub env: String,
    #[validate(length(min = 1))]
    pub service: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            service: "motion-sensor".to_string(),
        }
    }
}

/// Software frame source used by the host binary
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory of PNG/JPEG frames replayed in name order
    #[validate(length(min = 1))]
    pub frames_dir: String,
    /// How often the host polls the sensor, in milliseconds
    #[validate(range(min = 1, max = 60000))]
    pub poll_interval_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            frames_dir: "./frames".to_string(),
            poll_interval_ms: 50,
        }
    }
}

impl Config {
    /// Load configuration from defaults, `motion.toml` if present, and `MOTION_` env vars
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration using an explicit (optional) TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let defaults = Config::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("region.x_start", defaults.region.x_start)?
            .set_default("region.y_start", defaults.region.y_start)?
            .set_default("region.width", defaults.region.width)?
            .set_default("region.height", defaults.region.height)?
            .set_default("detection.threshold", i64::from(defaults.detection.threshold))?
            .set_default("detection.stride", i64::from(defaults.detection.stride))?
            .set_default("detection.rate", defaults.detection.rate)?
            .set_default("detection.cold_start", "zero_baseline")?
            .set_default("telemetry.env", defaults.telemetry.env)?
            .set_default("telemetry.service", defaults.telemetry.service)?
            .set_default("source.frames_dir", defaults.source.frames_dir)?
            .set_default("source.poll_interval_ms", defaults.source.poll_interval_ms as i64)?;

        if path.exists() {
            builder = builder.add_source(File::from(path).required(false));
        }

        // Environment variables with MOTION_ prefix (highest priority), e.g.
        // MOTION_DETECTION__STRIDE=4 or MOTION_REGION__X_START=0.25
        builder = builder.add_source(
            Environment::with_prefix("MOTION")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build config: {}", e)))?;

        let parsed: Config = config
            .try_deserialize()
            .map_err(|e| Error::Config(format!("Failed to deserialize config: {}", e)))?;

        parsed.check()?;
        Ok(parsed)
    }

    /// Run declarative validation plus the detector's own checks
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::Config(format!("Config validation failed: {}", e)))?;
        self.region
            .check()
            .and_then(|_| self.detection.check())
            .map_err(|e| Error::Config(format!("Config validation failed: {}", e)))
    }

    /// Build a detector from the region and detection sections
    pub fn build_detector(&self) -> Result<MotionDetector> {
        MotionDetector::new(self.region, self.detection)
    }
}
