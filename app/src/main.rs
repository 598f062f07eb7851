mod frame_dir;

use frame_dir::ImageDirSource;
use md_config::Config;
use md_core::{telemetry, SystemClock};
use md_vision::{MotionSensor, PollOutcome, TracingSink};
use std::path::Path;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Load configuration - exit with non-zero if invalid
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_tracing("development", "motion-sensor");
            tracing::error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    telemetry::init_tracing(&config.telemetry.env, &config.telemetry.service);
    tracing::debug!(?config, "Configuration loaded successfully");

    let detector = match config.build_detector() {
        Ok(detector) => detector,
        Err(e) => {
            tracing::error!("Failed to create motion detector: {}", e);
            process::exit(1);
        }
    };

    let source = match ImageDirSource::open(Path::new(&config.source.frames_dir)) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Failed to open frame source: {}", e);
            process::exit(1);
        }
    };

    tracing::info!(
        region = ?config.region,
        threshold = config.detection.threshold,
        stride = config.detection.stride,
        rate = config.detection.rate,
        frames_dir = %config.source.frames_dir,
        frames = source.len(),
        "Motion sensor configured and running"
    );

    let mut sensor = MotionSensor::new(detector, SystemClock::new(), source, TracingSink::new());
    let mut ticker = tokio::time::interval(Duration::from_millis(config.source.poll_interval_ms));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut cycles = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let PollOutcome::Published(report) = sensor.poll() {
                    cycles += 1;
                    tracing::trace!(?report, "Cycle complete");
                }
            }
            _ = &mut shutdown => {
                tracing::info!(cycles, "Shutdown requested");
                break;
            }
        }
    }

    tracing::info!(
        released = sensor.source().released(),
        last_state = ?sensor.sink().state(),
        "Motion sensor stopped"
    );
}
