//! ABOUTME: Polling motion sensor wiring clock, frame source, detector, and state sink
//! ABOUTME: One call to poll is one rate-limited detection cycle

use crate::detector::{CycleReport, MotionDetector};
use crate::frame::{Frame, FrameGuard, FrameSource};
use crate::rate_limiter::RateLimiter;
use md_core::Clock;
use metrics::{counter, gauge};
use tracing::{debug, info, instrument, warn};

/// Push-style consumer of motion decisions
pub trait StateSink {
    fn publish(&mut self, motion: bool);
}

impl<F: FnMut(bool)> StateSink for F {
    fn publish(&mut self, motion: bool) {
        self(motion)
    }
}

/// Sink that logs every decision and highlights state transitions
#[derive(Debug, Default)]
pub struct TracingSink {
    last: Option<bool>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently published state
    pub fn state(&self) -> Option<bool> {
        self.last
    }
}

impl StateSink for TracingSink {
    fn publish(&mut self, motion: bool) {
        if self.last != Some(motion) {
            info!(motion, "Motion state changed");
        } else {
            debug!(motion, "Motion state published");
        }
        self.last = Some(motion);
    }
}

/// What a single [`MotionSensor::poll`] did
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Too soon since the last cycle; nothing acquired or published
    Skipped,
    /// The frame source failed; nothing published
    AcquisitionFailed,
    /// A full cycle ran and its decision was published
    Published(CycleReport),
}

/// Rate-limited motion sensor driven by repeated host calls to [`poll`](Self::poll)
pub struct MotionSensor<C, S, P> {
    clock: C,
    source: S,
    sink: P,
    limiter: RateLimiter,
    detector: MotionDetector,
}

impl<C, S, P> MotionSensor<C, S, P>
where
    C: Clock,
    S: FrameSource,
    P: StateSink,
{
    pub fn new(detector: MotionDetector, clock: C, source: S, sink: P) -> Self {
        let limiter = RateLimiter::new(detector.params().rate);
        Self {
            clock,
            source,
            sink,
            limiter,
            detector,
        }
    }

    /// Run one cycle if the rate limiter allows it
    ///
    /// Acquisition failures are logged and absorbed; the next poll retries.
    #[instrument(skip(self))]
    pub fn poll(&mut self) -> PollOutcome {
        let now = self.clock.now_millis();
        if !self.limiter.try_proceed(now) {
            counter!("motion_cycles_skipped_total").increment(1);
            return PollOutcome::Skipped;
        }

        let guard = match FrameGuard::acquire(&mut self.source) {
            Ok(guard) => guard,
            Err(e) => {
                warn!(error = %e, "Failed to get frame");
                counter!("motion_acquisition_failures_total").increment(1);
                return PollOutcome::AcquisitionFailed;
            }
        };

        let Some(frame) = guard.frame() else {
            warn!("Frame guard holds no frame");
            counter!("motion_acquisition_failures_total").increment(1);
            return PollOutcome::AcquisitionFailed;
        };
        let report = self.detector.evaluate(&frame.descriptor());
        self.sink.publish(report.motion);
        drop(guard);

        counter!("motion_cycles_total").increment(1);
        gauge!("motion_sample_count").set(report.sample_count as f64);
        if report.motion {
            counter!("motion_detected_total").increment(1);
        }

        PollOutcome::Published(report)
    }

    /// Cold-start the detector and let the next poll run immediately
    pub fn reset(&mut self) {
        self.detector.reset();
        self.limiter.reset();
    }

    pub fn detector(&self) -> &MotionDetector {
        &self.detector
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn into_parts(self) -> (MotionDetector, C, S, P) {
        (self.detector, self.clock, self.source, self.sink)
    }
}
