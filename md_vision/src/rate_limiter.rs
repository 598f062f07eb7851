//! ABOUTME: Gate that paces detection cycles to a target rate
//! ABOUTME: Compensates for irregular host polling using an injected clock

use tracing::trace;

/// Decides on each invocation whether a detection cycle may run
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval_ms: Option<f64>,
    last_processed: Option<u64>,
}

impl RateLimiter {
    /// Limit to `rate` cycles per second
    ///
    /// A rate that is not a positive finite number disables the gate.
    pub fn new(rate: f64) -> Self {
        let interval_ms = (rate.is_finite() && rate > 0.0).then(|| 1000.0 / rate);
        Self {
            interval_ms,
            last_processed: None,
        }
    }

    /// Proceed when at least one interval has passed since the last proceed
    ///
    /// The first call always proceeds. A proceed records `now`; a skip changes
    /// nothing.
    pub fn try_proceed(&mut self, now_ms: u64) -> bool {
        if let (Some(interval), Some(last)) = (self.interval_ms, self.last_processed) {
            let elapsed = now_ms.saturating_sub(last);
            if (elapsed as f64) < interval {
                trace!(elapsed, interval, "Skipping cycle");
                return false;
            }
        }

        self.last_processed = Some(now_ms);
        true
    }

    /// Forget the last timestamp so the next call proceeds
    pub fn reset(&mut self) {
        self.last_processed = None;
    }

    pub fn interval_ms(&self) -> Option<f64> {
        self.interval_ms
    }

    pub fn last_processed(&self) -> Option<u64> {
        self.last_processed
    }
}
