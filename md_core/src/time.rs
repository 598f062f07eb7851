// ABOUTME: Monotonic millisecond clock used to pace detection cycles.
// ABOUTME: Hosts inject a Clock so rate limiting can be tested deterministically.
use std::time::Instant;

/// Source of monotonically non-decreasing timestamps in milliseconds
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin
    fn now_millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Wall-independent clock measuring from its own creation
///
/// # Examples
///
/// ```
/// use md_core::{Clock, SystemClock};
/// use std::thread;
/// use std::time::Duration;
///
/// let clock = SystemClock::new();
/// thread::sleep(Duration::from_millis(2));
/// assert!(clock.now_millis() >= 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
