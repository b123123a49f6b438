use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A source of timestamps measured from an arbitrary fixed epoch.
///
/// Sampling is infallible: an implementation that cannot reach a wall clock
/// must degrade to a monotonic counter rather than error.
pub trait TimeSource {
    fn sample(&mut self) -> Duration;
}

/// Default time source backed by `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn sample(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven time source for tests and headless runs.
///
/// Cloning yields a handle onto the same underlying timeline, so a test can
/// keep one handle and give the other to a clock:
///
/// ```
/// use std::time::Duration;
/// use vitrine_clock::{FrameClock, ManualSource};
///
/// let time = ManualSource::new();
/// let mut clock = FrameClock::with_source(time.clone());
/// clock.tick();
/// time.advance(Duration::from_millis(16));
/// assert_eq!(clock.tick().delta, Duration::from_millis(16));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    nanos: Arc<AtomicU64>,
}

impl ManualSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the timeline forward.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Jump the timeline to an absolute point, forwards or backwards.
    pub fn set(&self, at: Duration) {
        self.nanos.store(at.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn current(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

impl TimeSource for ManualSource {
    fn sample(&mut self) -> Duration {
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_source_moves_forward() {
        let mut src = MonotonicSource::new();
        let a = src.sample();
        let b = src.sample();
        assert!(b >= a);
    }

    #[test]
    fn manual_source_shares_timeline_between_clones() {
        let src = ManualSource::new();
        let mut handle = src.clone();
        src.advance(Duration::from_millis(5));
        assert_eq!(handle.sample(), Duration::from_millis(5));
    }

    #[test]
    fn manual_source_can_jump_backwards() {
        let src = ManualSource::new();
        src.set(Duration::from_secs(10));
        src.set(Duration::from_secs(3));
        assert_eq!(src.current(), Duration::from_secs(3));
    }
}
