use crate::clock::Tick;
use std::collections::VecDeque;
use std::time::Duration;

const DEFAULT_WINDOW: usize = 120;

/// Rolling frame-time statistics over a sliding window of tick samples.
///
/// First-tick samples (zero delta) are counted but excluded from the window,
/// so averages reflect real frame-to-frame spacing.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: VecDeque<Duration>,
    capacity: usize,
    frames: u64,
    max_delta: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    pub fn with_window(capacity: usize) -> Self {
        assert!(capacity > 0, "stats window must hold at least one sample");
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            frames: 0,
            max_delta: Duration::ZERO,
        }
    }

    pub fn record(&mut self, tick: &Tick) {
        self.frames += 1;
        if tick.frame_index == 0 {
            return;
        }
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(tick.delta);
        self.max_delta = self.max_delta.max(tick.delta);
    }

    /// Total ticks recorded, including first ticks.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Largest delta ever recorded.
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }

    /// Mean delta over the current window; zero before any spaced frame.
    pub fn average_delta(&self) -> Duration {
        if self.window.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.window.iter().sum();
        total / self.window.len() as u32
    }

    /// Frames per second over the current window; zero when unknown.
    pub fn fps(&self) -> f64 {
        let total: Duration = self.window.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.window.len() as f64 / total.as_secs_f64()
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FrameClock;
    use crate::source::ManualSource;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_tick_is_counted_but_not_averaged() {
        let mut stats = FrameStats::new();
        let mut clock = FrameClock::with_source(ManualSource::new());
        stats.record(&clock.tick());
        assert_eq!(stats.frames(), 1);
        assert_eq!(stats.average_delta(), Duration::ZERO);
        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn average_and_fps_over_fixed_step() {
        let time = ManualSource::new();
        let mut clock = FrameClock::with_source(time.clone());
        let mut stats = FrameStats::new();
        for _ in 0..11 {
            stats.record(&clock.tick());
            time.advance(ms(20));
        }
        assert_eq!(stats.average_delta(), ms(20));
        let fps = stats.fps();
        assert!((fps - 50.0).abs() < 1e-9, "fps was {fps}");
    }

    #[test]
    fn window_slides() {
        let time = ManualSource::new();
        let mut clock = FrameClock::with_source(time.clone());
        let mut stats = FrameStats::with_window(2);

        stats.record(&clock.tick());
        for step in [ms(10), ms(10), ms(40), ms(40)] {
            time.advance(step);
            stats.record(&clock.tick());
        }
        // Only the last two 40ms samples remain in the window.
        assert_eq!(stats.average_delta(), ms(40));
        assert_eq!(stats.max_delta(), ms(40));
    }
}
