use crate::source::{MonotonicSource, TimeSource};
use std::time::Duration;

/// One frame's timing sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Total time accumulated across ticks since the first tick.
    pub elapsed: Duration,
    /// Time since the previous tick; zero on the first tick.
    pub delta: Duration,
    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

impl Tick {
    pub fn delta_seconds(&self) -> f64 {
        self.delta.as_secs_f64()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Per-driver frame clock.
///
/// `elapsed` accumulates clamped deltas instead of subtracting from a start
/// timestamp, which keeps it non-decreasing even when the underlying source
/// jumps backwards.
#[derive(Debug, Clone)]
pub struct FrameClock<T: TimeSource = MonotonicSource> {
    source: T,
    last: Option<Duration>,
    elapsed: Duration,
    frame_index: u64,
}

impl FrameClock<MonotonicSource> {
    pub fn new() -> Self {
        Self::with_source(MonotonicSource::new())
    }
}

impl Default for FrameClock<MonotonicSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> FrameClock<T> {
    pub fn with_source(source: T) -> Self {
        Self {
            source,
            last: None,
            elapsed: Duration::ZERO,
            frame_index: 0,
        }
    }

    /// Advance the clock and return this frame's sample.
    ///
    /// The first call after construction or `reset()` yields `delta == 0`
    /// and `elapsed == 0`: there is no prior sample to measure against.
    pub fn tick(&mut self) -> Tick {
        let now = self.source.sample();
        let delta = match self.last {
            Some(prev) => {
                if now < prev {
                    tracing::warn!(
                        prev_us = prev.as_micros() as u64,
                        now_us = now.as_micros() as u64,
                        "non-monotonic time sample, clamping delta to zero"
                    );
                }
                now.saturating_sub(prev)
            }
            None => Duration::ZERO,
        };
        self.last = Some(now);
        self.elapsed += delta;

        let tick = Tick {
            elapsed: self.elapsed,
            delta,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        tick
    }

    /// Current elapsed time without committing a tick.
    ///
    /// Repeated calls between ticks never perturb the next delta.
    pub fn now(&mut self) -> Duration {
        match self.last {
            Some(prev) => self.elapsed + self.source.sample().saturating_sub(prev),
            None => Duration::ZERO,
        }
    }

    /// Elapsed time as of the most recent tick.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Index the next tick will carry.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Restart the clock: next tick is a first tick again.
    pub fn reset(&mut self) {
        self.last = None;
        self.elapsed = Duration::ZERO;
        self.frame_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ManualSource;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_tick_has_zero_delta_and_elapsed() {
        let time = ManualSource::new();
        time.set(ms(500));
        let mut clock = FrameClock::with_source(time);
        let t = clock.tick();
        assert_eq!(t.delta, Duration::ZERO);
        assert_eq!(t.elapsed, Duration::ZERO);
        assert_eq!(t.frame_index, 0);
    }

    #[test]
    fn fixed_step_accumulates_elapsed() {
        let time = ManualSource::new();
        let mut clock = FrameClock::with_source(time.clone());
        let mut elapsed = Vec::new();
        for _ in 0..5 {
            elapsed.push(clock.tick().elapsed);
            time.advance(ms(16));
        }
        assert_eq!(elapsed, vec![ms(0), ms(16), ms(32), ms(48), ms(64)]);
    }

    #[test]
    fn elapsed_never_decreases_and_delta_never_negative() {
        let time = ManualSource::new();
        let mut clock = FrameClock::with_source(time.clone());
        clock.tick();
        time.set(ms(100));
        let t = clock.tick();
        assert_eq!(t.delta, ms(100));

        // Source jumps backwards: delta clamps, elapsed holds.
        time.set(ms(40));
        let t = clock.tick();
        assert_eq!(t.delta, Duration::ZERO);
        assert_eq!(t.elapsed, ms(100));

        // Forward progress resumes from the rewound point.
        time.set(ms(55));
        let t = clock.tick();
        assert_eq!(t.delta, ms(15));
        assert_eq!(t.elapsed, ms(115));
    }

    #[test]
    fn now_does_not_commit_a_tick() {
        let time = ManualSource::new();
        let mut clock = FrameClock::with_source(time.clone());
        clock.tick();
        time.advance(ms(10));
        assert_eq!(clock.now(), ms(10));
        assert_eq!(clock.now(), ms(10));
        // The full 10ms still shows up in the next tick's delta.
        assert_eq!(clock.tick().delta, ms(10));
    }

    #[test]
    fn frame_index_increments_per_tick() {
        let mut clock = FrameClock::with_source(ManualSource::new());
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn reset_restores_first_tick_semantics() {
        let time = ManualSource::new();
        let mut clock = FrameClock::with_source(time.clone());
        clock.tick();
        time.advance(ms(16));
        clock.tick();
        clock.reset();
        let t = clock.tick();
        assert_eq!(t.delta, Duration::ZERO);
        assert_eq!(t.elapsed, Duration::ZERO);
        assert_eq!(t.frame_index, 0);
    }
}
