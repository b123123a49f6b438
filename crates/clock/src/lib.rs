//! Frame timing for the vitrine loop.
//!
//! One `FrameClock` per driver instance. Call `tick()` once per frame to
//! obtain a `Tick` sample; the first tick after construction (or `reset()`)
//! reports a zero delta because there is no prior sample to subtract.
//!
//! # Invariants
//! - `elapsed` is monotonically non-decreasing across all tick sequences.
//! - `delta` is never negative; a backwards time sample clamps to zero.
//! - A clock cannot fail: `TimeSource::sample` is infallible by signature.

pub mod clock;
pub mod source;
pub mod stats;

pub use clock::{FrameClock, Tick};
pub use source::{ManualSource, MonotonicSource, TimeSource};
pub use stats::FrameStats;
