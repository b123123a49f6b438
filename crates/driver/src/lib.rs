//! Frame Driver: the loop that turns a renderable world and an optional
//! physics collaborator into a sequence of ticks.
//!
//! Per tick, in fixed order: clock advance, physics step, sync copy
//! (simulation -> render), world update, draw, reschedule.
//!
//! # Invariants
//! - Ticks are strictly sequential; tick N+1 is requested only after tick
//!   N's draw returns.
//! - A callback firing after `stop()`, or carrying a cancelled handle,
//!   touches no collaborator.
//! - The driver borrows worlds per call; it never owns, constructs, or
//!   destroys them.
//! - A collaborator failure stops the loop before it is surfaced; the driver
//!   never reschedules against a known-broken collaborator.

pub mod driver;
pub mod error;
pub mod scheduler;
pub mod sync;
pub mod world;

pub use driver::{FrameDriver, StepConfig};
pub use error::DriverError;
pub use scheduler::{FrameRequestHandle, FrameScheduler, ManualScheduler};
pub use sync::{SyncPair, SyncRegistry};
pub use world::{PhysicsWorld, RenderableWorld};
