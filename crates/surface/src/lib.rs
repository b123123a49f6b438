//! Interaction surface: the shared state between host event handlers and the
//! tick.
//!
//! Handlers write (resize, pointer, activation); the next tick reads. Resize
//! propagation is synchronous: a resize without immediate re-projection
//! produces one distorted frame, so the camera and output buffer are updated
//! inside the event handler, never deferred.
//!
//! # Invariants
//! - No state here is mutated mid-tick; the host applies events between
//!   ticks.
//! - Pointer samples are normalized device coordinates, Y up.

pub mod params;
pub mod surface;

pub use params::{ParamRegistry, ParamSlot};
pub use surface::{InteractionSurface, OutputTarget, ProjectionTarget, ViewportSize};
