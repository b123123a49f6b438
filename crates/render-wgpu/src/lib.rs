//! wgpu render backend for the vitrine demos.
//!
//! Renders axes helper lines, a floor grid, and instanced colored boxes. The
//! camera orbits a target point and sways with the latest pointer sample.
//!
//! # Invariants
//! - The renderer never mutates scene state; it consumes a flat instance
//!   list built by the world each frame.
//! - Resize goes through `vitrine_surface::OutputTarget` on the host side;
//!   the depth buffer follows on the next `resize` call.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::{BoxInstance, SceneRenderer};
