use vitrine_common::{BodyId, NodeId, Transform};

/// A renderable world: scene, camera, and GPU resources, all opaque to the
/// driver.
///
/// `update` and `draw` must not fail for benign conditions (a zero delta is
/// normal); an error means an unrecoverable loss such as a dead surface, and
/// the driver responds by stopping the loop.
pub trait RenderableWorld {
    /// Per-frame mutation outside physics: procedural attributes, shader
    /// uniforms, GUI-driven value application. Times are in seconds.
    fn update(&mut self, delta: f64, elapsed: f64) -> anyhow::Result<()>;

    /// Submit the current frame for presentation.
    fn draw(&mut self) -> anyhow::Result<()>;

    /// Write half of the sync copy: overwrite a render node's transform with
    /// the one sampled from its simulation body.
    fn set_node_transform(&mut self, node: NodeId, transform: Transform);
}

/// A rigid-body simulation advanced once per tick.
///
/// `fixed_delta` is the target substep the solver may subdivide internally
/// for stability; `variable_delta` is the measured real time since the last
/// tick.
pub trait PhysicsWorld {
    fn step(&mut self, fixed_delta: f64, variable_delta: f64, iterations: u32)
    -> anyhow::Result<()>;

    /// Read half of the sync copy. `None` means the body no longer exists.
    fn body_transform(&self, body: BodyId) -> Option<Transform>;
}
