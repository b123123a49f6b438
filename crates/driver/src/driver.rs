use crate::error::DriverError;
use crate::scheduler::{FrameRequestHandle, FrameScheduler};
use crate::sync::SyncRegistry;
use crate::world::{PhysicsWorld, RenderableWorld};
use vitrine_clock::{FrameClock, MonotonicSource, Tick, TimeSource};
use vitrine_common::{BodyId, NodeId, Transform};

/// Parameters handed to `PhysicsWorld::step` each tick.
///
/// The fixed target substep is passed alongside the measured variable delta;
/// the solver subdivides internally for stability while tracking real time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    pub fixed_delta: f64,
    pub iterations: u32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            fixed_delta: 1.0 / 60.0,
            iterations: 3,
        }
    }
}

/// The loop-owning object.
///
/// Owns the clock, the sync registry, the stopped flag, and the pending
/// frame handle. Worlds are borrowed per `on_frame` call and never held.
///
/// The host wires `on_frame` to its refresh signal: request a frame through
/// the scheduler, deliver the handle back when it fires. `stop()` cancels
/// the pending request, and a request the host could not revoke is caught by
/// the stale-handle check when it arrives anyway.
pub struct FrameDriver<S: FrameScheduler, T: TimeSource = MonotonicSource> {
    scheduler: S,
    clock: FrameClock<T>,
    sync: SyncRegistry,
    step: StepConfig,
    running: bool,
    pending: Option<FrameRequestHandle>,
}

impl<S: FrameScheduler> FrameDriver<S, MonotonicSource> {
    pub fn new(scheduler: S) -> Self {
        Self::with_clock(scheduler, FrameClock::new())
    }
}

impl<S: FrameScheduler, T: TimeSource> FrameDriver<S, T> {
    pub fn with_clock(scheduler: S, clock: FrameClock<T>) -> Self {
        Self {
            scheduler,
            clock,
            sync: SyncRegistry::new(),
            step: StepConfig::default(),
            running: false,
            pending: None,
        }
    }

    pub fn set_step_config(&mut self, step: StepConfig) {
        self.step = step;
    }

    pub fn step_config(&self) -> StepConfig {
        self.step
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Record a node/body relation for the per-tick sync copy.
    pub fn register_sync(&mut self, node: NodeId, body: BodyId) -> bool {
        self.sync.register(node, body)
    }

    /// Remove a node/body relation; both sides deregister together.
    pub fn unregister_sync(&mut self, node: NodeId, body: BodyId) -> bool {
        self.sync.unregister(node, body)
    }

    pub fn sync_pairs(&self) -> &SyncRegistry {
        &self.sync
    }

    /// Begin scheduling. Idempotent: a running driver keeps its single
    /// chain, so a second `start` never creates concurrent loops.
    pub fn start(&mut self) {
        if self.running {
            tracing::debug!("start ignored, driver already running");
            return;
        }
        self.running = true;
        self.pending = Some(self.scheduler.request_frame());
        tracing::debug!("driver started");
    }

    /// Halt the loop and cancel the pending frame request. Safe to call at
    /// any time; a callback the host delivers anyway no-ops on arrival.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if self.running {
            tracing::debug!("driver stopped");
        }
        self.running = false;
    }

    /// Drive one tick with no physics attached.
    pub fn on_frame<W>(
        &mut self,
        handle: FrameRequestHandle,
        world: &mut W,
    ) -> Result<Option<Tick>, DriverError>
    where
        W: RenderableWorld + ?Sized,
    {
        self.drive(handle, world, Option::<&mut NeverPhysics>::None)
    }

    /// Drive one tick, stepping the physics collaborator first.
    pub fn on_frame_with_physics<W, P>(
        &mut self,
        handle: FrameRequestHandle,
        world: &mut W,
        physics: &mut P,
    ) -> Result<Option<Tick>, DriverError>
    where
        W: RenderableWorld + ?Sized,
        P: PhysicsWorld + ?Sized,
    {
        self.drive(handle, world, Some(physics))
    }

    fn drive<W, P>(
        &mut self,
        handle: FrameRequestHandle,
        world: &mut W,
        physics: Option<&mut P>,
    ) -> Result<Option<Tick>, DriverError>
    where
        W: RenderableWorld + ?Sized,
        P: PhysicsWorld + ?Sized,
    {
        // Scheduling races resolve here: a callback that outlived stop(), or
        // one whose handle was cancelled, must not touch any collaborator.
        if !self.running {
            tracing::trace!(handle = handle.raw(), "frame fired after stop, ignoring");
            return Ok(None);
        }
        if self.pending != Some(handle) {
            tracing::trace!(handle = handle.raw(), "stale frame handle, ignoring");
            return Ok(None);
        }
        self.pending = None;

        let tick = self.clock.tick();
        let delta = tick.delta_seconds();
        let elapsed = tick.elapsed_seconds();

        if let Some(physics) = physics {
            if let Err(e) = physics.step(self.step.fixed_delta, delta, self.step.iterations) {
                self.stop();
                return Err(DriverError::Physics(e));
            }
            self.sync.copy_transforms(physics, world);
        }

        if let Err(e) = world.update(delta, elapsed) {
            self.stop();
            return Err(DriverError::Update(e));
        }
        if let Err(e) = world.draw() {
            self.stop();
            return Err(DriverError::Draw(e));
        }

        // Draw completed; only now may the next tick exist. A host stopping
        // "from within the tick" calls stop() right after this returns, which
        // cancels the request made here.
        self.pending = Some(self.scheduler.request_frame());
        Ok(Some(tick))
    }
}

/// Stands in for `P` when no physics is attached; cannot be constructed.
enum NeverPhysics {}

impl PhysicsWorld for NeverPhysics {
    fn step(
        &mut self,
        _fixed_delta: f64,
        _variable_delta: f64,
        _iterations: u32,
    ) -> anyhow::Result<()> {
        match *self {}
    }

    fn body_transform(&self, _body: BodyId) -> Option<Transform> {
        match *self {}
    }
}
