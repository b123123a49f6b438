//! Demo physics collaborator: axis-aligned boxes falling onto a floor plane.
//!
//! This is a calling-contract exercise, not a solver: semi-implicit Euler
//! with a restitution bounce against y = 0. The step contract mirrors the
//! driver's: a fixed target substep plus the measured variable delta, with
//! the substep count capped per call.

use glam::Vec3;
use std::collections::BTreeMap;
use vitrine_common::{BodyId, Transform};
use vitrine_driver::PhysicsWorld;

#[derive(Debug, Clone, Copy)]
struct Body {
    position: Vec3,
    velocity: Vec3,
    half_extent: f32,
}

/// Boxes under gravity over an infinite floor at y = 0.
pub struct DropPhysics {
    bodies: BTreeMap<BodyId, Body>,
    gravity: Vec3,
    restitution: f32,
    accumulator: f64,
    paused: bool,
}

impl DropPhysics {
    pub fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            gravity: Vec3::new(0.0, -9.81, 0.0),
            restitution: 0.55,
            accumulator: 0.0,
            paused: false,
        }
    }

    /// Create a box body; the id is handed to the sync registry by the caller.
    pub fn spawn_box(&mut self, position: Vec3, half_extent: f32) -> BodyId {
        let id = BodyId::new();
        self.bodies.insert(
            id,
            Body {
                position,
                velocity: Vec3::ZERO,
                half_extent,
            },
        );
        tracing::debug!(?id, ?position, "spawned physics box");
        id
    }

    pub fn remove_body(&mut self, id: BodyId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn integrate(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            body.velocity += self.gravity * dt;
            body.position += body.velocity * dt;

            let floor = body.half_extent;
            if body.position.y < floor {
                body.position.y = floor;
                if body.velocity.y < 0.0 {
                    body.velocity.y = -body.velocity.y * self.restitution;
                }
            }
        }
    }
}

impl Default for DropPhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld for DropPhysics {
    fn step(
        &mut self,
        fixed_delta: f64,
        variable_delta: f64,
        iterations: u32,
    ) -> anyhow::Result<()> {
        if self.paused {
            return Ok(());
        }

        self.accumulator += variable_delta;
        let mut steps = 0;
        while self.accumulator >= fixed_delta && steps < iterations {
            self.integrate(fixed_delta as f32);
            self.accumulator -= fixed_delta;
            steps += 1;
        }
        // Drop any backlog beyond the substep cap rather than chase it.
        if steps == iterations && self.accumulator >= fixed_delta {
            self.accumulator = 0.0;
        }
        Ok(())
    }

    fn body_transform(&self, body: BodyId) -> Option<Transform> {
        self.bodies.get(&body).map(|b| Transform {
            position: b.position,
            scale: Vec3::splat(b.half_extent * 2.0),
            ..Transform::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED: f64 = 1.0 / 60.0;

    fn settle(physics: &mut DropPhysics, seconds: f64) {
        let ticks = (seconds / FIXED).ceil() as usize;
        for _ in 0..ticks {
            physics.step(FIXED, FIXED, 3).unwrap();
        }
    }

    #[test]
    fn bodies_fall_under_gravity() {
        let mut physics = DropPhysics::new();
        let id = physics.spawn_box(Vec3::new(0.0, 5.0, 0.0), 0.5);
        settle(&mut physics, 0.5);
        let t = physics.body_transform(id).unwrap();
        assert!(t.position.y < 5.0);
    }

    #[test]
    fn bodies_never_sink_below_the_floor() {
        let mut physics = DropPhysics::new();
        let id = physics.spawn_box(Vec3::new(0.0, 2.0, 0.0), 0.5);
        settle(&mut physics, 5.0);
        let t = physics.body_transform(id).unwrap();
        assert!(t.position.y >= 0.5 - 1e-4, "rested at {}", t.position.y);
    }

    #[test]
    fn pause_freezes_motion() {
        let mut physics = DropPhysics::new();
        let id = physics.spawn_box(Vec3::new(0.0, 5.0, 0.0), 0.5);
        physics.set_paused(true);
        settle(&mut physics, 1.0);
        assert_eq!(physics.body_transform(id).unwrap().position.y, 5.0);
    }

    #[test]
    fn substeps_are_capped_per_call() {
        let mut physics = DropPhysics::new();
        let id = physics.spawn_box(Vec3::new(0.0, 100.0, 0.0), 0.5);
        // A huge stall delta integrates at most `iterations` substeps.
        physics.step(FIXED, 10.0, 3).unwrap();
        let after_stall = physics.body_transform(id).unwrap().position.y;
        let expected_drop = {
            let mut reference = DropPhysics::new();
            let rid = reference.spawn_box(Vec3::new(0.0, 100.0, 0.0), 0.5);
            for _ in 0..3 {
                reference.step(FIXED, FIXED, 3).unwrap();
            }
            100.0 - reference.body_transform(rid).unwrap().position.y
        };
        assert!((100.0 - after_stall - expected_drop).abs() < 1e-4);
    }

    #[test]
    fn removed_body_reports_no_transform() {
        let mut physics = DropPhysics::new();
        let id = physics.spawn_box(Vec3::ZERO, 0.5);
        assert!(physics.remove_body(id));
        assert!(physics.body_transform(id).is_none());
        assert!(!physics.remove_body(id));
    }

    #[test]
    fn transform_scale_matches_box_size() {
        let mut physics = DropPhysics::new();
        let id = physics.spawn_box(Vec3::new(0.0, 1.0, 0.0), 0.25);
        let t = physics.body_transform(id).unwrap();
        assert_eq!(t.scale, Vec3::splat(0.5));
    }
}
