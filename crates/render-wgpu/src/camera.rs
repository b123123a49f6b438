use glam::{Mat4, Vec2, Vec3};
use vitrine_surface::ProjectionTarget;

/// Camera orbiting a target point.
///
/// `yaw`/`pitch`/`distance` define the base orbit; the latest pointer NDC
/// sample deflects it by up to `sway` radians, giving the demos their
/// pointer-follow parallax. Sway is stored, not integrated, so the camera
/// settles the moment the pointer does.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sway: f32,
    sway_offset: Vec2,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // The demo's classic vantage point: (1, 1, 3) looking at the origin.
        let home = Vec3::new(1.0, 1.0, 3.0);
        Self {
            target: Vec3::ZERO,
            distance: home.length(),
            yaw: home.z.atan2(home.x),
            pitch: (home.y / home.length()).asin(),
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sway: 0.25,
            sway_offset: Vec2::ZERO,
        }
    }
}

impl OrbitCamera {
    /// Deflect the orbit toward the given pointer NDC sample.
    pub fn set_sway(&mut self, pointer_ndc: Vec2) {
        self.sway_offset = pointer_ndc * self.sway;
    }

    /// Rotate the base orbit.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch =
            (self.pitch + delta_pitch).clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    /// Move toward or away from the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(0.5, 100.0);
    }

    pub fn position(&self) -> Vec3 {
        let yaw = self.yaw + self.sway_offset.x;
        let pitch = (self.pitch + self.sway_offset.y)
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
        self.target
            + self.distance
                * Vec3::new(
                    pitch.cos() * yaw.cos(),
                    pitch.sin(),
                    pitch.cos() * yaw.sin(),
                )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl ProjectionTarget for OrbitCamera {
    fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orbit_sits_at_the_demo_vantage() {
        let cam = OrbitCamera::default();
        let pos = cam.position();
        assert!((pos - Vec3::new(1.0, 1.0, 3.0)).length() < 1e-4, "{pos}");
    }

    #[test]
    fn set_aspect_feeds_projection() {
        let mut cam = OrbitCamera::default();
        cam.set_aspect(2.0);
        assert_eq!(cam.aspect, 2.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn sway_deflects_and_releases() {
        let mut cam = OrbitCamera::default();
        let base = cam.position();
        cam.set_sway(Vec2::new(1.0, 0.0));
        assert_ne!(cam.position(), base);
        cam.set_sway(Vec2::ZERO);
        assert_eq!(cam.position(), base);
    }

    #[test]
    fn pitch_clamps_short_of_the_pole() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, 10.0);
        assert!(cam.pitch <= 89.0_f32.to_radians());
        // The up vector stays valid at the clamped extreme.
        assert!(!cam.view_matrix().col(0).x.is_nan());
    }
}
