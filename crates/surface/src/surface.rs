use glam::Vec2;

/// Consumes the recomputed aspect ratio on resize (a camera projection).
pub trait ProjectionTarget {
    fn set_aspect(&mut self, aspect: f32);
}

/// Consumes the new pixel size on resize (a renderer's output buffer).
pub trait OutputTarget {
    fn set_output_size(&mut self, width: u32, height: u32);
}

/// Viewport dimensions in physical pixels. Zero dimensions are clamped to 1
/// so the aspect ratio stays finite through minimize events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Latest sampled interaction state.
///
/// One instance per window, owned by the host, written by its event handlers
/// and read at the start of each tick.
#[derive(Debug, Clone)]
pub struct InteractionSurface {
    viewport: ViewportSize,
    pointer_ndc: Vec2,
    presentation: bool,
}

impl InteractionSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: ViewportSize::new(width, height),
            pointer_ndc: Vec2::ZERO,
            presentation: false,
        }
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }

    /// Record a resize and push it into the camera projection and the output
    /// buffer before returning, so the next draw already sees it.
    pub fn on_resize(
        &mut self,
        width: u32,
        height: u32,
        projection: &mut dyn ProjectionTarget,
        output: &mut dyn OutputTarget,
    ) {
        self.viewport = ViewportSize::new(width, height);
        tracing::debug!(
            width = self.viewport.width,
            height = self.viewport.height,
            "viewport resized"
        );
        projection.set_aspect(self.viewport.aspect());
        output.set_output_size(self.viewport.width, self.viewport.height);
    }

    /// Record a pointer sample given in window pixel coordinates.
    ///
    /// Stored as normalized device coordinates: [-1, 1] on both axes for
    /// in-window positions, Y inverted relative to screen space.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        let w = self.viewport.width as f32;
        let h = self.viewport.height as f32;
        self.pointer_ndc = Vec2::new(x / w * 2.0 - 1.0, -(y / h * 2.0 - 1.0));
    }

    pub fn pointer_ndc(&self) -> Vec2 {
        self.pointer_ndc
    }

    /// Double-click/activation: toggle presentation mode. Fire-and-forget;
    /// returns the new state so the host can apply its side effect
    /// (fullscreen, etc.).
    pub fn on_activate(&mut self) -> bool {
        self.presentation = !self.presentation;
        tracing::debug!(on = self.presentation, "presentation mode toggled");
        self.presentation
    }

    pub fn presentation_mode(&self) -> bool {
        self.presentation
    }
}
