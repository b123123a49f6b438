//! The demo world: a spinning group of colored boxes, free-standing
//! physics-synced boxes, an orbit camera with pointer parallax, and the
//! egui control panel.

use anyhow::{Context, Result};
use glam::{EulerRot, Quat, Vec2, Vec3};
use std::collections::BTreeMap;
use std::sync::Arc;
use vitrine_clock::FrameStats;
use vitrine_common::{NodeId, Transform};
use vitrine_driver::RenderableWorld;
use vitrine_render_wgpu::{BoxInstance, OrbitCamera, SceneRenderer};
use vitrine_surface::{InteractionSurface, OutputTarget, ParamRegistry};
use winit::window::Window;

/// GUI-adjustable scene values, filled from the parameter registry each tick.
#[derive(Debug, Clone, Copy)]
pub struct SceneControls {
    pub spin_speed: f32,
    pub box_scale: f32,
    pub camera_distance: f32,
}

impl Default for SceneControls {
    fn default() -> Self {
        Self {
            spin_speed: 0.6,
            box_scale: 1.0,
            camera_distance: Vec3::new(1.0, 1.0, 3.0).length(),
        }
    }
}

/// One box in the spinning group, in group-local coordinates.
#[derive(Debug, Clone, Copy)]
struct GroupMember {
    offset: Vec3,
    color: [f32; 4],
}

/// Panel interactions that need collaborators the world cannot borrow
/// mid-tick (the driver, the physics world). Buffered here, applied by the
/// host after the tick returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiActions {
    pub drop_box: bool,
    pub clear_boxes: bool,
    pub toggle_physics_pause: bool,
}

/// Physics collaborator state mirrored into the panel, refreshed pre-tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicsStatus {
    pub paused: bool,
    pub body_count: usize,
}

/// Builds world-space instances for the group members.
///
/// The group's base orientation comes from the classic demo (x = pi/3,
/// z = pi/4), spun around Y and bobbed vertically with elapsed time.
fn group_instances(
    members: &[GroupMember],
    base: Quat,
    spin_angle: f32,
    bob: f32,
    scale: f32,
) -> Vec<BoxInstance> {
    let rotation = Quat::from_rotation_y(spin_angle) * base;
    members
        .iter()
        .map(|m| BoxInstance {
            transform: Transform {
                position: rotation * m.offset + Vec3::new(0.0, bob, 0.0),
                rotation,
                scale: Vec3::splat(scale),
            },
            color: m.color,
        })
        .collect()
}

pub struct DemoWorld {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
    pub camera: OrbitCamera,

    group_members: Vec<GroupMember>,
    group_base: Quat,
    spin_angle: f32,
    bob: f32,
    controls: SceneControls,
    pub params: ParamRegistry<SceneControls>,

    // Free-standing nodes written by the driver's sync copy.
    free_nodes: BTreeMap<NodeId, BoxInstance>,

    pointer_ndc: Vec2,
    pub stats: FrameStats,
    physics_status: PhysicsStatus,
    ui_actions: UiActions,

    egui_ctx: egui::Context,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl DemoWorld {
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("vitrine_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = SceneRenderer::new(&device, surface_format, config.width, config.height);

        let mut camera = OrbitCamera::default();
        camera.aspect = config.width as f32 / config.height as f32;

        // The original scene: red at the origin, green left, blue right.
        let group_members = vec![
            GroupMember {
                offset: Vec3::ZERO,
                color: [0.9, 0.1, 0.1, 1.0],
            },
            GroupMember {
                offset: Vec3::new(-2.0, 0.0, 0.0),
                color: [0.1, 0.9, 0.1, 1.0],
            },
            GroupMember {
                offset: Vec3::new(2.0, 0.0, 0.0),
                color: [0.1, 0.2, 0.9, 1.0],
            },
        ];
        let group_base = Quat::from_euler(
            EulerRot::XYZ,
            std::f32::consts::FRAC_PI_3,
            0.0,
            std::f32::consts::FRAC_PI_4,
        );

        let controls = SceneControls::default();
        let mut params = ParamRegistry::new();
        params.register(
            "spin speed",
            controls.spin_speed,
            0.0..=5.0,
            |c: &mut SceneControls, v| c.spin_speed = v,
        );
        params.register(
            "box scale",
            controls.box_scale,
            0.2..=2.5,
            |c: &mut SceneControls, v| c.box_scale = v,
        );
        params.register(
            "camera distance",
            controls.camera_distance,
            1.5..=15.0,
            |c: &mut SceneControls, v| c.camera_distance = v,
        );

        let egui_ctx = egui::Context::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            window,
            device,
            queue,
            surface,
            config,
            renderer,
            camera,
            group_members,
            group_base,
            spin_angle: 0.0,
            bob: 0.0,
            controls,
            params,
            free_nodes: BTreeMap::new(),
            pointer_ndc: Vec2::ZERO,
            stats: FrameStats::new(),
            physics_status: PhysicsStatus::default(),
            ui_actions: UiActions::default(),
            egui_ctx,
            egui_winit,
            egui_renderer,
        })
    }

    /// Forward a window event to egui; true means egui consumed it.
    pub fn on_window_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.egui_winit
            .on_window_event(&self.window, event)
            .consumed
    }

    /// Apply a resize through the interaction surface so the camera
    /// projection and the output buffer update before the next draw.
    pub fn handle_resize(&mut self, interaction: &mut InteractionSurface, width: u32, height: u32) {
        let Self {
            camera,
            device,
            surface,
            config,
            renderer,
            ..
        } = self;
        let mut output = SurfaceOutput {
            device,
            surface,
            config,
            renderer,
        };
        interaction.on_resize(width, height, camera, &mut output);
    }

    /// Latest pointer sample, copied in by the host at tick start.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer_ndc = ndc;
    }

    pub fn set_physics_status(&mut self, status: PhysicsStatus) {
        self.physics_status = status;
    }

    pub fn take_ui_actions(&mut self) -> UiActions {
        std::mem::take(&mut self.ui_actions)
    }

    /// Add a free-standing node the sync copy will keep updated.
    pub fn add_free_node(&mut self, node: NodeId, color: [f32; 4], transform: Transform) {
        self.free_nodes.insert(
            node,
            BoxInstance {
                transform,
                color,
            },
        );
    }

    pub fn remove_free_node(&mut self, node: NodeId) -> bool {
        self.free_nodes.remove(&node).is_some()
    }

    fn panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Vitrine");
                ui.separator();
                ui.label(format!("fps: {:.1}", self.stats.fps()));
                ui.label(format!(
                    "frame: {:.2} ms avg / {:.2} ms max",
                    self.stats.average_delta().as_secs_f64() * 1000.0,
                    self.stats.max_delta().as_secs_f64() * 1000.0,
                ));
                ui.separator();

                ui.heading("Scene");
                for slot in self.params.slots_mut() {
                    ui.add(egui::Slider::new(slot.value, slot.range).text(slot.name));
                }
                ui.separator();

                ui.heading("Physics");
                ui.label(format!("bodies: {}", self.physics_status.body_count));
                let mut paused = self.physics_status.paused;
                if ui.checkbox(&mut paused, "paused (Space)").changed() {
                    self.ui_actions.toggle_physics_pause = true;
                }
                ui.horizontal(|ui| {
                    if ui.button("Drop box (B)").clicked() {
                        self.ui_actions.drop_box = true;
                    }
                    if ui.button("Clear (C)").clicked() {
                        self.ui_actions.clear_boxes = true;
                    }
                });

                ui.separator();
                ui.small("Double-click: fullscreen | Esc: quit");
            });
    }
}

/// Output half of the resize seam: surface configuration plus depth buffer.
struct SurfaceOutput<'a> {
    device: &'a wgpu::Device,
    surface: &'a wgpu::Surface<'static>,
    config: &'a mut wgpu::SurfaceConfiguration,
    renderer: &'a mut SceneRenderer,
}

impl OutputTarget for SurfaceOutput<'_> {
    fn set_output_size(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.device, self.config);
        self.renderer.resize(self.device, width, height);
    }
}

impl RenderableWorld for DemoWorld {
    fn update(&mut self, delta: f64, elapsed: f64) -> Result<()> {
        self.params.apply_all(&mut self.controls);
        self.camera.distance = self.controls.camera_distance;
        self.camera.set_sway(self.pointer_ndc);
        self.spin_angle += self.controls.spin_speed * delta as f32;
        self.bob = (elapsed as f32).sin() * 0.15;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let mut instances = group_instances(
            &self.group_members,
            self.group_base,
            self.spin_angle,
            self.bob,
            self.controls.box_scale,
        );
        instances.extend(self.free_nodes.values().copied());

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(e) => anyhow::bail!("surface unrecoverable: {e}"),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer
            .render(&self.device, &self.queue, &view, &self.camera, &instances);

        // egui overlay pass.
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| self.panel(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        Ok(())
    }

    fn set_node_transform(&mut self, node: NodeId, transform: Transform) {
        match self.free_nodes.get_mut(&node) {
            Some(instance) => instance.transform = transform,
            None => tracing::warn!(?node, "sync write for unknown node"),
        }
    }
}
