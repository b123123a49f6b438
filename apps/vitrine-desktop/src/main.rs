mod physics;
mod scene;

use anyhow::Result;
use clap::Parser;
use glam::Vec3;
use physics::DropPhysics;
use scene::{DemoWorld, PhysicsStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use vitrine_common::{BodyId, NodeId};
use vitrine_driver::{FrameDriver, FrameRequestHandle, FrameScheduler};
use vitrine_surface::InteractionSurface;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(350);

/// Dropped-box colors, cycled in spawn order.
const DROP_PALETTE: [[f32; 4]; 4] = [
    [0.9, 0.6, 0.1, 1.0],
    [0.7, 0.3, 0.8, 1.0],
    [0.2, 0.8, 0.8, 1.0],
    [0.9, 0.9, 0.3, 1.0],
];

#[derive(Parser)]
#[command(name = "vitrine-desktop", about = "Windowed vitrine demo scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// Run the scene without the physics collaborator
    #[arg(long)]
    no_physics: bool,
}

/// Frame scheduler backed by winit's redraw request.
///
/// The OS cannot revoke a queued redraw, so `cancel_frame` only forgets the
/// handle; a late redraw then finds no fired handle and is dropped here, and
/// the driver's stale check covers the rest.
struct RedrawScheduler {
    window: Arc<Window>,
    next_raw: u64,
    issued: Option<FrameRequestHandle>,
}

impl RedrawScheduler {
    fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_raw: 0,
            issued: None,
        }
    }

    /// Hand out the handle for the redraw that just fired, if one is owed.
    fn fired(&mut self) -> Option<FrameRequestHandle> {
        self.issued.take()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameRequestHandle {
        let handle = FrameRequestHandle::from_raw(self.next_raw);
        self.next_raw += 1;
        self.issued = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameRequestHandle) {
        if self.issued == Some(handle) {
            self.issued = None;
        }
    }
}

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    world: Option<DemoWorld>,
    driver: Option<FrameDriver<RedrawScheduler>>,
    physics: DropPhysics,
    interaction: InteractionSurface,
    /// Node/body pairs spawned from the panel, removed together on clear.
    dropped: Vec<(NodeId, BodyId)>,
    last_click: Option<Instant>,
    orbiting: bool,
}

impl App {
    fn new(cli: Cli) -> Self {
        let interaction = InteractionSurface::new(cli.width, cli.height);
        Self {
            cli,
            window: None,
            world: None,
            driver: None,
            physics: DropPhysics::new(),
            interaction,
            dropped: Vec::new(),
            last_click: None,
            orbiting: false,
        }
    }

    fn drop_box(&mut self) {
        let (Some(world), Some(driver)) = (self.world.as_mut(), self.driver.as_mut()) else {
            return;
        };
        let n = self.dropped.len();
        // Fan spawn positions out so stacked drops don't interpenetrate.
        let x = ((n % 5) as f32 - 2.0) * 0.9;
        let z = ((n / 5 % 5) as f32 - 2.0) * 0.9;
        let position = Vec3::new(x, 6.0, z);

        let body = self.physics.spawn_box(position, 0.4);
        let node = NodeId::new();
        world.add_free_node(
            node,
            DROP_PALETTE[n % DROP_PALETTE.len()],
            vitrine_common::Transform::at(position),
        );
        driver.register_sync(node, body);
        self.dropped.push((node, body));
    }

    fn clear_boxes(&mut self) {
        let (Some(world), Some(driver)) = (self.world.as_mut(), self.driver.as_mut()) else {
            return;
        };
        for (node, body) in self.dropped.drain(..) {
            driver.unregister_sync(node, body);
            self.physics.remove_body(body);
            world.remove_free_node(node);
        }
    }

    fn toggle_fullscreen(&mut self) {
        let Some(window) = &self.window else { return };
        if self.interaction.on_activate() {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            window.set_fullscreen(None);
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(world), Some(driver)) = (self.world.as_mut(), self.driver.as_mut()) else {
            return;
        };
        // Redraws the driver did not request (expose events) are not ticks.
        let Some(handle) = driver.scheduler_mut().fired() else {
            return;
        };

        world.set_pointer(self.interaction.pointer_ndc());
        world.set_physics_status(PhysicsStatus {
            paused: self.physics.is_paused(),
            body_count: self.physics.body_count(),
        });

        let result = if self.cli.no_physics {
            driver.on_frame(handle, world)
        } else {
            driver.on_frame_with_physics(handle, world, &mut self.physics)
        };

        match result {
            Ok(Some(tick)) => {
                world.stats.record(&tick);
                let actions = world.take_ui_actions();
                if actions.toggle_physics_pause {
                    let paused = !self.physics.is_paused();
                    self.physics.set_paused(paused);
                }
                if actions.drop_box {
                    self.drop_box();
                }
                if actions.clear_boxes {
                    self.clear_boxes();
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("frame loop halted: {e}");
                event_loop.exit();
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        match key {
            KeyCode::Escape => {
                if let Some(driver) = self.driver.as_mut() {
                    driver.stop();
                }
                event_loop.exit();
            }
            KeyCode::Space => {
                let paused = !self.physics.is_paused();
                self.physics.set_paused(paused);
                tracing::info!(paused, "physics pause toggled");
            }
            KeyCode::KeyB => self.drop_box(),
            KeyCode::KeyC => self.clear_boxes(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Vitrine")
            .with_inner_size(PhysicalSize::new(self.cli.width, self.cli.height));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let world = match DemoWorld::new(window.clone()) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!("failed to initialize GPU world: {e:#}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.interaction = InteractionSurface::new(size.width, size.height);

        let mut driver = FrameDriver::new(RedrawScheduler::new(window.clone()));
        driver.start();

        self.window = Some(window);
        self.world = Some(world);
        self.driver = Some(driver);
        tracing::info!("vitrine-desktop running");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(world) = self.world.as_mut() {
            if world.on_window_event(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(driver) = self.driver.as_mut() {
                    driver.stop();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(world) = self.world.as_mut() {
                    world.handle_resize(&mut self.interaction, new_size.width, new_size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.interaction
                    .on_pointer_move(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                let now = Instant::now();
                let double = self
                    .last_click
                    .is_some_and(|prev| now - prev <= DOUBLE_CLICK_WINDOW);
                self.last_click = if double { None } else { Some(now) };
                if double {
                    self.toggle_fullscreen();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.orbiting = btn_state == ElementState::Pressed;
                if let Some(window) = &self.window {
                    window.set_cursor_visible(!self.orbiting);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // The wheel edits the registered parameter, not the camera
                // directly, so the panel slider and the wheel stay agreed.
                if let Some(world) = self.world.as_mut() {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                    };
                    if let Some(current) = world.params.value("camera distance") {
                        world.params.set("camera distance", current - scroll * 0.4);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.handle_key(key, event_loop);
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.orbiting {
                if let Some(world) = self.world.as_mut() {
                    world
                        .camera
                        .orbit(delta.0 as f32 * 0.005, -delta.1 as f32 * 0.005);
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("vitrine-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}
