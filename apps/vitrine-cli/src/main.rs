use anyhow::Result;
use clap::{Parser, Subcommand};
use glam::Vec3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vitrine_clock::{FrameClock, FrameStats, ManualSource};
use vitrine_common::{BodyId, NodeId, Transform};
use vitrine_driver::{FrameDriver, ManualScheduler, PhysicsWorld, RenderableWorld, StepConfig};

#[derive(Parser)]
#[command(name = "vitrine-cli", about = "Headless vitrine loop runner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and driver defaults
    Info,
    /// Spin the driver against a no-op world and report loop throughput
    Bench {
        /// Number of ticks to run
        #[arg(short, long, default_value = "10000")]
        ticks: u64,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drop a body through the sync copy and print its synced transform
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "30")]
        ticks: u64,
        /// Simulated milliseconds per tick
        #[arg(long, default_value = "16")]
        step_ms: u64,
        /// Drop height in meters
        #[arg(long, default_value = "20.0")]
        height: f32,
    },
}

/// World that accepts ticks and sync writes but renders nothing.
#[derive(Default)]
struct HeadlessWorld {
    nodes: BTreeMap<NodeId, Transform>,
    updates: u64,
    draws: u64,
}

impl RenderableWorld for HeadlessWorld {
    fn update(&mut self, _delta: f64, _elapsed: f64) -> Result<()> {
        self.updates += 1;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        self.draws += 1;
        Ok(())
    }

    fn set_node_transform(&mut self, node: NodeId, transform: Transform) {
        self.nodes.insert(node, transform);
    }
}

/// Point bodies in free fall; enough to exercise the step contract headless.
#[derive(Default)]
struct FreeFallPhysics {
    bodies: BTreeMap<BodyId, (Vec3, Vec3)>,
    accumulator: f64,
}

impl FreeFallPhysics {
    const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    fn spawn(&mut self, position: Vec3) -> BodyId {
        let id = BodyId::new();
        self.bodies.insert(id, (position, Vec3::ZERO));
        id
    }
}

impl PhysicsWorld for FreeFallPhysics {
    fn step(&mut self, fixed_delta: f64, variable_delta: f64, iterations: u32) -> Result<()> {
        self.accumulator += variable_delta;
        let mut steps = 0;
        while self.accumulator >= fixed_delta && steps < iterations {
            let dt = fixed_delta as f32;
            for (position, velocity) in self.bodies.values_mut() {
                *velocity += Self::GRAVITY * dt;
                *position += *velocity * dt;
            }
            self.accumulator -= fixed_delta;
            steps += 1;
        }
        if steps == iterations && self.accumulator >= fixed_delta {
            self.accumulator = 0.0;
        }
        Ok(())
    }

    fn body_transform(&self, body: BodyId) -> Option<Transform> {
        self.bodies.get(&body).map(|(p, _)| Transform::at(*p))
    }
}

#[derive(Serialize)]
struct BenchReport {
    ticks: u64,
    wall_ms: f64,
    avg_frame_us: f64,
    fps: f64,
}

fn bench(ticks: u64, json: bool) -> Result<()> {
    let mut driver = FrameDriver::new(ManualScheduler::new());
    let mut world = HeadlessWorld::default();
    let mut stats = FrameStats::with_window(ticks.max(1) as usize);

    let started = std::time::Instant::now();
    driver.start();
    for _ in 0..ticks {
        let handle = driver
            .scheduler_mut()
            .fire_next()
            .expect("driver keeps exactly one frame pending");
        if let Some(tick) = driver.on_frame(handle, &mut world)? {
            stats.record(&tick);
        }
    }
    driver.stop();
    let wall = started.elapsed();

    let report = BenchReport {
        ticks: world.draws,
        wall_ms: wall.as_secs_f64() * 1000.0,
        avg_frame_us: stats.average_delta().as_secs_f64() * 1e6,
        fps: stats.fps(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("ticks:     {}", report.ticks);
        println!("wall:      {:.2} ms", report.wall_ms);
        println!("avg frame: {:.2} us", report.avg_frame_us);
        println!("fps:       {:.0}", report.fps);
    }
    Ok(())
}

fn simulate(ticks: u64, step_ms: u64, height: f32) -> Result<()> {
    let time = ManualSource::new();
    let mut driver =
        FrameDriver::with_clock(ManualScheduler::new(), FrameClock::with_source(time.clone()));
    let mut world = HeadlessWorld::default();
    let mut physics = FreeFallPhysics::default();

    let body = physics.spawn(Vec3::new(0.0, height, 0.0));
    let node = NodeId::new();
    driver.register_sync(node, body);

    println!("dropping from {height} m, {step_ms} ms per tick");
    driver.start();
    for _ in 0..ticks {
        let handle = driver
            .scheduler_mut()
            .fire_next()
            .expect("driver keeps exactly one frame pending");
        let Some(tick) = driver.on_frame_with_physics(handle, &mut world, &mut physics)? else {
            break;
        };
        let synced = world.nodes[&node];
        println!(
            "tick {:>3}  t={:>6.3}s  y={:>7.3}",
            tick.frame_index,
            tick.elapsed_seconds(),
            synced.position.y
        );
        time.advance(Duration::from_millis(step_ms));
    }
    driver.stop();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("vitrine-cli v{}", env!("CARGO_PKG_VERSION"));
            let step = StepConfig::default();
            println!(
                "driver defaults: fixed substep {:.5}s, {} iterations",
                step.fixed_delta, step.iterations
            );
        }
        Commands::Bench { ticks, json } => bench(ticks, json)?,
        Commands::Simulate {
            ticks,
            step_ms,
            height,
        } => simulate(ticks, step_ms, height)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_fall_descends_through_the_sync_copy() {
        let time = ManualSource::new();
        let mut driver =
            FrameDriver::with_clock(ManualScheduler::new(), FrameClock::with_source(time.clone()));
        let mut world = HeadlessWorld::default();
        let mut physics = FreeFallPhysics::default();

        let body = physics.spawn(Vec3::new(0.0, 10.0, 0.0));
        let node = NodeId::new();
        driver.register_sync(node, body);

        driver.start();
        for _ in 0..10 {
            let handle = driver.scheduler_mut().fire_next().unwrap();
            driver
                .on_frame_with_physics(handle, &mut world, &mut physics)
                .unwrap();
            time.advance(Duration::from_millis(32));
        }

        assert!(world.nodes[&node].position.y < 10.0);
        assert_eq!(world.updates, 10);
        assert_eq!(world.draws, 10);
    }
}
