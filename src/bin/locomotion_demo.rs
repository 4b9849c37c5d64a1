//! Locomotion Demo - Headless Course Run
//!
//! Run with: `cargo run --bin locomotion_demo [config.json]`
//!
//! Drives the locomotion controller through a scripted input sequence on a small
//! box course (flat run-up, a waist-high block to mantle, a drop off the far
//! side) at a fixed 60 Hz step and logs every state change and camera event.
//!
//! Logging follows `RUST_LOG` (default `info`); `RUST_LOG=stride_engine=debug`
//! also shows state machine transitions.

use std::process::ExitCode;

use glam::{Vec2, Vec3};
use stride_engine::camera::{CameraSink, MovementNotification};
use stride_engine::input::{LocomotionInput, ViewBasis};
use stride_engine::physics::StaticWorld;
use stride_engine::player::{LocomotionConfig, LocomotionController};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

const TICK_RATE: f32 = 60.0;

/// Camera stand-in that writes notifications to the log.
struct LoggingCamera;

impl CameraSink for LoggingCamera {
    fn on_state_entered(&mut self, n: MovementNotification) {
        info!(
            target: "camera",
            state = n.state,
            moving = n.is_moving,
            sprinting = n.is_sprinting,
            speed = n.speed,
            "state entered"
        );
    }

    fn on_movement_input(&mut self, _move_axis: Vec2, _is_sprinting: bool) {}

    fn on_landed(&mut self, impact_speed: f32) {
        info!(target: "camera", impact_speed, "landed");
    }
}

/// One leg of the scripted run.
struct Segment {
    label: &'static str,
    seconds: f32,
    input: LocomotionInput,
}

fn course() -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_ground(0.0);
    // Waist-high block across the path.
    world.add_box_corners(Vec3::new(-4.0, 0.0, -40.0), Vec3::new(4.0, 1.2, -30.0));
    world
}

fn script() -> Vec<Segment> {
    let forward = LocomotionInput::moving(0.0, 1.0);
    vec![
        Segment { label: "idle", seconds: 0.5, input: LocomotionInput::new() },
        Segment { label: "walk", seconds: 1.0, input: forward },
        Segment { label: "sprint", seconds: 1.0, input: forward.with_sprint(true) },
        Segment {
            label: "slide",
            seconds: 1.2,
            input: forward.with_sprint(true).with_crouch(true),
        },
        Segment { label: "stand up", seconds: 0.3, input: forward },
        Segment { label: "sprint", seconds: 1.0, input: forward.with_sprint(true) },
        Segment {
            label: "jump at block",
            seconds: 1.0 / TICK_RATE,
            input: forward.with_sprint(true).with_jump(true),
        },
        Segment { label: "climb", seconds: 1.5, input: forward.with_sprint(true) },
        Segment { label: "walk off edge", seconds: 3.0, input: forward },
        Segment { label: "stop", seconds: 1.0, input: LocomotionInput::new() },
    ]
}

fn load_config() -> LocomotionConfig {
    match std::env::args().nth(1) {
        Some(path) => match LocomotionConfig::load_json(&path) {
            Ok(config) => {
                info!(%path, "loaded locomotion config");
                config
            }
            Err(err) => {
                error!(%path, %err, "could not load config, using defaults");
                LocomotionConfig::default()
            }
        },
        None => LocomotionConfig::default(),
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = load_config();
    let camera: Box<dyn CameraSink> = Box::new(LoggingCamera);
    let mut controller =
        LocomotionController::new(config, Box::new(course()), Vec3::ZERO, Some(camera));

    let dt = 1.0 / TICK_RATE;
    let view = ViewBasis::from_yaw(0.0);
    let mut last_state = controller.current_state_name();
    let mut max_height: f32 = 0.0;

    for segment in script() {
        info!(segment = segment.label, seconds = segment.seconds, "segment");
        let ticks = (segment.seconds * TICK_RATE).round().max(1.0) as u32;

        for _ in 0..ticks {
            if let Err(err) = controller.tick(dt, segment.input, view) {
                error!(%err, "locomotion tick failed");
                return ExitCode::FAILURE;
            }

            max_height = max_height.max(controller.position().y);
            let state = controller.current_state_name();
            if state != last_state {
                info!(
                    from = last_state,
                    to = state,
                    position = ?controller.position(),
                    speed = controller.body().horizontal_speed(),
                    "transition"
                );
                last_state = state;
            }
        }
    }

    info!(
        state = controller.current_state_name(),
        position = ?controller.position(),
        max_height,
        "course finished"
    );
    ExitCode::SUCCESS
}
