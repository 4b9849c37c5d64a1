//! Stride Engine Library
//!
//! First-person character locomotion for kinematic capsules: a state machine
//! over Standing, Crouching, Sliding, Jumping, Falling and Mantle, driven one
//! fixed or variable step at a time by the host loop.
//!
//! # Modules
//!
//! - [`player`] - Controller, states, ground sensing, mantle detection, config
//! - [`physics`] - Capsule/box collision and the [`physics::CollisionWorld`] query trait
//! - [`input`] - Per-tick input snapshot and view basis
//! - [`camera`] - Notification sink for head-bob, FOV and landing effects
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use stride_engine::{LocomotionConfig, LocomotionController, LocomotionInput, ViewBasis};
//! use stride_engine::physics::StaticWorld;
//! use glam::Vec3;
//!
//! let mut world = StaticWorld::new();
//! world.add_ground(0.0);
//!
//! let config = LocomotionConfig::load_json("locomotion.json")?;
//! let mut controller = LocomotionController::try_new(config, Box::new(world), Vec3::ZERO, None)?;
//!
//! let input = LocomotionInput::from_keys(true, false, false, false).with_sprint(true);
//! controller.tick(1.0 / 60.0, input, ViewBasis::from_yaw(0.0))?;
//! println!("{} at {:?}", controller.current_state_name(), controller.position());
//! ```

pub mod camera;
pub mod error;
pub mod input;
pub mod physics;
pub mod player;

pub use camera::{CameraEvent, CameraEventLog, CameraSink, MovementNotification};
pub use error::{ConfigError, LocomotionError};
pub use input::{LocomotionInput, ViewBasis};
pub use player::{LocomotionConfig, LocomotionController};
