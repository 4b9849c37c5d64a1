//! Player Module
//!
//! First-person character locomotion built on a state machine.
//!
//! # Components
//!
//! - [`LocomotionController`] - Owns the machine and drives one tick per frame
//! - [`StateMachine`] - Generic type-keyed state container with synchronous transitions
//! - [`states`] - Standing, Crouching, Sliding, Jumping, Falling and Mantle
//! - [`LocomotionContext`] - Body, world, camera and latches shared by the states
//! - [`GroundSensor`] - Dual ray + overlap ground detection
//! - [`MantleDetector`] / [`MantlePath`] - Ledge detection and the climb arc
//! - [`KinematicBody`] - Capsule with eased height transitions
//! - [`LocomotionConfig`] - Tunables, loadable from JSON

pub mod body;
pub mod config;
pub mod context;
pub mod controller;
pub mod easing;
pub mod ground;
pub mod mantle;
pub mod state_machine;
pub mod states;

pub use body::KinematicBody;
pub use config::{
    AirConfig, BodyConfig, GroundConfig, InputConfig, JumpConfig, LocomotionConfig,
    MantleConfig, MovementConfig, SlideConfig,
};
pub use context::LocomotionContext;
pub use controller::LocomotionController;
pub use easing::EasingCurve;
pub use ground::{GroundProbe, GroundSensor};
pub use mantle::{MantleDetector, MantleIntent, MantlePath, MantleTarget};
pub use state_machine::{MachineState, StateMachine, Transition};
pub use states::{Crouching, Falling, Jumping, LocomotionState, Mantle, Sliding, Standing};
