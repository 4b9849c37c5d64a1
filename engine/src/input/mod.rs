//! Input Module
//!
//! Platform-agnostic input snapshot consumed by the locomotion core.
//! Device mapping (keyboard, gamepad, rebinding) lives outside this crate; the
//! core only sees a validated move axis plus jump/sprint/crouch flags and the
//! current horizontal view orientation.
//!
//! # Example
//!
//! ```rust,ignore
//! use stride_engine::input::{LocomotionInput, ViewBasis};
//!
//! let input = LocomotionInput::from_keys(true, false, false, false).with_sprint(true);
//! let view = ViewBasis::from_yaw(camera_yaw);
//! controller.tick(dt, input, view)?;
//! ```

pub mod locomotion;

pub use locomotion::{DEFAULT_DEADZONE, LocomotionInput, ViewBasis};
