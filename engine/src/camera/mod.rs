//! Camera Module
//!
//! Notification surface between the locomotion core and the external camera.
//! The core never owns camera state; it only publishes through [`CameraSink`].

pub mod event_log;
pub mod sink;

pub use event_log::{CameraEvent, CameraEventLog};
pub use sink::{CameraSink, MovementNotification};
