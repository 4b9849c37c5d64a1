//! Camera notification sink
//!
//! The camera (head-bob, FOV kick, landing shake) lives outside the locomotion
//! core. It is injected into the controller as a [`CameraSink`] and receives
//! fire-and-forget notifications. Every method has a no-op default so a sink only
//! implements what it reacts to.

use glam::Vec2;

/// Published once per state transition, from the entered state's `enter`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementNotification {
    /// Name of the state that was entered.
    pub state: &'static str,
    /// Whether the player is providing move input.
    pub is_moving: bool,
    /// Whether sprint is held while moving.
    pub is_sprinting: bool,
    /// Target speed the state steers toward (m/s).
    pub speed: f32,
}

/// Receiver of locomotion notifications.
pub trait CameraSink {
    /// A new locomotion state became active.
    fn on_state_entered(&mut self, _notification: MovementNotification) {}

    /// Raw move axis for this tick, before the deadzone.
    fn on_movement_input(&mut self, _move_axis: Vec2, _is_sprinting: bool) {}

    /// The body touched down after being airborne. `impact_speed` is the
    /// downward speed at touchdown (positive, m/s).
    fn on_landed(&mut self, _impact_speed: f32) {}
}
