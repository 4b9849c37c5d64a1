//! Locomotion States
//!
//! The six exclusive states the controller moves between:
//!
//! | State       | Enters from                       | Leaves to                         |
//! |-------------|-----------------------------------|-----------------------------------|
//! | `Standing`  | start, landing, crouch release    | Crouching, Sliding, Jumping, Falling |
//! | `Crouching` | Standing, slide end, landing      | Standing, Sliding, Falling        |
//! | `Sliding`   | Standing, Crouching               | Crouching, Jumping, Falling       |
//! | `Jumping`   | Standing, Sliding                 | Falling, Mantle, landing          |
//! | `Falling`   | any grounded state, Jumping       | Mantle, landing                   |
//! | `Mantle`    | Jumping, Falling                  | Standing, Falling                 |
//!
//! Input is only read from [`LocomotionState::handle_movement`] and
//! [`LocomotionState::handle_jump`]; `update` integrates and checks exits.

mod airborne;
mod crouching;
mod falling;
mod grounded;
mod jumping;
mod mantle;
mod sliding;
mod standing;

pub use crouching::Crouching;
pub use falling::Falling;
pub use jumping::Jumping;
pub use mantle::Mantle;
pub use sliding::Sliding;
pub use standing::Standing;

use super::context::LocomotionContext;
use super::state_machine::{MachineState, Transition};

/// A state of the locomotion machine.
pub trait LocomotionState: MachineState<LocomotionContext> {
    /// Read the move axis, sprint and crouch for this tick.
    fn handle_movement(&mut self, _ctx: &mut LocomotionContext) -> Option<Transition> {
        None
    }

    /// React to the jump button for this tick.
    fn handle_jump(&mut self, _ctx: &mut LocomotionContext) -> Option<Transition> {
        None
    }
}

/// One instance of every state, in registration order.
pub fn all_states() -> Vec<Box<dyn LocomotionState>> {
    vec![
        Box::new(Standing),
        Box::new(Crouching::default()),
        Box::new(Sliding::default()),
        Box::new(Jumping),
        Box::new(Falling),
        Box::new(Mantle::default()),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use glam::Vec3;

    use crate::input::{LocomotionInput, ViewBasis};
    use crate::physics::StaticWorld;
    use crate::player::config::LocomotionConfig;
    use crate::player::context::LocomotionContext;

    /// Default config, standing at the origin on an endless floor.
    pub fn flat_context() -> LocomotionContext {
        let mut world = StaticWorld::new();
        world.add_ground(0.0);
        LocomotionContext::new(LocomotionConfig::default(), Box::new(world), Vec3::ZERO, None)
    }

    /// Start a tick the way the controller does, yaw 0 (forward is -Z).
    pub fn begin(ctx: &mut LocomotionContext, dt: f32, input: LocomotionInput) {
        ctx.begin_tick(dt, input, ViewBasis::default());
        ctx.refresh_grounded();
    }
}
