//! Behavior shared by Standing, Crouching and Sliding.

use super::Falling;
use crate::player::context::LocomotionContext;
use crate::player::state_machine::Transition;

/// Falling as soon as the sensor loses the ground. Every grounded hook starts here.
pub(crate) fn lost_ground(ctx: &LocomotionContext) -> Option<Transition> {
    (!ctx.is_grounded).then(Transition::to::<Falling>)
}

/// Press into the ground with the resting velocity and move for this tick.
pub(crate) fn move_on_ground(ctx: &mut LocomotionContext) {
    if ctx.body.velocity.y <= 0.0 {
        ctx.body.velocity.y = ctx.config.jump.grounded_velocity;
    }
    ctx.integrate_velocity();
}
