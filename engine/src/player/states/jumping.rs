use std::any::Any;

use super::airborne::{fall, handle_air_movement, try_land};
use super::{Falling, LocomotionState};
use crate::player::context::LocomotionContext;
use crate::player::state_machine::{MachineState, Transition};

/// Rising after a jump. Hands over to Falling at the apex.
#[derive(Debug, Clone, Default)]
pub struct Jumping;

impl MachineState<LocomotionContext> for Jumping {
    fn name(&self) -> &'static str {
        "Jumping"
    }

    fn enter(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        let speed = ctx.body.horizontal_speed();
        ctx.notify_state_entered(self.name(), speed);
        None
    }

    fn update(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        if let Some(land) = try_land(ctx) {
            return Some(land);
        }
        fall(ctx);
        (ctx.body.velocity.y <= 0.0).then(Transition::to::<Falling>)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl LocomotionState for Jumping {
    fn handle_movement(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        handle_air_movement(ctx)
    }
}
