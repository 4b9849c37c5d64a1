use std::any::Any;

use super::grounded::{lost_ground, move_on_ground};
use super::{Crouching, Jumping, LocomotionState, Sliding};
use crate::player::context::LocomotionContext;
use crate::player::state_machine::{MachineState, Transition};

/// Upright on the ground: walk, sprint, or stand still.
#[derive(Debug, Clone, Default)]
pub struct Standing;

impl MachineState<LocomotionContext> for Standing {
    fn name(&self) -> &'static str {
        "Standing"
    }

    fn enter(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        // The only place the slide latch is re-armed.
        ctx.slide_available = true;
        let speed = if ctx.has_move_input() { ctx.stand_target_speed() } else { 0.0 };
        ctx.notify_state_entered(self.name(), speed);
        None
    }

    fn update(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        if let Some(fall) = lost_ground(ctx) {
            return Some(fall);
        }
        move_on_ground(ctx);
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl LocomotionState for Standing {
    fn handle_movement(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        if let Some(fall) = lost_ground(ctx) {
            return Some(fall);
        }
        if ctx.wants_slide() {
            return Some(Transition::to::<Sliding>());
        }
        if ctx.input.crouch_held {
            return Some(Transition::to::<Crouching>());
        }

        let direction = ctx.move_direction();
        let speed = if ctx.has_move_input() { ctx.stand_target_speed() } else { 0.0 };
        ctx.blend_horizontal(direction, speed);
        None
    }

    fn handle_jump(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        if let Some(fall) = lost_ground(ctx) {
            return Some(fall);
        }
        if ctx.input.jump_pressed && ctx.can_jump() {
            ctx.perform_normal_jump();
            return Some(Transition::to::<Jumping>());
        }
        None
    }
}
