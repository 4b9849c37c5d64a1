use std::any::Any;

use glam::Vec3;

use super::grounded::{lost_ground, move_on_ground};
use super::{LocomotionState, Sliding, Standing};
use crate::player::context::LocomotionContext;
use crate::player::state_machine::{MachineState, Transition};

/// Share of the entry speed kept when crouching with no input.
const ENTRY_MOMENTUM_KEPT: f32 = 0.8;

/// Blend factor toward crouch speed when crouching with directed input.
const ENTRY_MOMENTUM_BLEND: f32 = 0.3;

/// Low stance on the ground at crouch speed.
#[derive(Debug, Clone, Default)]
pub struct Crouching {
    /// Set by `enter`, consumed by the first movement tick.
    damp_entry_momentum: bool,
}

impl Crouching {
    /// First tick after entering: bleed off momentum carried in from a faster state.
    fn damp_momentum(&self, ctx: &mut LocomotionContext) -> bool {
        let crouch_speed = ctx.config.movement.crouch_speed;
        let horizontal = ctx.body.horizontal_velocity();
        if horizontal.length() <= crouch_speed {
            return false;
        }

        let damped = if ctx.has_move_input() {
            horizontal.lerp(ctx.move_direction() * crouch_speed, ENTRY_MOMENTUM_BLEND)
        } else {
            horizontal * ENTRY_MOMENTUM_KEPT
        };
        ctx.body.set_horizontal_velocity(damped);
        true
    }
}

impl MachineState<LocomotionContext> for Crouching {
    fn name(&self) -> &'static str {
        "Crouching"
    }

    fn enter(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        self.damp_entry_momentum = true;
        let speed = ctx.config.movement.crouch_speed;
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

    fn exit(&mut self, _ctx: &mut LocomotionContext) {
        self.damp_entry_momentum = false;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl LocomotionState for Crouching {
    fn handle_movement(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        if let Some(fall) = lost_ground(ctx) {
            return Some(fall);
        }
        if ctx.wants_slide() {
            return Some(Transition::to::<Sliding>());
        }
        if !ctx.input.crouch_held && ctx.can_stand_up() {
            return Some(Transition::to::<Standing>());
        }

        if std::mem::take(&mut self.damp_entry_momentum) && self.damp_momentum(ctx) {
            return None;
        }

        let direction = ctx.move_direction();
        let speed = if direction == Vec3::ZERO { 0.0 } else { ctx.config.movement.crouch_speed };
        ctx.blend_horizontal(direction, speed);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::LocomotionInput;
    use crate::physics::StaticWorld;
    use crate::player::config::LocomotionConfig;
    use crate::player::states::test_support::{begin, flat_context};

    fn entered(ctx: &mut LocomotionContext) -> Crouching {
        let mut state = Crouching::default();
        state.enter(ctx);
        state
    }

    #[test]
    fn test_entry_momentum_kept_without_input() {
        let mut ctx = flat_context();
        ctx.body.velocity = Vec3::new(0.0, 0.0, -10.0);
        let mut state = entered(&mut ctx);

        begin(&mut ctx, 0.016, LocomotionInput::new().with_crouch(true));
        state.handle_movement(&mut ctx);
        assert!((ctx.body.horizontal_speed() - 8.0).abs() < 1e-4);
        assert!(ctx.body.velocity.z < 0.0);
    }

    #[test]
    fn test_entry_momentum_blends_toward_crouch_speed_with_input() {
        let mut ctx = flat_context();
        ctx.body.velocity = Vec3::new(0.0, 0.0, -10.0);
        let mut state = entered(&mut ctx);

        begin(&mut ctx, 0.016, LocomotionInput::moving(0.0, 1.0).with_crouch(true));
        state.handle_movement(&mut ctx);
        // lerp(10, 2.5, 0.3)
        assert!((ctx.body.horizontal_speed() - 7.75).abs() < 1e-4);
    }

    #[test]
    fn test_damping_only_on_first_tick() {
        let mut ctx = flat_context();
        ctx.body.velocity = Vec3::new(0.0, 0.0, -10.0);
        let mut state = entered(&mut ctx);

        begin(&mut ctx, 0.01, LocomotionInput::new().with_crouch(true));
        state.handle_movement(&mut ctx);
        begin(&mut ctx, 0.01, LocomotionInput::new().with_crouch(true));
        state.handle_movement(&mut ctx);
        // Second tick is a plain deceleration: 8 - 30 * 0.01
        assert!((ctx.body.horizontal_speed() - 7.7).abs() < 1e-4);
    }

    #[test]
    fn test_release_stands_up_when_clear() {
        let mut ctx = flat_context();
        let mut state = entered(&mut ctx);
        begin(&mut ctx, 0.016, LocomotionInput::new());
        assert!(state.handle_movement(&mut ctx).unwrap().is::<Standing>());
    }

    #[test]
    fn test_release_under_ceiling_stays_crouched() {
        let mut world = StaticWorld::new();
        world.add_ground(0.0);
        world.add_box_corners(Vec3::new(-3.0, 1.3, -3.0), Vec3::new(3.0, 2.0, 3.0));
        let mut ctx =
            LocomotionContext::new(LocomotionConfig::default(), Box::new(world), Vec3::ZERO, None);
        ctx.body.snap_height(0.9);
        let mut state = entered(&mut ctx);

        begin(&mut ctx, 0.016, LocomotionInput::moving(0.0, 1.0));
        assert!(state.handle_movement(&mut ctx).is_none());
        assert!(ctx.body.horizontal_speed() > 0.0);
    }

    #[test]
    fn test_slide_needs_armed_latch() {
        let mut ctx = flat_context();
        ctx.body.velocity = Vec3::new(0.0, 0.0, -10.0);
        let mut state = entered(&mut ctx);
        let input = LocomotionInput::moving(0.0, 1.0).with_crouch(true).with_sprint(true);

        ctx.slide_available = false;
        begin(&mut ctx, 0.016, input);
        assert!(state.handle_movement(&mut ctx).is_none());

        ctx.body.velocity = Vec3::new(0.0, 0.0, -10.0);
        ctx.slide_available = true;
        begin(&mut ctx, 0.016, input);
        assert!(state.handle_movement(&mut ctx).unwrap().is::<Sliding>());
    }
}
