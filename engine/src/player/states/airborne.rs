//! Behavior shared by Jumping and Falling: gravity, landing, air control and
//! the mantle check.

use glam::Vec3;

use super::{Crouching, Mantle, Standing};
use crate::player::context::{LocomotionContext, move_towards};
use crate::player::state_machine::Transition;

/// Touch down when grounded and not moving up.
///
/// Reports the downward speed to the camera and picks the stance from the
/// crouch button.
pub(crate) fn try_land(ctx: &mut LocomotionContext) -> Option<Transition> {
    if !ctx.is_grounded || ctx.body.velocity.y > 0.0 {
        return None;
    }

    let impact_speed = (-ctx.body.velocity.y).max(0.0);
    ctx.body.velocity.y = ctx.config.jump.grounded_velocity;
    ctx.notify_landed(impact_speed);

    Some(if ctx.input.crouch_held {
        Transition::to::<Crouching>()
    } else {
        Transition::to::<Standing>()
    })
}

/// Integrate gravity, clamped to terminal velocity, then move.
pub(crate) fn fall(ctx: &mut LocomotionContext) {
    let jump = &ctx.config.jump;
    let vy = ctx.body.velocity.y + jump.gravity * ctx.dt;
    ctx.body.velocity.y = vy.max(-jump.max_fall_speed);
    ctx.integrate_velocity();
}

/// Hand a detected ledge over to Mantle.
pub(crate) fn try_mantle(ctx: &mut LocomotionContext) -> Option<Transition> {
    let target = ctx.detect_mantle()?;
    ctx.pending_mantle = Some(target);
    Some(Transition::to::<Mantle>())
}

/// Mantle if possible, otherwise steer.
pub(crate) fn handle_air_movement(ctx: &mut LocomotionContext) -> Option<Transition> {
    if let Some(mantle) = try_mantle(ctx) {
        return Some(mantle);
    }
    steer(ctx);
    None
}

/// Limited air control.
///
/// Input pulls the horizontal velocity toward `direction * air_max_speed` at
/// `air_control_strength * air_acceleration`. A turn sharper than
/// `sharp_turn_threshold` applies that tick's share of the change in one step
/// instead of walking the vector around. Without input, `air_drag` is applied
/// once per tick.
pub(crate) fn steer(ctx: &mut LocomotionContext) {
    let air = &ctx.config.air;
    let current = ctx.body.horizontal_velocity();
    let direction = ctx.move_direction();

    let steered = if direction == Vec3::ZERO {
        current * air.air_drag
    } else {
        let target = direction * air.air_max_speed;
        let rate = air.air_control_strength * air.air_acceleration;
        let speed = current.length();
        let alignment = if speed > f32::EPSILON {
            (current / speed).dot(direction)
        } else {
            1.0
        };

        let next = if air.allow_direction_change && alignment < air.sharp_turn_threshold {
            current + (target - current) * (rate * ctx.dt).clamp(0.0, 1.0)
        } else {
            move_towards(current, target, rate * ctx.dt)
        };
        next.clamp_length_max(air.air_max_speed)
    };

    ctx.body.set_horizontal_velocity(steered);
}
