use std::any::Any;

use glam::Vec3;

use super::grounded::{lost_ground, move_on_ground};
use super::{Crouching, Jumping, LocomotionState};
use crate::player::context::LocomotionContext;
use crate::player::state_machine::{MachineState, Transition};

/// Time after the slide starts before a low speed can end it.
pub const SLIDE_GRACE_PERIOD: f32 = 0.1;

/// The speed floor holds while more than this much slide time remains.
pub const SLIDE_FLOOR_WINDOW: f32 = 0.1;

/// Timed, decelerating low dash.
#[derive(Debug, Clone, Default)]
pub struct Sliding {
    direction: Vec3,
    remaining: f32,
    elapsed: f32,
}

impl Sliding {
    /// Seconds left on the slide timer.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Horizontal slide direction chosen at start.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Pick a direction (input, else current motion, else view forward) and launch.
    fn start_slide(&mut self, ctx: &mut LocomotionContext) {
        let from_input = ctx.move_direction();
        let from_motion = ctx.body.horizontal_velocity().normalize_or_zero();
        self.direction = if from_input != Vec3::ZERO {
            from_input
        } else if from_motion != Vec3::ZERO {
            from_motion
        } else {
            ctx.view.forward
        };

        self.remaining = ctx.config.slide.slide_duration;
        self.elapsed = 0.0;
        ctx.slide_available = false;
        ctx.body
            .set_horizontal_velocity(self.direction * ctx.config.slide.slide_speed);
    }

    fn current_direction(&self, ctx: &LocomotionContext) -> Vec3 {
        if ctx.config.slide.lock_direction {
            self.direction
        } else {
            let moving = ctx.body.horizontal_velocity().normalize_or_zero();
            if moving == Vec3::ZERO { self.direction } else { moving }
        }
    }

    fn floor_active(&self) -> bool {
        self.remaining > SLIDE_FLOOR_WINDOW
    }
}

impl MachineState<LocomotionContext> for Sliding {
    fn name(&self) -> &'static str {
        "Sliding"
    }

    fn enter(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        self.start_slide(ctx);
        let speed = ctx.config.slide.slide_speed;
        ctx.notify_state_entered(self.name(), speed);
        None
    }

    fn update(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        if let Some(fall) = lost_ground(ctx) {
            return Some(fall);
        }

        let slide = ctx.config.slide.clone();
        self.remaining -= ctx.dt;
        self.elapsed += ctx.dt;
        if self.remaining <= 0.0 {
            return Some(Transition::to::<Crouching>());
        }

        let mut speed = (ctx.body.horizontal_speed() - slide.slide_deceleration * ctx.dt).max(0.0);
        if self.floor_active() {
            speed = speed.max(slide.min_slide_speed);
        }
        let direction = self.current_direction(ctx);
        ctx.body.set_horizontal_velocity(direction * speed);
        move_on_ground(ctx);

        // Only a collision can pull the speed under the floor while it is active.
        let stalled = ctx.body.horizontal_speed() < slide.min_slide_speed - 1e-3;
        if self.elapsed >= SLIDE_GRACE_PERIOD && self.floor_active() && stalled {
            return Some(Transition::to::<Crouching>());
        }
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl LocomotionState for Sliding {
    fn handle_movement(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        lost_ground(ctx)
    }

    fn handle_jump(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        if let Some(fall) = lost_ground(ctx) {
            return Some(fall);
        }
        if !(ctx.input.jump_pressed && ctx.can_jump()) {
            return None;
        }

        let slide = &ctx.config.slide;
        let boost = self.current_direction(ctx) * slide.slide_jump_boost;
        ctx.body.velocity.y = ctx.config.jump_velocity() * slide.slide_jump_multiplier;
        let horizontal = ctx.body.horizontal_velocity() + boost;
        ctx.body.set_horizontal_velocity(horizontal);
        ctx.jump_cooldown_remaining = ctx.config.jump.jump_cooldown;
        Some(Transition::to::<Jumping>())
    }
}
