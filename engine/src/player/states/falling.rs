use std::any::Any;

use super::airborne::{fall, handle_air_movement, try_land};
use super::LocomotionState;
use crate::player::context::LocomotionContext;
use crate::player::state_machine::{MachineState, Transition};

/// Airborne and descending (or walked off an edge).
#[derive(Debug, Clone, Default)]
pub struct Falling;

impl MachineState<LocomotionContext> for Falling {
    fn name(&self) -> &'static str {
        "Falling"
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
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl LocomotionState for Falling {
    fn handle_movement(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        handle_air_movement(ctx)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::input::LocomotionInput;
    use crate::physics::StaticWorld;
    use crate::player::config::LocomotionConfig;
    use crate::player::states::test_support::begin;
    use crate::player::states::{Mantle, Standing};

    #[test]
    fn test_falls_until_landing() {
        let mut world = StaticWorld::new();
        world.add_ground(0.0);
        let mut ctx = LocomotionContext::new(
            LocomotionConfig::default(),
            Box::new(world),
            Vec3::new(0.0, 3.0, 0.0),
            None,
        );
        let mut state = Falling;

        let mut landed = None;
        for _ in 0..200 {
            begin(&mut ctx, 1.0 / 60.0, LocomotionInput::new());
            if let Some(next) = state.update(&mut ctx) {
                landed = Some(next);
                break;
            }
        }
        assert!(landed.is_some_and(|t| t.is::<Standing>()));
        assert!(ctx.body.feet().y.abs() < 0.2);
    }

    #[test]
    fn test_mantle_detected_while_falling_toward_ledge() {
        let mut world = StaticWorld::new();
        world.add_ground(0.0);
        world.add_box_corners(Vec3::new(-5.0, 0.0, -6.0), Vec3::new(5.0, 1.2, -1.0));
        let mut ctx = LocomotionContext::new(
            LocomotionConfig::default(),
            Box::new(world),
            Vec3::new(0.0, 0.3, -0.3),
            None,
        );
        ctx.body.velocity = Vec3::new(0.0, 1.0, -4.0);

        begin(&mut ctx, 0.016, LocomotionInput::moving(0.0, 1.0));
        assert!(!ctx.is_grounded());
        let next = Falling.handle_movement(&mut ctx).unwrap();
        assert!(next.is::<Mantle>());
        assert!(ctx.pending_mantle.is_some());
    }
}
