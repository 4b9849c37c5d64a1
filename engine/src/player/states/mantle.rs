use std::any::Any;

use glam::Vec3;
use tracing::{debug, warn};

use super::{Falling, LocomotionState, Standing};
use crate::player::context::LocomotionContext;
use crate::player::mantle::MantlePath;
use crate::player::state_machine::{MachineState, Transition};

/// Progress this close to 1 counts as finished.
const COMPLETE_EPSILON: f32 = 1.0e-4;

/// Scripted climb along a Bézier arc onto a ledge. Input is ignored until it ends.
#[derive(Debug, Clone, Default)]
pub struct Mantle {
    path: Option<MantlePath>,
    elapsed: f32,
    complete: bool,
}

impl Mantle {
    pub fn path(&self) -> Option<&MantlePath> {
        self.path.as_ref()
    }

    /// Linear progress through the maneuver, `0..=1`.
    pub fn progress(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 1.0;
        }
        let progress = self.elapsed / duration;
        if progress >= 1.0 - COMPLETE_EPSILON { 1.0 } else { progress }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl MachineState<LocomotionContext> for Mantle {
    fn name(&self) -> &'static str {
        "Mantle"
    }

    fn enter(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        ctx.notify_state_entered(self.name(), 0.0);
        let Some(target) = ctx.pending_mantle.take() else {
            warn!("mantle entered without a target, falling instead");
            return Some(Transition::to::<Falling>());
        };

        // The landing is a standing capsule center. Stand up now, feet planted,
        // so the arc ends with the feet on the ledge.
        let stand_height = ctx.config.body.stand_height;
        ctx.body.snap_height(stand_height);

        let path = MantlePath::new(ctx.body.position, target.landing);
        debug!(start = ?path.start, peak = ?path.peak, end = ?path.end, "mantle started");
        self.path = Some(path);
        self.elapsed = 0.0;
        self.complete = false;
        ctx.body.velocity = Vec3::ZERO;
        None
    }

    fn update(&mut self, ctx: &mut LocomotionContext) -> Option<Transition> {
        let Some(path) = self.path else {
            return Some(Transition::to::<Falling>());
        };

        if self.complete {
            return Some(if ctx.refresh_grounded() {
                Transition::to::<Standing>()
            } else {
                Transition::to::<Falling>()
            });
        }

        let mantle = &ctx.config.mantle;
        let (duration, easing) = (mantle.mantle_duration, mantle.easing);
        self.elapsed += ctx.dt;
        let progress = self.progress(duration);
        let point = path.evaluate(easing.apply(progress));

        let delta = point - ctx.body.position;
        ctx.move_body(delta);
        ctx.body.velocity = if ctx.dt > 0.0 { delta / ctx.dt } else { Vec3::ZERO };

        if progress >= 1.0 {
            ctx.body.position = path.end;
            ctx.body.velocity = Vec3::ZERO;
            self.complete = true;
            debug!(end = ?path.end, "mantle complete");
        }
        None
    }

    fn exit(&mut self, _ctx: &mut LocomotionContext) {
        self.path = None;
        self.complete = false;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl LocomotionState for Mantle {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraEventLog, CameraSink};
    use crate::input::{LocomotionInput, ViewBasis};
    use crate::physics::{ColliderId, StaticWorld};
    use crate::player::config::LocomotionConfig;
    use crate::player::easing::EasingCurve;
    use crate::player::mantle::MantleTarget;

    fn linear_context(duration: f32) -> LocomotionContext {
        let mut config = LocomotionConfig::default();
        config.mantle.easing = EasingCurve::Linear;
        config.mantle.mantle_duration = duration;
        let mut ctx = LocomotionContext::new(config, Box::new(StaticWorld::new()), Vec3::ZERO, None);
        ctx.body.position = Vec3::ZERO;
        ctx.dt = 0.1;
        ctx.pending_mantle = Some(MantleTarget {
            landing: Vec3::new(2.0, 1.5, 0.0),
            ledge_point: Vec3::new(1.0, 0.6, 0.0),
            wall: ColliderId(0),
        });
        ctx
    }

    #[test]
    fn test_follows_arc_and_snaps_to_end() {
        let mut ctx = linear_context(0.4);
        let mut state = Mantle::default();
        assert!(state.enter(&mut ctx).is_none());
        assert_eq!(ctx.body.velocity, Vec3::ZERO);
        assert!(ctx.pending_mantle.is_none());

        assert!(state.update(&mut ctx).is_none());
        assert!(state.update(&mut ctx).is_none());
        assert!((ctx.body.position - Vec3::new(1.0, 1.375, 0.0)).length() < 1e-4);
        assert!(!state.is_complete());

        assert!(state.update(&mut ctx).is_none());
        assert!(state.update(&mut ctx).is_none());
        assert_eq!(ctx.body.position, Vec3::new(2.0, 1.5, 0.0));
        assert!(state.is_complete());

        // Empty world: nothing to stand on after the climb.
        let next = state.update(&mut ctx).unwrap();
        assert!(next.is::<Falling>());
    }

    #[test]
    fn test_default_duration_half_and_full_progress() {
        let mut ctx = linear_context(0.8);
        let mut state = Mantle::default();
        state.enter(&mut ctx);

        // Peak is (1, 2, 0): B(0.5) = 0.25 * start + 0.5 * peak + 0.25 * end.
        for _ in 0..4 {
            assert!(state.update(&mut ctx).is_none());
        }
        assert!((state.progress(0.8) - 0.5).abs() < 1e-4);
        assert!((ctx.body.position - Vec3::new(1.0, 1.375, 0.0)).length() < 1e-4);
        assert!(!state.is_complete());

        for _ in 0..3 {
            assert!(state.update(&mut ctx).is_none());
        }
        assert!(!state.is_complete());

        assert!(state.update(&mut ctx).is_none());
        assert_eq!(state.progress(0.8), 1.0);
        assert_eq!(ctx.body.position, Vec3::new(2.0, 1.5, 0.0));
        assert_eq!(ctx.body.velocity, Vec3::ZERO);
        assert!(state.is_complete());
    }

    #[test]
    fn test_velocity_tracks_arc_motion() {
        let mut ctx = linear_context(0.4);
        let mut state = Mantle::default();
        state.enter(&mut ctx);
        state.update(&mut ctx);
        assert!(ctx.body.velocity.length() > 0.0);
        assert!(ctx.body.velocity.y > 0.0);
    }

    #[test]
    fn test_input_is_ignored() {
        let mut ctx = linear_context(0.4);
        let mut state = Mantle::default();
        state.enter(&mut ctx);
        ctx.begin_tick(0.1, LocomotionInput::moving(0.0, -1.0).with_jump(true), Default::default());
        assert!(state.handle_movement(&mut ctx).is_none());
        assert!(state.handle_jump(&mut ctx).is_none());
        assert_eq!(ctx.body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_enter_without_target_falls_after_notifying() {
        let log = CameraEventLog::new();
        let camera: Box<dyn CameraSink> = Box::new(log.clone());
        let mut ctx = LocomotionContext::new(
            LocomotionConfig::default(),
            Box::new(StaticWorld::new()),
            Vec3::ZERO,
            Some(camera),
        );
        let before = log.entered_states().len();

        let mut state = Mantle::default();
        assert!(state.enter(&mut ctx).unwrap().is::<Falling>());
        let entered = log.entered_states();
        assert_eq!(entered.len(), before + 1);
        assert_eq!(entered.last(), Some(&"Mantle"));
    }

    #[test]
    fn test_crouched_body_stands_and_lands_on_ledge() {
        let mut world = StaticWorld::new();
        world.add_ground(0.0);
        // 1.2m block, near face at z = -1.
        world.add_box_corners(Vec3::new(-5.0, 0.0, -6.0), Vec3::new(5.0, 1.2, -1.0));
        let config = LocomotionConfig::default();
        let mut ctx =
            LocomotionContext::new(config, Box::new(world), Vec3::new(0.0, 0.3, -0.3), None);

        // Airborne at crouch height, e.g. after a slide jump with crouch released.
        ctx.body.snap_height(0.9);
        ctx.body.velocity = Vec3::new(0.0, 1.0, -4.0);
        ctx.begin_tick(1.0 / 60.0, LocomotionInput::moving(0.0, 1.0), ViewBasis::default());
        assert!(!ctx.refresh_grounded());

        let target = ctx.detect_mantle().unwrap();
        ctx.pending_mantle = Some(target);

        let mut state = Mantle::default();
        assert!(state.enter(&mut ctx).is_none());
        assert_eq!(ctx.body.height(), 1.8);
        assert!((ctx.body.feet().y - 0.3).abs() < 1e-4);

        for _ in 0..120 {
            if state.is_complete() {
                break;
            }
            assert!(state.update(&mut ctx).is_none());
        }
        assert!(state.is_complete());
        assert!((ctx.body.feet().y - 1.25).abs() < 1e-4);

        assert!(state.update(&mut ctx).unwrap().is::<Standing>());
    }
}
