//! Locomotion Controller
//!
//! Owns the state machine and the shared [`LocomotionContext`], and drives one
//! simulation step per [`tick`](LocomotionController::tick).
//!
//! # Tick Order
//!
//! 1. Store input and view, forward the raw axis to the camera, count down the
//!    jump cooldown.
//! 2. Unless mantling: refresh the ground sensor and ease the capsule height
//!    toward the stance of the active state.
//! 3. `handle_movement`, `handle_jump`, then `update` on the active state. A
//!    transition requested by any of them is applied before the next call.
//!
//! # Usage
//!
//! ```rust,ignore
//! use stride_engine::input::{LocomotionInput, ViewBasis};
//! use stride_engine::physics::StaticWorld;
//! use stride_engine::player::{LocomotionConfig, LocomotionController};
//! use glam::Vec3;
//!
//! let mut world = StaticWorld::new();
//! world.add_ground(0.0);
//! let mut controller =
//!     LocomotionController::new(LocomotionConfig::default(), Box::new(world), Vec3::ZERO, None);
//!
//! // Each frame:
//! let input = LocomotionInput::from_keys(w, s, a, d).with_sprint(shift);
//! controller.tick(delta_time, input, ViewBasis::from_yaw(camera_yaw))?;
//! let eye = controller.body().position;
//! ```

use glam::Vec3;
use tracing::{error, trace};

use super::body::KinematicBody;
use super::config::LocomotionConfig;
use super::context::LocomotionContext;
use super::state_machine::StateMachine;
use super::states::{
    Crouching, Falling, Jumping, LocomotionState, Mantle, Sliding, Standing, all_states,
};
use crate::camera::CameraSink;
use crate::error::LocomotionError;
use crate::input::{LocomotionInput, ViewBasis};
use crate::physics::CollisionWorld;

/// Horizontal speed above which the body counts as moving without input.
const MOVING_SPEED_EPSILON: f32 = 0.1;

/// Character locomotion: state machine plus everything the states share.
pub struct LocomotionController {
    machine: StateMachine<dyn LocomotionState, LocomotionContext>,
    ctx: LocomotionContext,
}

impl LocomotionController {
    /// Build a controller standing at `spawn_feet`.
    ///
    /// An invalid configuration is logged and replaced by the defaults so the
    /// character stays playable. Use [`try_new`](Self::try_new) to reject it instead.
    pub fn new(
        config: LocomotionConfig,
        world: Box<dyn CollisionWorld>,
        spawn_feet: Vec3,
        camera: Option<Box<dyn CameraSink>>,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                error!(%err, "invalid locomotion config, using defaults");
                LocomotionConfig::default()
            }
        };

        let mut ctx = LocomotionContext::new(config, world, spawn_feet, camera);
        let mut machine = StateMachine::new();
        for state in all_states() {
            if let Err(err) = machine.register(state) {
                error!(%err, "failed to register locomotion state");
            }
        }
        if let Err(err) = machine.change_state::<Standing>(&mut ctx) {
            error!(%err, "failed to enter initial locomotion state");
        }

        Self { machine, ctx }
    }

    /// Like [`new`](Self::new) but fails on an invalid configuration.
    pub fn try_new(
        config: LocomotionConfig,
        world: Box<dyn CollisionWorld>,
        spawn_feet: Vec3,
        camera: Option<Box<dyn CameraSink>>,
    ) -> Result<Self, LocomotionError> {
        config.validate()?;
        let mut ctx = LocomotionContext::new(config, world, spawn_feet, camera);
        let mut machine = StateMachine::new();
        for state in all_states() {
            machine.register(state)?;
        }
        machine.change_state::<Standing>(&mut ctx)?;
        Ok(Self { machine, ctx })
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Non-positive or non-finite `dt` is ignored.
    pub fn tick(
        &mut self,
        dt: f32,
        input: LocomotionInput,
        view: ViewBasis,
    ) -> Result<(), LocomotionError> {
        if !(dt.is_finite() && dt > 0.0) {
            trace!(dt, "skipping tick with unusable dt");
            return Ok(());
        }

        self.ctx.begin_tick(dt, input, view);

        if !self.machine.is_in_state::<Mantle>() {
            self.ctx.refresh_grounded();
            self.update_stance_height(dt);
        }

        if let Err(err) = self.run_state_hooks() {
            error!(%err, state = self.current_state_name(), "locomotion state machine error");
            return Err(err);
        }

        trace!(
            state = self.current_state_name(),
            position = ?self.ctx.body.position,
            velocity = ?self.ctx.body.velocity,
            grounded = self.ctx.is_grounded,
            "locomotion tick"
        );
        Ok(())
    }

    fn run_state_hooks(&mut self) -> Result<(), LocomotionError> {
        self.machine.dispatch(&mut self.ctx, |state, ctx| state.handle_movement(ctx))?;
        self.machine.dispatch(&mut self.ctx, |state, ctx| state.handle_jump(ctx))?;
        self.machine.update(&mut self.ctx)?;
        Ok(())
    }

    /// Crouch height while crouching or sliding, standing height on foot.
    /// Airborne states keep whatever target they inherited.
    fn update_stance_height(&mut self, dt: f32) {
        let heights = &self.ctx.config.body;
        let low = self.machine.is_in_state::<Crouching>() || self.machine.is_in_state::<Sliding>();
        let target = if low {
            Some(heights.crouch_height)
        } else if self.machine.is_in_state::<Standing>() {
            Some(heights.stand_height)
        } else {
            None
        };
        if let Some(height) = target {
            self.ctx.body.set_target_height(height);
        }
        self.ctx.body.update_height(dt);
    }

    pub fn config(&self) -> &LocomotionConfig {
        self.ctx.config()
    }

    pub fn body(&self) -> &KinematicBody {
        self.ctx.body()
    }

    pub fn context(&self) -> &LocomotionContext {
        &self.ctx
    }

    /// Feet position.
    pub fn position(&self) -> Vec3 {
        self.ctx.body.feet()
    }

    pub fn velocity(&self) -> Vec3 {
        self.ctx.body.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.ctx.is_grounded
    }

    /// Move input is held, or the body still carries horizontal speed.
    pub fn is_moving(&self) -> bool {
        self.ctx.has_move_input() || self.ctx.body.horizontal_speed() > MOVING_SPEED_EPSILON
    }

    pub fn is_sprinting(&self) -> bool {
        self.machine.is_in_state::<Standing>() && self.ctx.is_sprinting()
    }

    pub fn is_crouching(&self) -> bool {
        self.machine.is_in_state::<Crouching>()
    }

    pub fn is_sliding(&self) -> bool {
        self.machine.is_in_state::<Sliding>()
    }

    pub fn is_jumping(&self) -> bool {
        self.machine.is_in_state::<Jumping>()
    }

    pub fn is_falling(&self) -> bool {
        self.machine.is_in_state::<Falling>()
    }

    pub fn is_mantling(&self) -> bool {
        self.machine.is_in_state::<Mantle>()
    }

    pub fn can_jump(&self) -> bool {
        self.ctx.can_jump()
    }

    pub fn can_stand_up(&self) -> bool {
        self.ctx.can_stand_up()
    }

    /// Whether the current input and motion would start a mantle right now.
    pub fn can_mantle(&self) -> bool {
        !self.is_mantling() && self.ctx.detect_mantle().is_some()
    }

    pub fn is_slide_available(&self) -> bool {
        self.ctx.slide_available
    }

    pub fn current_state_name(&self) -> &'static str {
        self.machine.current_name().unwrap_or("None")
    }

    pub fn is_in_state<T: 'static>(&self) -> bool {
        self.machine.is_in_state::<T>()
    }

    /// Inspect a state by type (slide timer, mantle progress, ...).
    pub fn state<T: 'static>(&self) -> Option<&T> {
        self.machine.state::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraEventLog;
    use crate::physics::StaticWorld;

    fn flat_world() -> Box<StaticWorld> {
        let mut world = StaticWorld::new();
        world.add_ground(0.0);
        Box::new(world)
    }

    #[test]
    fn test_starts_standing_and_grounded() {
        let controller =
            LocomotionController::new(LocomotionConfig::default(), flat_world(), Vec3::ZERO, None);
        assert_eq!(controller.current_state_name(), "Standing");
        assert!(controller.is_grounded());
        assert!(controller.can_jump());
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let mut config = LocomotionConfig::default();
        config.body.radius = -1.0;

        let controller = LocomotionController::new(config.clone(), flat_world(), Vec3::ZERO, None);
        assert_eq!(controller.config(), &LocomotionConfig::default());

        let err = LocomotionController::try_new(config, flat_world(), Vec3::ZERO, None);
        assert!(matches!(err, Err(LocomotionError::Config(_))));
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut controller =
            LocomotionController::new(LocomotionConfig::default(), flat_world(), Vec3::ZERO, None);
        let input = LocomotionInput::moving(0.0, 1.0);
        controller.tick(0.0, input, ViewBasis::default()).unwrap();
        controller.tick(f32::NAN, input, ViewBasis::default()).unwrap();
        assert_eq!(controller.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_walk_forward_moves_along_view() {
        let mut controller =
            LocomotionController::new(LocomotionConfig::default(), flat_world(), Vec3::ZERO, None);
        for _ in 0..60 {
            controller
                .tick(1.0 / 60.0, LocomotionInput::moving(0.0, 1.0), ViewBasis::default())
                .unwrap();
        }
        assert!(controller.is_moving());
        assert!(!controller.is_sprinting());
        assert!((controller.body().horizontal_speed() - 5.0).abs() < 1e-3);
        assert!(controller.position().z < -3.0);
        assert!(controller.is_grounded());
    }

    #[test]
    fn test_crouch_shrinks_capsule() {
        let mut controller =
            LocomotionController::new(LocomotionConfig::default(), flat_world(), Vec3::ZERO, None);
        let input = LocomotionInput::new().with_crouch(true);
        for _ in 0..30 {
            controller.tick(1.0 / 60.0, input, ViewBasis::default()).unwrap();
        }
        assert!(controller.is_crouching());
        assert!((controller.body().height() - 0.9).abs() < 1e-4);
    }

    #[test]
    fn test_camera_sees_initial_state() {
        let log = CameraEventLog::new();
        let camera: Box<dyn CameraSink> = Box::new(log.clone());
        let _controller =
            LocomotionController::new(LocomotionConfig::default(), flat_world(), Vec3::ZERO, Some(camera));
        assert_eq!(log.entered_states(), vec!["Standing"]);
    }
}
