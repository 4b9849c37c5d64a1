//! Locomotion Context
//!
//! Everything the states share: configuration, the body, the collision world,
//! the camera sink, this tick's input and the cross-state latches (slide
//! availability, jump cooldown, a pending mantle). States receive it as
//! `&mut LocomotionContext` from the state machine and never see each other.

use glam::{Vec2, Vec3};

use super::body::KinematicBody;
use super::config::LocomotionConfig;
use super::ground::GroundSensor;
use super::mantle::{MantleDetector, MantleIntent, MantleTarget};
use crate::camera::{CameraSink, MovementNotification};
use crate::input::{LocomotionInput, ViewBasis};
use crate::physics::{Capsule, CollisionWorld, MoveResult, QueryFilter};

/// Clearance above the standing capsule required to leave a crouch.
const STAND_UP_MARGIN: f32 = 0.02;

/// Shared state handed to every locomotion state.
pub struct LocomotionContext {
    pub(crate) config: LocomotionConfig,
    pub(crate) body: KinematicBody,
    pub(crate) world: Box<dyn CollisionWorld>,
    pub(crate) camera: Option<Box<dyn CameraSink>>,
    pub(crate) ground_sensor: GroundSensor,
    pub(crate) mantle_detector: MantleDetector,

    /// This tick's input with the deadzone applied.
    pub(crate) input: LocomotionInput,
    pub(crate) view: ViewBasis,
    /// Seconds covered by the current tick.
    pub(crate) dt: f32,

    /// Ground sensor result for this tick.
    pub(crate) is_grounded: bool,
    /// Cleared when a slide starts, set again only when Standing is entered.
    pub(crate) slide_available: bool,
    pub(crate) jump_cooldown_remaining: f32,
    /// Handed from the airborne states to Mantle.
    pub(crate) pending_mantle: Option<MantleTarget>,
}

impl LocomotionContext {
    /// Build a context with the body standing at `spawn_feet`.
    pub fn new(
        config: LocomotionConfig,
        world: Box<dyn CollisionWorld>,
        spawn_feet: Vec3,
        camera: Option<Box<dyn CameraSink>>,
    ) -> Self {
        let body = KinematicBody::standing_at(
            spawn_feet,
            config.body.stand_height,
            config.body.radius,
            config.body.height_transition_duration,
        );
        let ground_sensor = GroundSensor::new(&config.ground);
        let mantle_detector = MantleDetector::new(&config.mantle, config.input.deadzone);

        let mut ctx = Self {
            config,
            body,
            world,
            camera,
            ground_sensor,
            mantle_detector,
            input: LocomotionInput::default(),
            view: ViewBasis::default(),
            dt: 0.0,
            is_grounded: false,
            slide_available: true,
            jump_cooldown_remaining: 0.0,
            pending_mantle: None,
        };
        ctx.refresh_grounded();
        ctx
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    pub fn world(&self) -> &dyn CollisionWorld {
        self.world.as_ref()
    }

    pub fn input(&self) -> &LocomotionInput {
        &self.input
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn is_slide_available(&self) -> bool {
        self.slide_available
    }

    /// Store this tick's input and view, forwarding the raw axis to the camera.
    pub(crate) fn begin_tick(&mut self, dt: f32, input: LocomotionInput, view: ViewBasis) {
        self.dt = dt;
        self.view = view;

        let sprinting = input.sprint_held && input.has_move(self.config.input.deadzone);
        if let Some(camera) = self.camera.as_mut() {
            camera.on_movement_input(input.move_axis, sprinting);
        }

        self.input = input.with_deadzone(self.config.input.deadzone);
        self.body.set_yaw(view.yaw());
        self.jump_cooldown_remaining = (self.jump_cooldown_remaining - dt).max(0.0);
    }

    pub fn refresh_grounded(&mut self) -> bool {
        self.is_grounded = self.ground_sensor.is_grounded(self.world.as_ref(), &self.body);
        self.is_grounded
    }

    pub fn has_move_input(&self) -> bool {
        self.input.move_axis != Vec2::ZERO
    }

    pub fn is_sprinting(&self) -> bool {
        self.input.sprint_held && self.has_move_input()
    }

    /// Camera-relative horizontal direction of the move input (normalized or zero).
    pub fn move_direction(&self) -> Vec3 {
        self.view.world_direction(self.input.move_axis)
    }

    /// Speed a grounded, upright body steers toward for the current input.
    pub fn stand_target_speed(&self) -> f32 {
        if self.is_sprinting() {
            self.config.movement.sprint_speed
        } else {
            self.config.movement.walk_speed
        }
    }

    pub fn can_jump(&self) -> bool {
        self.is_grounded && self.jump_cooldown_remaining <= 0.0
    }

    /// Whether a standing capsule fits where the body is now.
    pub fn can_stand_up(&self) -> bool {
        let stand = self.config.body.stand_height;
        let feet = self.body.feet();
        let lift = Vec3::Y * (stand * 0.5 + STAND_UP_MARGIN);
        let standing = Capsule::new(feet + lift, stand, self.body.radius());
        self.world
            .overlap_capsule(&standing, QueryFilter::default())
            .is_empty()
    }

    /// Crouch, sprint, enough speed and an armed latch.
    pub fn wants_slide(&self) -> bool {
        let movement = &self.config.movement;
        let threshold = movement.sprint_speed * self.config.slide.slide_speed_threshold;
        self.slide_available
            && self.input.crouch_held
            && self.input.sprint_held
            && self.body.horizontal_speed() >= threshold
    }

    /// Standing jump: launch at `sqrt(h * -2 * g)` and start the cooldown.
    pub fn perform_normal_jump(&mut self) {
        self.body.velocity.y = self.config.jump_velocity();
        self.jump_cooldown_remaining = self.config.jump.jump_cooldown;
    }

    /// Steer horizontal velocity toward `direction * speed`.
    ///
    /// Speeding up uses `acceleration`, slowing down uses `deceleration`.
    pub fn blend_horizontal(&mut self, direction: Vec3, speed: f32) {
        let current = self.body.horizontal_velocity();
        let target = direction * speed;
        let rate = if target.length_squared() >= current.length_squared() {
            self.config.movement.acceleration
        } else {
            self.config.movement.deceleration
        };
        self.body.set_horizontal_velocity(move_towards(current, target, rate * self.dt));
    }

    /// Move the body by `delta` through the collision world.
    pub fn move_body(&mut self, delta: Vec3) -> MoveResult {
        let result = self
            .world
            .move_and_slide(&self.body.capsule(), delta, QueryFilter::default());
        self.body.position = result.position;
        result
    }

    /// Integrate the body by its velocity for this tick.
    ///
    /// Velocity into walls and ceilings is removed. Velocity into the floor is
    /// kept so the resting push and landing impact survive.
    pub fn integrate_velocity(&mut self) -> MoveResult {
        let result = self.move_body(self.body.velocity * self.dt);
        self.body.velocity = result.clip_velocity_except_floor(self.body.velocity);
        result
    }

    pub fn mantle_intent(&self) -> MantleIntent {
        MantleIntent {
            move_axis: self.input.move_axis,
            direction: self.move_direction(),
            is_grounded: self.is_grounded,
            is_crouching: self.input.crouch_held,
        }
    }

    /// Run the mantle detector against this tick's intent.
    pub fn detect_mantle(&self) -> Option<MantleTarget> {
        self.mantle_detector.detect(
            self.world.as_ref(),
            &self.body,
            self.config.body.stand_height,
            &self.mantle_intent(),
        )
    }

    pub(crate) fn notify_state_entered(&mut self, state: &'static str, speed: f32) {
        let notification = MovementNotification {
            state,
            is_moving: self.has_move_input(),
            is_sprinting: self.is_sprinting(),
            speed,
        };
        if let Some(camera) = self.camera.as_mut() {
            camera.on_state_entered(notification);
        }
    }

    pub(crate) fn notify_landed(&mut self, impact_speed: f32) {
        if let Some(camera) = self.camera.as_mut() {
            camera.on_landed(impact_speed);
        }
    }
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let diff = target - current;
    let distance = diff.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + diff / distance * max_delta
    }
}
