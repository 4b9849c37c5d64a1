//! Kinematic Body
//!
//! The character capsule: center position, yaw orientation, radius, a height
//! eased between stance targets, and the authoritative velocity shared by every
//! locomotion state.
//!
//! # Height Transitions
//!
//! Changing the target height starts a transition over a fixed duration with a
//! cubic ease-in-out. The feet stay planted: the center moves by half of each
//! height change. Whether there is room to grow is checked by the caller
//! (see `LocomotionContext::can_stand_up`).

use glam::{Quat, Vec3};

use super::easing::{ease_in_out, lerp};
use crate::physics::Capsule;

/// Kinematic capsule moved by explicit deltas.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    /// Capsule center in world space
    pub position: Vec3,
    /// Facing, yaw only
    pub orientation: Quat,
    /// Current velocity in world space (meters per second)
    pub velocity: Vec3,

    radius: f32,

    /// Current actual height (may differ from target during transitions)
    height: f32,

    /// Height the current transition is heading to
    target_height: f32,

    /// Height at start of transition
    transition_start_height: f32,

    /// Transition progress (0.0 to 1.0)
    transition_progress: f32,

    /// Seconds a full transition takes
    transition_duration: f32,
}

impl KinematicBody {
    /// Create a body at rest with its center at `position`.
    pub fn new(position: Vec3, height: f32, radius: f32, transition_duration: f32) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            radius,
            height,
            target_height: height,
            transition_start_height: height,
            transition_progress: 1.0,
            transition_duration,
        }
    }

    /// Create a body standing with its feet at `feet`.
    pub fn standing_at(feet: Vec3, height: f32, radius: f32, transition_duration: f32) -> Self {
        Self::new(feet + Vec3::Y * (height * 0.5), height, radius, transition_duration)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn target_height(&self) -> f32 {
        self.target_height
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition_progress < 1.0
    }

    /// Bottom of the capsule.
    pub fn feet(&self) -> Vec3 {
        self.position - Vec3::Y * (self.height * 0.5)
    }

    pub fn capsule(&self) -> Capsule {
        Capsule::new(self.position, self.height, self.radius)
    }

    /// Horizontal (XZ) part of the velocity.
    pub fn horizontal_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }

    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_velocity().length()
    }

    /// Replace the horizontal velocity, leaving the vertical component untouched.
    pub fn set_horizontal_velocity(&mut self, horizontal: Vec3) {
        self.velocity.x = horizontal.x;
        self.velocity.z = horizontal.z;
    }

    /// Face a yaw angle (radians, 0 looks toward -Z).
    pub fn set_yaw(&mut self, yaw: f32) {
        self.orientation = Quat::from_rotation_y(-yaw);
    }

    /// Start easing toward a new height. No-op if already heading there.
    pub fn set_target_height(&mut self, height: f32) {
        if (self.target_height - height).abs() > f32::EPSILON {
            self.target_height = height;
            self.transition_start_height = self.height;
            self.transition_progress = 0.0;
        }
    }

    /// Jump straight to a height, keeping the feet where they are.
    pub fn snap_height(&mut self, height: f32) {
        self.apply_height(height);
        self.target_height = height;
        self.transition_start_height = height;
        self.transition_progress = 1.0;
    }

    /// Advance the height transition and return the current height.
    pub fn update_height(&mut self, dt: f32) -> f32 {
        if self.transition_progress < 1.0 && dt > 0.0 {
            self.transition_progress = if self.transition_duration > 0.0 {
                (self.transition_progress + dt / self.transition_duration).min(1.0)
            } else {
                1.0
            };

            let t = ease_in_out(self.transition_progress);
            let height = lerp(self.transition_start_height, self.target_height, t);
            self.apply_height(height);
        }

        self.height
    }

    fn apply_height(&mut self, height: f32) {
        let feet = self.feet();
        self.height = height;
        self.position = feet + Vec3::Y * (height * 0.5);
    }
}
