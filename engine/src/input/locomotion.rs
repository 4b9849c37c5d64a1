//! Locomotion input snapshot and view basis
//!
//! The input collaborator delivers one [`LocomotionInput`] per tick. The move
//! axis is `x` = strafe right, `y` = forward, both in `[-1, 1]`. A deadzone is
//! applied inside the core, not by the caller.
//!
//! [`ViewBasis`] carries the horizontal forward/right vectors used to project the
//! move axis into a world direction.

use glam::{Vec2, Vec3};

/// Default radial deadzone applied to the move axis.
pub const DEFAULT_DEADZONE: f32 = 0.1;

/// One tick of player intent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionInput {
    /// Move axis: x = right, y = forward.
    pub move_axis: Vec2,
    /// Jump went down this tick.
    pub jump_pressed: bool,
    /// Jump is being held.
    pub jump_held: bool,
    /// Sprint is being held.
    pub sprint_held: bool,
    /// Crouch is being held.
    pub crouch_held: bool,
}

impl LocomotionInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input with only a move axis set.
    pub fn moving(right: f32, forward: f32) -> Self {
        Self {
            move_axis: Vec2::new(right, forward),
            ..Self::default()
        }
    }

    /// Build the move axis from four digital directions.
    ///
    /// Opposite directions cancel out, matching keyboard WASD behavior.
    pub fn from_keys(forward: bool, backward: bool, left: bool, right: bool) -> Self {
        let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;
        Self::moving(axis(right, left), axis(forward, backward))
    }

    pub fn with_sprint(mut self, held: bool) -> Self {
        self.sprint_held = held;
        self
    }

    pub fn with_crouch(mut self, held: bool) -> Self {
        self.crouch_held = held;
        self
    }

    /// Mark jump as pressed (and held) this tick.
    pub fn with_jump(mut self, pressed: bool) -> Self {
        self.jump_pressed = pressed;
        self.jump_held = self.jump_held || pressed;
        self
    }

    pub fn magnitude(&self) -> f32 {
        self.move_axis.length()
    }

    /// Apply a radial deadzone and clamp the axis into the unit circle.
    ///
    /// Axes shorter than `deadzone` become zero; the rest keep their raw value
    /// (clamped to length 1) so partial stick deflection still reads as slower intent.
    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        let len = self.move_axis.length();
        if !len.is_finite() || len < deadzone {
            self.move_axis = Vec2::ZERO;
        } else if len > 1.0 {
            self.move_axis /= len;
        }
        self
    }

    /// Whether the move axis is outside `deadzone`.
    pub fn has_move(&self, deadzone: f32) -> bool {
        self.magnitude() > deadzone
    }
}

/// Horizontal view orientation supplied by the camera/view collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    /// Horizontal forward direction (normalized, y = 0).
    pub forward: Vec3,
    /// Horizontal right direction (normalized, y = 0).
    pub right: Vec3,
}

impl Default for ViewBasis {
    fn default() -> Self {
        Self::from_yaw(0.0)
    }
}

impl ViewBasis {
    /// Build from a yaw angle in radians, where 0 looks toward -Z.
    pub fn from_yaw(yaw: f32) -> Self {
        let forward = Vec3::new(yaw.sin(), 0.0, -yaw.cos()).normalize();
        // forward × Y
        let right = Vec3::new(-forward.z, 0.0, forward.x);
        Self { forward, right }
    }

    /// Build from arbitrary forward/right vectors, flattening them onto the XZ plane.
    ///
    /// Degenerate inputs fall back to the yaw-zero basis.
    pub fn from_vectors(forward: Vec3, right: Vec3) -> Self {
        let flat_forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        let flat_right = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();
        if flat_forward == Vec3::ZERO || flat_right == Vec3::ZERO {
            return Self::default();
        }
        Self {
            forward: flat_forward,
            right: flat_right,
        }
    }

    /// Yaw angle in radians for this basis.
    pub fn yaw(&self) -> f32 {
        self.forward.x.atan2(-self.forward.z)
    }

    /// Project a move axis into a horizontal world direction (normalized or zero).
    pub fn world_direction(&self, move_axis: Vec2) -> Vec3 {
        (self.forward * move_axis.y + self.right * move_axis.x).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone_zeroes_small_axis() {
        let input = LocomotionInput::moving(0.05, 0.05).with_deadzone(DEFAULT_DEADZONE);
        assert_eq!(input.move_axis, Vec2::ZERO);
        assert!(!input.has_move(DEFAULT_DEADZONE));
    }

    #[test]
    fn test_deadzone_clamps_diagonal_to_unit() {
        let input = LocomotionInput::moving(1.0, 1.0).with_deadzone(DEFAULT_DEADZONE);
        assert!((input.magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let input = LocomotionInput::from_keys(true, true, false, true);
        assert_eq!(input.move_axis, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_yaw_zero_faces_negative_z() {
        let view = ViewBasis::from_yaw(0.0);
        assert!((view.forward - Vec3::NEG_Z).length() < 1e-6);
        assert!((view.right - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_world_direction_is_camera_relative() {
        let view = ViewBasis::from_yaw(std::f32::consts::FRAC_PI_2);
        let dir = view.world_direction(Vec2::new(0.0, 1.0));
        assert!((dir - Vec3::X).length() < 1e-5);
        assert!((view.yaw() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_vectors_fall_back_to_default() {
        let view = ViewBasis::from_vectors(Vec3::Y, Vec3::X);
        assert_eq!(view, ViewBasis::default());
    }
}
