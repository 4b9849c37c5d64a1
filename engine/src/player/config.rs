//! Locomotion Configuration
//!
//! Every tunable of the locomotion core, grouped by concern. `Default` returns the
//! shipping values; files only need to list the fields they override because every
//! section is `#[serde(default)]`.
//!
//! The controller owns one `LocomotionConfig`; states only read it.
//!
//! # Example
//!
//! ```rust,ignore
//! use stride_engine::player::LocomotionConfig;
//!
//! let config = LocomotionConfig::from_json_str(r#"{ "jump": { "jump_height": 2.0 } }"#)?;
//! assert_eq!(config.movement.walk_speed, 5.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::easing::EasingCurve;
use crate::error::ConfigError;

/// Ground movement speeds and blend rates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walk speed in m/s
    pub walk_speed: f32,
    /// Sprint speed in m/s
    pub sprint_speed: f32,
    /// Crouched walk speed in m/s
    pub crouch_speed: f32,
    /// Rate used while speeding up toward the target velocity (m/s²)
    pub acceleration: f32,
    /// Rate used while slowing down toward the target velocity (m/s²)
    pub deceleration: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            sprint_speed: 10.0,
            crouch_speed: 2.5,
            acceleration: 50.0,
            deceleration: 30.0,
        }
    }
}

/// Jump, gravity and vertical limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Apex height of a standing jump in meters
    pub jump_height: f32,
    /// Signed gravity along Y in m/s² (negative = down)
    pub gravity: f32,
    /// Seconds after a jump before another jump is allowed
    pub jump_cooldown: f32,
    /// Vertical velocity held while resting on the ground (small negative)
    pub grounded_velocity: f32,
    /// Terminal downward speed in m/s (positive magnitude)
    pub max_fall_speed: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            jump_height: 1.6,
            gravity: -20.0,
            jump_cooldown: 0.2,
            grounded_velocity: -2.0,
            max_fall_speed: 50.0,
        }
    }
}

/// Capsule dimensions and height easing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Standing capsule height in meters
    pub stand_height: f32,
    /// Crouched capsule height in meters
    pub crouch_height: f32,
    /// Capsule radius in meters
    pub radius: f32,
    /// Seconds to ease between stance heights
    pub height_transition_duration: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            stand_height: 1.8,
            crouch_height: 0.9,
            radius: 0.35,
            height_transition_duration: 0.15,
        }
    }
}

/// Ground sensor tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Extra ray length below the capsule bottom in meters
    pub check_distance: f32,
    /// Steepest walkable surface, degrees from up
    pub max_ground_angle: f32,
    /// Overlap sphere radius as a fraction of the capsule radius
    pub overlap_radius_scale: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            check_distance: 0.15,
            max_ground_angle: 45.0,
            overlap_radius_scale: 0.9,
        }
    }
}

/// Slide maneuver tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    /// Horizontal speed set when a slide starts (m/s)
    pub slide_speed: f32,
    /// Maximum slide time in seconds
    pub slide_duration: f32,
    /// Horizontal deceleration during the slide (m/s²)
    pub slide_deceleration: f32,
    /// Speed floor held while more than the grace window remains (m/s)
    pub min_slide_speed: f32,
    /// Fraction of sprint speed required to start a slide
    pub slide_speed_threshold: f32,
    /// Multiplier applied to the jump velocity for a slide jump
    pub slide_jump_multiplier: f32,
    /// Horizontal speed added along the slide direction on a slide jump (m/s)
    pub slide_jump_boost: f32,
    /// Keep the direction chosen at slide start instead of following velocity
    pub lock_direction: bool,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            slide_speed: 12.0,
            slide_duration: 1.0,
            slide_deceleration: 8.0,
            min_slide_speed: 3.0,
            slide_speed_threshold: 0.8,
            slide_jump_multiplier: 0.8,
            slide_jump_boost: 4.0,
            lock_direction: true,
        }
    }
}

/// Airborne steering tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirConfig {
    /// Horizontal speed cap while airborne (m/s)
    pub air_max_speed: f32,
    /// Base air acceleration (m/s²)
    pub air_acceleration: f32,
    /// 0 = momentum locked, 1 = full air acceleration
    pub air_control_strength: f32,
    /// Per-tick horizontal velocity multiplier with no input
    pub air_drag: f32,
    /// Allow the instant redirect on sharp turns
    pub allow_direction_change: bool,
    /// Velocity/input alignment below which a turn counts as sharp
    pub sharp_turn_threshold: f32,
}

impl Default for AirConfig {
    fn default() -> Self {
        Self {
            air_max_speed: 10.0,
            air_acceleration: 25.0,
            air_control_strength: 0.6,
            air_drag: 0.99,
            allow_direction_change: true,
            sharp_turn_threshold: 0.5,
        }
    }
}

/// Ledge mantle tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MantleConfig {
    pub enabled: bool,
    /// Forward probe length in meters
    pub mantle_reach: f32,
    /// Highest ledge above the feet that can be climbed (meters)
    pub mantle_height: f32,
    /// Minimum horizontal speed to attempt a mantle (m/s)
    pub min_mantle_velocity: f32,
    /// Seconds to traverse the arc
    pub mantle_duration: f32,
    /// Progress curve along the arc
    pub easing: EasingCurve,
}

impl Default for MantleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mantle_reach: 1.0,
            mantle_height: 2.0,
            min_mantle_velocity: 1.0,
            mantle_duration: 0.8,
            easing: EasingCurve::EaseInOut,
        }
    }
}

/// Input interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Radial move-axis deadzone
    pub deadzone: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { deadzone: 0.1 }
    }
}

/// Complete locomotion tuning.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub movement: MovementConfig,
    pub jump: JumpConfig,
    pub body: BodyConfig,
    pub ground: GroundConfig,
    pub slide: SlideConfig,
    pub air: AirConfig,
    pub mantle: MantleConfig,
    pub input: InputConfig,
}

static_assertions::assert_impl_all!(LocomotionConfig: Send, Sync, Clone);

impl LocomotionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Vertical launch speed for a standing jump: `sqrt(h * -2 * g)`.
    pub fn jump_velocity(&self) -> f32 {
        (self.jump.jump_height * -2.0 * self.jump.gravity).max(0.0).sqrt()
    }

    /// Check every field the simulation divides by or relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be > 0, got {value}")))
            }
        }
        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")))
            }
        }
        fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be in [0, 1], got {value}")))
            }
        }

        let m = &self.movement;
        positive("movement.walk_speed", m.walk_speed)?;
        positive("movement.sprint_speed", m.sprint_speed)?;
        positive("movement.crouch_speed", m.crouch_speed)?;
        positive("movement.acceleration", m.acceleration)?;
        positive("movement.deceleration", m.deceleration)?;

        let j = &self.jump;
        non_negative("jump.jump_height", j.jump_height)?;
        if !(j.gravity.is_finite() && j.gravity < 0.0) {
            return Err(ConfigError::invalid(
                "jump.gravity",
                format!("must be negative (down), got {}", j.gravity),
            ));
        }
        non_negative("jump.jump_cooldown", j.jump_cooldown)?;
        if !(j.grounded_velocity.is_finite() && j.grounded_velocity <= 0.0) {
            return Err(ConfigError::invalid(
                "jump.grounded_velocity",
                format!("must be <= 0, got {}", j.grounded_velocity),
            ));
        }
        positive("jump.max_fall_speed", j.max_fall_speed)?;

        let b = &self.body;
        positive("body.radius", b.radius)?;
        positive("body.stand_height", b.stand_height)?;
        positive("body.crouch_height", b.crouch_height)?;
        positive("body.height_transition_duration", b.height_transition_duration)?;
        if b.crouch_height > b.stand_height {
            return Err(ConfigError::invalid(
                "body.crouch_height",
                "must not exceed stand_height",
            ));
        }
        if b.crouch_height < b.radius * 2.0 {
            return Err(ConfigError::invalid(
                "body.crouch_height",
                "must be at least twice the radius",
            ));
        }

        let g = &self.ground;
        positive("ground.check_distance", g.check_distance)?;
        if !(0.0..90.0).contains(&g.max_ground_angle) {
            return Err(ConfigError::invalid(
                "ground.max_ground_angle",
                format!("must be in [0, 90), got {}", g.max_ground_angle),
            ));
        }
        positive("ground.overlap_radius_scale", g.overlap_radius_scale)?;

        let s = &self.slide;
        positive("slide.slide_speed", s.slide_speed)?;
        positive("slide.slide_duration", s.slide_duration)?;
        non_negative("slide.slide_deceleration", s.slide_deceleration)?;
        non_negative("slide.min_slide_speed", s.min_slide_speed)?;
        non_negative("slide.slide_speed_threshold", s.slide_speed_threshold)?;
        non_negative("slide.slide_jump_multiplier", s.slide_jump_multiplier)?;
        non_negative("slide.slide_jump_boost", s.slide_jump_boost)?;

        let a = &self.air;
        positive("air.air_max_speed", a.air_max_speed)?;
        non_negative("air.air_acceleration", a.air_acceleration)?;
        unit_interval("air.air_control_strength", a.air_control_strength)?;
        unit_interval("air.air_drag", a.air_drag)?;
        if !(-1.0..=1.0).contains(&a.sharp_turn_threshold) {
            return Err(ConfigError::invalid(
                "air.sharp_turn_threshold",
                "must be a dot product in [-1, 1]",
            ));
        }

        let mt = &self.mantle;
        positive("mantle.mantle_reach", mt.mantle_reach)?;
        positive("mantle.mantle_height", mt.mantle_height)?;
        non_negative("mantle.min_mantle_velocity", mt.min_mantle_velocity)?;
        positive("mantle.mantle_duration", mt.mantle_duration)?;

        if !(0.0..1.0).contains(&self.input.deadzone) {
            return Err(ConfigError::invalid(
                "input.deadzone",
                format!("must be in [0, 1), got {}", self.input.deadzone),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        LocomotionConfig::default().validate().unwrap();
    }

    #[test]
    fn test_jump_velocity_formula() {
        let mut config = LocomotionConfig::default();
        config.jump.jump_height = 2.0;
        config.jump.gravity = -20.0;
        assert!((config.jump_velocity() - 8.944).abs() < 1e-3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            LocomotionConfig::from_json_str(r#"{ "slide": { "slide_speed": 14.0 } }"#).unwrap();
        assert_eq!(config.slide.slide_speed, 14.0);
        assert_eq!(config.slide.min_slide_speed, SlideConfig::default().min_slide_speed);
        assert_eq!(config.movement, MovementConfig::default());
    }

    #[test]
    fn test_json_round_trip_preserves_easing() {
        let mut config = LocomotionConfig::default();
        config.mantle.easing = EasingCurve::Linear;
        let json = config.to_json_pretty().unwrap();
        let parsed = LocomotionConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_positive_gravity_rejected() {
        let err = LocomotionConfig::from_json_str(r#"{ "jump": { "gravity": 9.8 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "jump.gravity", .. }));
    }

    #[test]
    fn test_crouch_taller_than_stand_rejected() {
        let mut config = LocomotionConfig::default();
        config.body.crouch_height = 2.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_reports_json_error() {
        let err = LocomotionConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = LocomotionConfig::load_json("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
