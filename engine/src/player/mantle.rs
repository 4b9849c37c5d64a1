//! Mantle Detection and Arc
//!
//! [`MantleDetector`] decides whether an airborne body moving toward a wall can
//! climb onto it, and where it would land:
//!
//! 1. Gate on intent: enough input, enough speed, pushing forward, and already
//!    moving roughly the way the input points (within 45°).
//! 2. Forward ray toward the wall up to `mantle_reach`.
//! 3. Downward ray from above the hit point finds the ledge top; the ledge must sit
//!    between 0.5m and `mantle_height` above the feet.
//! 4. A standing capsule at the landing spot (past the edge by `radius + 0.6`) must
//!    be clear of everything but the wall itself.
//!
//! [`MantlePath`] is the quadratic Bézier the Mantle state follows.

use glam::{Vec2, Vec3};

use super::body::KinematicBody;
use super::config::MantleConfig;
use crate::physics::{Capsule, ColliderId, CollisionWorld, QueryFilter};

/// Ledges lower than this above the feet are stepped over, not mantled.
pub const MIN_LEDGE_HEIGHT: f32 = 0.5;

/// Landing spot distance past the ledge edge, added to the capsule radius.
pub const LANDING_EDGE_OFFSET: f32 = 0.6;

/// Minimum rise of the arc control point above the start.
pub const MIN_ARC_RISE: f32 = 1.5;

/// Extra rise of the arc control point above the height difference.
pub const ARC_HEADROOM: f32 = 0.5;

/// cos(45°): velocity and input must agree at least this much.
const MIN_VELOCITY_ALIGNMENT: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Normalized forward input below this counts as sideways or backward.
const MIN_FORWARD_INPUT: f32 = 0.1;

/// Height of the forward probe above the feet.
const WALL_PROBE_HEIGHT: f32 = MIN_LEDGE_HEIGHT + 0.05;

/// The ledge probe starts this far above `mantle_height`.
const LEDGE_PROBE_CLEARANCE: f32 = 0.1;

/// The ledge probe starts this far past the wall face.
const LEDGE_PROBE_INSET: f32 = 0.1;

/// Lift of the landing capsule so it does not touch the ledge surface.
const LANDING_LIFT: f32 = 0.05;

/// Ledge surfaces must face up at least this much.
const MIN_LEDGE_NORMAL_Y: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Intent snapshot the detector gates on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MantleIntent {
    /// Deadzoned move axis (x = right, y = forward).
    pub move_axis: Vec2,
    /// Desired horizontal world direction (normalized or zero).
    pub direction: Vec3,
    pub is_grounded: bool,
    pub is_crouching: bool,
}

/// Accepted mantle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MantleTarget {
    /// Capsule center at the end of the maneuver.
    pub landing: Vec3,
    /// Top of the ledge at the wall edge.
    pub ledge_point: Vec3,
    /// The wall the forward probe hit.
    pub wall: ColliderId,
}

/// Forward-wall plus downward-ledge query pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MantleDetector {
    enabled: bool,
    reach: f32,
    max_height: f32,
    min_velocity: f32,
    deadzone: f32,
}

impl MantleDetector {
    pub fn new(config: &MantleConfig, deadzone: f32) -> Self {
        Self {
            enabled: config.enabled,
            reach: config.mantle_reach,
            max_height: config.mantle_height,
            min_velocity: config.min_mantle_velocity,
            deadzone,
        }
    }

    /// Intent and velocity gate, before any geometry query.
    pub fn is_eligible(&self, intent: &MantleIntent, body: &KinematicBody) -> bool {
        if !self.enabled || intent.is_grounded || intent.is_crouching {
            return false;
        }
        if intent.move_axis.length() <= self.deadzone || intent.direction == Vec3::ZERO {
            return false;
        }

        // Backward or pure sideways input never mantles.
        let forward = intent.move_axis.normalize_or_zero().y;
        if forward < MIN_FORWARD_INPUT {
            return false;
        }

        let horizontal = body.horizontal_velocity();
        let speed = horizontal.length();
        if speed < self.min_velocity || speed <= f32::EPSILON {
            return false;
        }

        (horizontal / speed).dot(intent.direction) >= MIN_VELOCITY_ALIGNMENT
    }

    /// Full check: gate plus geometry. Returns the landing on success.
    pub fn detect(
        &self,
        world: &dyn CollisionWorld,
        body: &KinematicBody,
        stand_height: f32,
        intent: &MantleIntent,
    ) -> Option<MantleTarget> {
        if !self.is_eligible(intent, body) {
            return None;
        }
        self.find_ledge(world, body, stand_height, intent.direction)
    }

    /// Geometry queries only, toward `direction`.
    pub fn find_ledge(
        &self,
        world: &dyn CollisionWorld,
        body: &KinematicBody,
        stand_height: f32,
        direction: Vec3,
    ) -> Option<MantleTarget> {
        let direction = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let feet = body.feet();
        let wall_origin = Vec3::new(body.position.x, feet.y + WALL_PROBE_HEIGHT, body.position.z);
        let wall_hit = world.raycast(wall_origin, direction, self.reach, QueryFilter::default())?;

        let ledge_origin = Vec3::new(
            wall_hit.point.x,
            feet.y + self.max_height + LEDGE_PROBE_CLEARANCE,
            wall_hit.point.z,
        ) + direction * LEDGE_PROBE_INSET;
        let ledge_hit = world.raycast(
            ledge_origin,
            Vec3::NEG_Y,
            self.max_height + LEDGE_PROBE_CLEARANCE,
            QueryFilter::default(),
        )?;
        if ledge_hit.normal.y < MIN_LEDGE_NORMAL_Y {
            return None;
        }

        let gap = ledge_hit.point.y - feet.y;
        if gap <= MIN_LEDGE_HEIGHT || gap > self.max_height {
            return None;
        }

        let edge = Vec3::new(wall_hit.point.x, ledge_hit.point.y, wall_hit.point.z);
        let landing_feet = edge + direction * (body.radius() + LANDING_EDGE_OFFSET);
        let landing = landing_feet + Vec3::Y * (stand_height * 0.5 + LANDING_LIFT);

        let clearance = Capsule::new(landing, stand_height, body.radius());
        if !world
            .overlap_capsule(&clearance, QueryFilter::excluding(wall_hit.collider))
            .is_empty()
        {
            return None;
        }

        Some(MantleTarget {
            landing,
            ledge_point: edge,
            wall: wall_hit.collider,
        })
    }
}

/// Three-point quadratic Bézier from the entry position to the landing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MantlePath {
    pub start: Vec3,
    pub peak: Vec3,
    pub end: Vec3,
}

impl MantlePath {
    /// Control point: the horizontal midpoint raised above the start by
    /// `max(1.5, height_delta + 0.5)`.
    pub fn new(start: Vec3, end: Vec3) -> Self {
        let mid = (start + end) * 0.5;
        let rise = MIN_ARC_RISE.max(end.y - start.y + ARC_HEADROOM);
        Self {
            start,
            peak: Vec3::new(mid.x, start.y + rise, mid.z),
            end,
        }
    }

    /// Position at curve parameter `t` in `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.start * (u * u) + self.peak * (2.0 * u * t) + self.end * (t * t)
    }
}
