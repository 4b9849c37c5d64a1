//! Ground Sensor
//!
//! Grounded is derived fresh every tick from two independent queries:
//!
//! 1. A downward ray from the capsule center, reaching `check_distance` past the feet.
//! 2. A sphere overlap at the bottom of the capsule. Every overlapping collider is
//!    re-validated with its own short downward ray at the contact point, starting
//!    `check_distance` above the feet.
//!
//! Both only accept surfaces within `max_ground_angle` of up. The ray alone misses
//! thin ledges under the edge of the capsule; the overlap alone reports steep walls
//! as ground, which the per-candidate ray rejects.

use glam::Vec3;

use super::body::KinematicBody;
use super::config::GroundConfig;
use crate::physics::{CollisionWorld, QueryFilter, RayHit};

/// Horizontal nudge from the overlap contact toward the candidate collider so the
/// validation ray lands on its top face instead of grazing an edge.
const CANDIDATE_NUDGE: f32 = 0.01;

/// Outcome of one sensor pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundProbe {
    /// Center ray hit, if it found walkable ground.
    pub ray_hit: Option<RayHit>,
    /// First overlap candidate whose validation ray found walkable ground.
    pub overlap_hit: Option<RayHit>,
}

impl GroundProbe {
    pub fn is_grounded(&self) -> bool {
        self.ray_hit.is_some() || self.overlap_hit.is_some()
    }

    /// Best available ground contact, preferring the center ray.
    pub fn hit(&self) -> Option<RayHit> {
        self.ray_hit.or(self.overlap_hit)
    }
}

/// Dual-query ground detector.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundSensor {
    check_distance: f32,
    max_ground_angle: f32,
    overlap_radius_scale: f32,
}

impl GroundSensor {
    pub fn new(config: &GroundConfig) -> Self {
        Self {
            check_distance: config.check_distance,
            max_ground_angle: config.max_ground_angle,
            overlap_radius_scale: config.overlap_radius_scale,
        }
    }

    /// Whether a surface normal is flat enough to stand on.
    pub fn is_walkable(&self, normal: Vec3) -> bool {
        normal.length_squared() > 1e-8
            && normal.angle_between(Vec3::Y).to_degrees() <= self.max_ground_angle
    }

    /// Run both queries.
    pub fn probe(&self, world: &dyn CollisionWorld, body: &KinematicBody) -> GroundProbe {
        GroundProbe {
            ray_hit: self.center_ray(world, body),
            overlap_hit: self.overlap_check(world, body),
        }
    }

    pub fn is_grounded(&self, world: &dyn CollisionWorld, body: &KinematicBody) -> bool {
        // Short-circuit: the overlap pass is only needed when the ray misses.
        self.center_ray(world, body).is_some() || self.overlap_check(world, body).is_some()
    }

    fn center_ray(&self, world: &dyn CollisionWorld, body: &KinematicBody) -> Option<RayHit> {
        let max_distance = body.height() * 0.5 + self.check_distance;
        world
            .raycast(body.position, Vec3::NEG_Y, max_distance, QueryFilter::default())
            .filter(|hit| self.is_walkable(hit.normal))
    }

    fn overlap_check(&self, world: &dyn CollisionWorld, body: &KinematicBody) -> Option<RayHit> {
        let radius = body.radius() * self.overlap_radius_scale;
        if radius <= 0.0 {
            return None;
        }
        // Sphere sits inside the bottom cap, poking `check_distance` below the feet.
        let feet = body.feet();
        let center = feet + Vec3::Y * (radius - self.check_distance);
        // Validation rays only see surfaces within `check_distance` of the feet,
        // so the top of a wall beside the capsule never counts.
        let probe_top = feet.y + self.check_distance;
        let probe_length = self.check_distance * 2.0;

        for id in world.overlap_sphere(center, radius, QueryFilter::default()) {
            let Some(contact) = world.closest_point(id, center) else {
                continue;
            };
            let toward = Vec3::new(contact.x - center.x, 0.0, contact.z - center.z)
                .normalize_or_zero();
            let origin = Vec3::new(contact.x, probe_top, contact.z) + toward * CANDIDATE_NUDGE;

            if let Some(hit) = world.raycast_collider(id, origin, Vec3::NEG_Y, probe_length) {
                if self.is_walkable(hit.normal) && hit.point.y <= probe_top {
                    return Some(hit);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::StaticWorld;

    fn sensor() -> GroundSensor {
        GroundSensor::new(&GroundConfig::default())
    }

    fn body_at_feet(feet: Vec3) -> KinematicBody {
        KinematicBody::standing_at(feet, 1.8, 0.35, 0.15)
    }

    #[test]
    fn test_grounded_on_flat_floor() {
        let mut world = StaticWorld::new();
        world.add_ground(0.0);
        let probe = sensor().probe(&world, &body_at_feet(Vec3::new(0.0, 0.01, 0.0)));
        assert!(probe.ray_hit.is_some());
        assert!(probe.is_grounded());
    }

    #[test]
    fn test_airborne_above_floor() {
        let mut world = StaticWorld::new();
        world.add_ground(0.0);
        assert!(!sensor().is_grounded(&world, &body_at_feet(Vec3::new(0.0, 0.5, 0.0))));
    }

    #[test]
    fn test_overlap_catches_ledge_the_ray_misses() {
        let mut world = StaticWorld::new();
        // Platform edge at x = 0; body center hangs 0.2m past the edge.
        world.add_box_corners(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(0.0, 0.0, 5.0));
        let body = body_at_feet(Vec3::new(0.2, 0.01, 0.0));
        let probe = sensor().probe(&world, &body);
        assert!(probe.ray_hit.is_none());
        assert!(probe.overlap_hit.is_some());
        assert!(probe.is_grounded());
    }

    #[test]
    fn test_steep_wall_is_not_ground() {
        let mut world = StaticWorld::new();
        // Tall wall touching the capsule side, nothing underneath.
        world.add_box_corners(Vec3::new(0.3, -5.0, -5.0), Vec3::new(2.0, 5.0, 5.0));
        let body = body_at_feet(Vec3::new(0.0, 0.0, 0.0));
        assert!(!sensor().is_grounded(&world, &body));
    }

    #[test]
    fn test_block_edge_above_feet_is_not_ground() {
        let mut world = StaticWorld::new();
        world.add_ground(0.0);
        // 1.2m block, near face at z = -10. The bottom cap presses into its top
        // edge from the side, feet 0.2m below the top face.
        world.add_box_corners(Vec3::new(-5.0, 0.0, -20.0), Vec3::new(5.0, 1.2, -10.0));
        let body = body_at_feet(Vec3::new(0.0, 1.0, -9.7));

        let sphere_center = body.feet() + Vec3::Y * 0.165;
        let touching = world.overlap_sphere(sphere_center, 0.315, QueryFilter::default());
        assert!(!touching.is_empty());
        let probe = sensor().probe(&world, &body);
        assert!(probe.overlap_hit.is_none());
        assert!(!probe.is_grounded());
    }

    #[test]
    fn test_walkable_angle_limit() {
        let s = sensor();
        assert!(s.is_walkable(Vec3::Y));
        assert!(s.is_walkable(Vec3::new(0.0, 1.0, 0.99).normalize()));
        assert!(!s.is_walkable(Vec3::new(0.0, 1.0, 1.1).normalize()));
        assert!(!s.is_walkable(Vec3::ZERO));
    }
}
