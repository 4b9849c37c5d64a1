//! Static collision world
//!
//! [`CollisionWorld`] is the geometry collaborator the locomotion core queries every
//! tick: rays, overlaps and a "move by delta, resolve penetration" primitive.
//! [`StaticWorld`] implements it for a list of axis-aligned boxes, which is all the
//! headless simulation and the tests need.
//!
//! # Example
//!
//! ```ignore
//! use stride_engine::physics::{StaticWorld, CollisionWorld, QueryFilter};
//! use glam::Vec3;
//!
//! let mut world = StaticWorld::new();
//! world.add_ground(0.0);
//! let hit = world.raycast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 5.0, QueryFilter::default());
//! assert!(hit.is_some());
//! ```

use glam::Vec3;

use super::collision::{Aabb, Capsule, capsule_aabb_penetration, capsule_intersects_aabb};

/// Separation kept after pushing a capsule out of a collider.
pub const CONTACT_SKIN: f32 = 1.0e-4;

/// Penetration resolution passes per substep (handles corners).
const MAX_RESOLVE_ITERATIONS: usize = 4;

/// Upper bound on move substeps for very large deltas.
const MAX_SUBSTEPS: usize = 16;

/// Contacts whose normal has at least this much +Y count as floor contacts.
const FLOOR_NORMAL_Y: f32 = 0.7;

/// Contacts whose normal has at most this much -Y count as ceiling contacts.
const CEILING_NORMAL_Y: f32 = -0.7;

/// Stable handle to a collider inside a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// Result of a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub collider: ColliderId,
    /// World-space hit position.
    pub point: Vec3,
    /// Outward surface normal at the hit position.
    pub normal: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
}

impl RayHit {
    /// Angle between the hit surface and world up, in degrees.
    pub fn surface_angle_deg(&self) -> f32 {
        self.normal.angle_between(Vec3::Y).to_degrees()
    }
}

/// Narrows which colliders a query considers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub exclude: Option<ColliderId>,
}

impl QueryFilter {
    /// Ignore one collider (e.g. the wall a mantle probe just hit).
    pub fn excluding(id: ColliderId) -> Self {
        Self { exclude: Some(id) }
    }

    pub fn accepts(&self, id: ColliderId) -> bool {
        self.exclude != Some(id)
    }
}

/// One collider the move primitive pushed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub collider: ColliderId,
    /// Push-out direction, pointing from the collider toward the capsule.
    pub normal: Vec3,
}

/// Output of [`CollisionWorld::move_and_slide`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveResult {
    /// Final capsule center.
    pub position: Vec3,
    /// Contacts encountered while resolving, deduplicated per collider.
    pub contacts: Vec<Contact>,
}

impl MoveResult {
    pub fn hit_floor(&self) -> bool {
        self.contacts.iter().any(|c| c.normal.y >= FLOOR_NORMAL_Y)
    }

    pub fn hit_ceiling(&self) -> bool {
        self.contacts.iter().any(|c| c.normal.y <= CEILING_NORMAL_Y)
    }

    /// Remove the parts of `velocity` that point into any contact.
    pub fn clip_velocity(&self, mut velocity: Vec3) -> Vec3 {
        for contact in &self.contacts {
            let into = velocity.dot(contact.normal);
            if into < 0.0 {
                velocity -= contact.normal * into;
            }
        }
        velocity
    }

    /// Like [`clip_velocity`](Self::clip_velocity) but keeps motion into floor
    /// contacts, so a body resting or landing on the ground keeps its downward
    /// velocity for the ground sensor and landing impact.
    pub fn clip_velocity_except_floor(&self, mut velocity: Vec3) -> Vec3 {
        for contact in self.contacts.iter().filter(|c| c.normal.y < FLOOR_NORMAL_Y) {
            let into = velocity.dot(contact.normal);
            if into < 0.0 {
                velocity -= contact.normal * into;
            }
        }
        velocity
    }
}

/// Geometry queries consumed by the locomotion core.
///
/// All directions passed in must be normalized.
pub trait CollisionWorld {
    /// Nearest hit along a ray.
    fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32, filter: QueryFilter)
    -> Option<RayHit>;

    /// Ray against a single collider.
    fn raycast_collider(
        &self,
        id: ColliderId,
        origin: Vec3,
        dir: Vec3,
        max_distance: f32,
    ) -> Option<RayHit>;

    /// Closest point on a collider to `point`.
    fn closest_point(&self, id: ColliderId, point: Vec3) -> Option<Vec3>;

    /// Colliders touching a sphere.
    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: QueryFilter) -> Vec<ColliderId>;

    /// Colliders touching a capsule.
    fn overlap_capsule(&self, capsule: &Capsule, filter: QueryFilter) -> Vec<ColliderId>;

    /// Move a capsule by `delta`, resolving penetration along the way.
    fn move_and_slide(&self, capsule: &Capsule, delta: Vec3, filter: QueryFilter) -> MoveResult;
}

#[derive(Debug, Clone, Copy)]
struct StaticCollider {
    id: ColliderId,
    bounds: Aabb,
}

/// Immutable-after-build set of box colliders.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    colliders: Vec<StaticCollider>,
    next_id: u32,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a box and return its handle.
    pub fn add_box(&mut self, bounds: Aabb) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.colliders.push(StaticCollider { id, bounds });
        id
    }

    /// Insert a box given its two corners.
    pub fn add_box_corners(&mut self, a: Vec3, b: Vec3) -> ColliderId {
        self.add_box(Aabb::new(a, b))
    }

    /// Insert a large 1m-thick slab whose top surface is at `top_y`.
    pub fn add_ground(&mut self, top_y: f32) -> ColliderId {
        self.add_box_corners(
            Vec3::new(-500.0, top_y - 1.0, -500.0),
            Vec3::new(500.0, top_y, 500.0),
        )
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn bounds(&self, id: ColliderId) -> Option<Aabb> {
        self.colliders.iter().find(|c| c.id == id).map(|c| c.bounds)
    }

    fn resolve_penetration(&self, capsule: &mut Capsule, filter: QueryFilter, contacts: &mut Vec<Contact>) {
        for _ in 0..MAX_RESOLVE_ITERATIONS {
            let mut pushed = false;
            let region = capsule.bounds(CONTACT_SKIN);

            for collider in &self.colliders {
                if !filter.accepts(collider.id) || !aabb_overlaps(&region, &collider.bounds) {
                    continue;
                }
                if let Some((normal, depth)) = capsule_aabb_penetration(capsule, &collider.bounds) {
                    capsule.center += normal * (depth + CONTACT_SKIN);
                    pushed = true;
                    match contacts.iter_mut().find(|c| c.collider == collider.id) {
                        Some(existing) => existing.normal = normal,
                        None => contacts.push(Contact {
                            collider: collider.id,
                            normal,
                        }),
                    }
                }
            }

            if !pushed {
                break;
            }
        }
    }
}

fn aabb_overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.min.cmple(b.max).all() && a.max.cmpge(b.min).all()
}

impl CollisionWorld for StaticWorld {
    fn raycast(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for collider in self.colliders.iter().filter(|c| filter.accepts(c.id)) {
            if let Some((distance, normal)) = collider.bounds.ray_cast(origin, dir, max_distance) {
                if best.is_none_or(|b| distance < b.distance) {
                    best = Some(RayHit {
                        collider: collider.id,
                        point: origin + dir * distance,
                        normal,
                        distance,
                    });
                }
            }
        }
        best
    }

    fn raycast_collider(
        &self,
        id: ColliderId,
        origin: Vec3,
        dir: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        let bounds = self.bounds(id)?;
        let (distance, normal) = bounds.ray_cast(origin, dir, max_distance)?;
        Some(RayHit {
            collider: id,
            point: origin + dir * distance,
            normal,
            distance,
        })
    }

    fn closest_point(&self, id: ColliderId, point: Vec3) -> Option<Vec3> {
        self.bounds(id).map(|b| b.closest_point(point))
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: QueryFilter) -> Vec<ColliderId> {
        self.colliders
            .iter()
            .filter(|c| filter.accepts(c.id) && c.bounds.intersects_sphere(center, radius))
            .map(|c| c.id)
            .collect()
    }

    fn overlap_capsule(&self, capsule: &Capsule, filter: QueryFilter) -> Vec<ColliderId> {
        self.colliders
            .iter()
            .filter(|c| filter.accepts(c.id) && capsule_intersects_aabb(capsule, &c.bounds))
            .map(|c| c.id)
            .collect()
    }

    fn move_and_slide(&self, capsule: &Capsule, delta: Vec3, filter: QueryFilter) -> MoveResult {
        let mut moving = *capsule;
        let mut contacts = Vec::new();

        // Keep each substep under half a radius so thin walls cannot be tunneled.
        let max_step = (capsule.radius * 0.5).max(0.01);
        let steps = ((delta.length() / max_step).ceil() as usize).clamp(1, MAX_SUBSTEPS);
        let step = delta / steps as f32;

        for _ in 0..steps {
            moving.center += step;
            self.resolve_penetration(&mut moving, filter, &mut contacts);
        }

        MoveResult {
            position: moving.center,
            contacts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_wall() -> (StaticWorld, ColliderId, ColliderId) {
        let mut world = StaticWorld::new();
        let ground = world.add_ground(0.0);
        let wall = world.add_box_corners(Vec3::new(-5.0, 0.0, -3.0), Vec3::new(5.0, 3.0, -2.0));
        (world, ground, wall)
    }

    #[test]
    fn test_raycast_returns_nearest_hit() {
        let (world, ground, _) = world_with_wall();
        let hit = world
            .raycast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 10.0, QueryFilter::default())
            .unwrap();
        assert_eq!(hit.collider, ground);
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!(hit.surface_angle_deg() < 1.0);
    }

    #[test]
    fn test_raycast_filter_skips_excluded_collider() {
        let (world, _, wall) = world_with_wall();
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let hit = world.raycast(origin, Vec3::NEG_Z, 10.0, QueryFilter::default());
        assert_eq!(hit.unwrap().collider, wall);
        assert!(world
            .raycast(origin, Vec3::NEG_Z, 10.0, QueryFilter::excluding(wall))
            .is_none());
    }

    #[test]
    fn test_wall_normal_is_ninety_degrees_from_up() {
        let (world, _, wall) = world_with_wall();
        let hit = world
            .raycast_collider(wall, Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, 10.0)
            .unwrap();
        assert!((hit.surface_angle_deg() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_overlap_sphere_finds_ground() {
        let (world, ground, _) = world_with_wall();
        let hits = world.overlap_sphere(Vec3::new(0.0, 0.2, 0.0), 0.3, QueryFilter::default());
        assert_eq!(hits, vec![ground]);
    }

    #[test]
    fn test_move_and_slide_stops_at_wall() {
        let (world, _, _) = world_with_wall();
        let capsule = Capsule::new(Vec3::new(0.0, 0.91, 0.0), 1.8, 0.4);
        let result = world.move_and_slide(&capsule, Vec3::new(0.0, 0.0, -3.0), QueryFilter::default());
        // Wall face at z = -2, radius 0.4.
        assert!(result.position.z > -1.61, "tunneled to {}", result.position.z);
        assert!(result.position.z < -1.5);
        assert!(!result.contacts.is_empty());
        let clipped = result.clip_velocity(Vec3::new(1.0, 0.0, -5.0));
        assert!(clipped.z.abs() < 1e-3);
        assert!((clipped.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_move_and_slide_lands_on_floor() {
        let (world, _, _) = world_with_wall();
        let capsule = Capsule::new(Vec3::new(0.0, 1.0, 0.0), 1.8, 0.4);
        let result = world.move_and_slide(&capsule, Vec3::new(0.0, -0.5, 0.0), QueryFilter::default());
        assert!((result.position.y - 0.9).abs() < 1e-3);
        assert!(result.hit_floor());
        assert!(!result.hit_ceiling());
        let kept = result.clip_velocity_except_floor(Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(kept, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(result.clip_velocity(Vec3::new(0.0, -5.0, 0.0)).y, 0.0);
    }

    #[test]
    fn test_move_and_slide_without_geometry_moves_fully() {
        let world = StaticWorld::new();
        let capsule = Capsule::new(Vec3::ZERO, 1.8, 0.4);
        let result = world.move_and_slide(&capsule, Vec3::new(1.0, 2.0, 3.0), QueryFilter::default());
        assert!((result.position - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
        assert!(result.contacts.is_empty());
    }
}
