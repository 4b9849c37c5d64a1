//! Collision primitives
//!
//! Shape-level tests used by the static collision world. Every static collider is an
//! axis-aligned box; the character is a Y-aligned capsule.
//!
//! # Ray-AABB Intersection
//!
//! The slab method is used for ray-AABB intersection, which finds the
//! intersection points by computing entry and exit times for each axis.
//!
//! # Capsule-AABB Distance
//!
//! The distance from a point moving along a segment to a convex box is a convex
//! function of the segment parameter, so the closest pair is found with a ternary
//! search over `[0, 1]`.
//!
//! # Example
//!
//! ```ignore
//! use stride_engine::physics::collision::{Aabb, ray_aabb_intersect};
//! use glam::Vec3;
//!
//! let wall = Aabb::new(Vec3::new(-1.0, 0.0, -3.0), Vec3::new(1.0, 2.0, -2.0));
//! if let Some(t) = ray_aabb_intersect(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, wall.min, wall.max) {
//!     let hit_point = Vec3::new(0.0, 1.0, -t);
//! }
//! ```

use glam::Vec3;

/// Iterations for the segment/box ternary search. 40 halvings of (2/3)^n is far below
/// the skin width used by the move primitive.
const SEGMENT_SEARCH_ITERATIONS: usize = 40;

/// An axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two corners. The corners may be given in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box from its center and half extents.
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Closest point on or inside the box to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Squared distance from `point` to the box (zero when inside).
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        self.closest_point(point).distance_squared(point)
    }

    /// Whether a sphere touches or penetrates the box.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.distance_squared(center) <= radius * radius
    }

    /// Cast a ray against the box and return the entry distance and surface normal.
    ///
    /// `dir` must be normalized. Hits farther than `max_distance` are rejected.
    pub fn ray_cast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        let t = ray_aabb_intersect(origin, dir, self.min, self.max)?;
        if t > max_distance {
            return None;
        }
        let point = origin + dir * t;
        Some((t, aabb_surface_normal(point, self.min, self.max)))
    }
}

/// Performs ray-AABB intersection using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let dir = ray_dir[axis];
        let (lo, hi) = (aabb_min[axis], aabb_max[axis]);

        if dir.abs() < 1e-10 {
            // Parallel to this slab: must already be between the planes.
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Computes the outward surface normal for a point on an AABB surface.
///
/// Picks the face whose normalized coordinate has the largest magnitude.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Y-aligned capsule described by its center, total height and radius.
///
/// Height includes both hemispherical caps, so the inner segment spans
/// `height - 2 * radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub center: Vec3,
    pub height: f32,
    pub radius: f32,
}

impl Capsule {
    pub fn new(center: Vec3, height: f32, radius: f32) -> Self {
        Self {
            center,
            height,
            radius,
        }
    }

    /// Half length of the inner segment (zero for a sphere-like capsule).
    pub fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }

    /// Endpoints of the inner segment, bottom first.
    pub fn segment(&self) -> (Vec3, Vec3) {
        let h = self.half_segment();
        (self.center - Vec3::Y * h, self.center + Vec3::Y * h)
    }

    pub fn bottom(&self) -> Vec3 {
        self.center - Vec3::Y * (self.height * 0.5)
    }

    pub fn top(&self) -> Vec3 {
        self.center + Vec3::Y * (self.height * 0.5)
    }

    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            center: self.center + delta,
            ..*self
        }
    }

    /// Bounding box of the capsule, inflated by `margin`.
    pub fn bounds(&self, margin: f32) -> Aabb {
        let half = Vec3::new(self.radius, self.height * 0.5, self.radius) + Vec3::splat(margin);
        Aabb::from_center(self.center, half)
    }
}

/// Closest points between a segment `a..b` and a box.
///
/// Returns `(point_on_segment, point_on_box)`.
pub fn closest_segment_aabb(a: Vec3, b: Vec3, aabb: &Aabb) -> (Vec3, Vec3) {
    let dist = |t: f32| {
        let p = a.lerp(b, t);
        aabb.distance_squared(p)
    };

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    if a.distance_squared(b) > 1e-12 {
        for _ in 0..SEGMENT_SEARCH_ITERATIONS {
            let m1 = lo + (hi - lo) / 3.0;
            let m2 = hi - (hi - lo) / 3.0;
            if dist(m1) <= dist(m2) {
                hi = m2;
            } else {
                lo = m1;
            }
        }
    }

    let on_segment = a.lerp(b, (lo + hi) * 0.5);
    (on_segment, aabb.closest_point(on_segment))
}

/// Whether a capsule touches or penetrates a box.
pub fn capsule_intersects_aabb(capsule: &Capsule, aabb: &Aabb) -> bool {
    let (a, b) = capsule.segment();
    let (p, q) = closest_segment_aabb(a, b, aabb);
    p.distance_squared(q) < capsule.radius * capsule.radius
}

/// Minimum translation that pushes a capsule out of a box.
///
/// Returns `None` when the shapes do not overlap. The returned normal points from the
/// box toward the capsule.
pub fn capsule_aabb_penetration(capsule: &Capsule, aabb: &Aabb) -> Option<(Vec3, f32)> {
    let (a, b) = capsule.segment();
    let (p, q) = closest_segment_aabb(a, b, aabb);
    let offset = p - q;
    let dist_sq = offset.length_squared();

    if dist_sq >= capsule.radius * capsule.radius {
        return None;
    }

    if dist_sq > 1e-10 {
        let dist = dist_sq.sqrt();
        return Some((offset / dist, capsule.radius - dist));
    }

    // Segment point is inside the box: push out along the shallowest face.
    let center = aabb.center();
    let half = aabb.half_extents();
    let local = p - center;
    let mut best_axis = 0;
    let mut best_depth = f32::MAX;
    for axis in 0..3 {
        let depth = half[axis] - local[axis].abs();
        if depth < best_depth {
            best_depth = depth;
            best_axis = axis;
        }
    }
    let mut normal = Vec3::ZERO;
    normal[best_axis] = if local[best_axis] >= 0.0 { 1.0 } else { -1.0 };
    Some((normal, best_depth + capsule.radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_ray_hits_aabb_from_front() {
        let t = ray_aabb_intersect(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!((t.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_aabb() {
        let t = ray_aabb_intersect(
            Vec3::new(3.0, 0.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_ray_aabb_behind_origin() {
        let t = ray_aabb_intersect(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_axis_parallel_ray_outside_slab_misses() {
        // Straight down, but beside the box.
        let t = ray_aabb_intersect(
            Vec3::new(1.5, 5.0, 0.0),
            Vec3::NEG_Y,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_ray_cast_reports_top_normal() {
        let (t, n) = unit_box()
            .ray_cast(Vec3::new(0.2, 3.0, 0.1), Vec3::NEG_Y, 10.0)
            .unwrap();
        assert!((t - 2.0).abs() < 1e-5);
        assert_eq!(n, Vec3::Y);
    }

    #[test]
    fn test_ray_cast_respects_max_distance() {
        assert!(unit_box()
            .ray_cast(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y, 1.5)
            .is_none());
    }

    #[test]
    fn test_surface_normal_x_face() {
        let n = aabb_surface_normal(Vec3::new(1.0, 0.2, -0.3), Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(n, Vec3::X);
    }

    #[test]
    fn test_sphere_overlap() {
        let b = unit_box();
        assert!(b.intersects_sphere(Vec3::new(0.0, 1.4, 0.0), 0.5));
        assert!(!b.intersects_sphere(Vec3::new(0.0, 1.6, 0.0), 0.5));
    }

    #[test]
    fn test_capsule_resting_on_box_does_not_penetrate() {
        // Capsule bottom exactly 1cm above the box top.
        let capsule = Capsule::new(Vec3::new(0.0, 1.0 + 0.9 + 0.01, 0.0), 1.8, 0.4);
        assert!(!capsule_intersects_aabb(&capsule, &unit_box()));
        assert!(capsule_aabb_penetration(&capsule, &unit_box()).is_none());
    }

    #[test]
    fn test_capsule_penetration_pushes_up_out_of_floor() {
        let capsule = Capsule::new(Vec3::new(0.0, 1.0 + 0.9 - 0.1, 0.0), 1.8, 0.4);
        let (normal, depth) = capsule_aabb_penetration(&capsule, &unit_box()).unwrap();
        assert!((normal - Vec3::Y).length() < 1e-3);
        assert!((depth - 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_capsule_penetration_pushes_sideways_out_of_wall() {
        let capsule = Capsule::new(Vec3::new(1.3, 0.0, 0.0), 1.8, 0.4);
        let (normal, depth) = capsule_aabb_penetration(&capsule, &unit_box()).unwrap();
        assert!((normal - Vec3::X).length() < 1e-3);
        assert!((depth - 0.1).abs() < 1e-3);
    }
}
