//! Physics module
//!
//! Collision geometry for the locomotion core. Built from scratch without an
//! external physics library: static boxes, a Y-aligned character capsule and the
//! queries the locomotion states need.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//!
//! # Submodules
//!
//! - [`collision`] - Ray/sphere/capsule tests against axis-aligned boxes
//! - [`world`] - The [`CollisionWorld`] query trait and the box-based [`StaticWorld`]

pub mod collision;
pub mod world;

pub use collision::{Aabb, Capsule, aabb_surface_normal, ray_aabb_intersect};
pub use world::{
    CollisionWorld, ColliderId, Contact, MoveResult, QueryFilter, RayHit, StaticWorld,
};
