//! Ray-object intersection system.
//!
//! Defines the Hittable trait for geometric primitives and HitRecord for
//! storing intersection data.

use glam::Vec3A;
use crate::ray::Ray;
use crate::interval::Interval;
use crate::material::Material;

/// Ray-object intersection information.
///
/// Overwritten by every test; only meaningful when the test reported a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point where the ray intersects the object
    pub position: Vec3A,
    /// Outward surface normal at the intersection point (unit vector)
    pub normal: Vec3A,
    /// Distance along the ray's unit direction to the intersection point
    pub distance: f32,
    /// Material of the object at the hit point
    pub material: Material,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            position: Vec3A::ZERO,
            normal: Vec3A::ZERO,
            distance: f32::INFINITY,
            material: Material::default(),
        }
    }
}

/// Trait for objects that can be intersected by rays.
///
/// Must be thread-safe (Sync + Send) since every pixel of a render is
/// evaluated on the rayon pool.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection with a distance inside `ray_t`.
    ///
    /// Returns true if hit, updating the hit record with intersection details.
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}
