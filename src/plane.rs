//! Infinite plane primitive.
//!
//! Planes are one-sided: rays travelling along the normal (away from the front
//! face) never hit them.

use glam::Vec3A;
use crate::ray::Ray;
use crate::hittable::{Hittable, HitRecord};
use crate::interval::Interval;
use crate::material::Material;

/// Plane through `point` with front-face `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane.
    pub point: Vec3A,
    /// Front-face normal, expected to be unit length.
    pub normal: Vec3A,
    /// Material used when the plane is hit.
    pub material: Material,
}

impl Plane {
    /// Create a plane from a point and a normal.
    pub fn new(point: Vec3A, normal: Vec3A, material: Material) -> Self {
        Self {
            point,
            normal,
            material,
        }
    }

    /// Plane through three points, with the normal from `(a - b) x (c - b)`.
    pub fn from_points(a: Vec3A, b: Vec3A, c: Vec3A, material: Material) -> Self {
        let normal = (a - b).cross(c - b).normalize();
        Self::new(a, normal, material)
    }

    /// Signed distance from `p`: positive on the front side.
    pub fn signed_distance(&self, p: Vec3A) -> f32 {
        (p - self.point).dot(self.normal)
    }
}

impl Hittable for Plane {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let s = r.unit_direction.dot(self.normal);
        if s > 0.0 {
            return false;
        }

        // A parallel ray divides by zero; the resulting infinity or NaN is
        // rejected along with negative distances.
        let t = (self.point - r.origin).dot(self.normal) / s;
        if !t.is_finite() || !ray_t.contains(t) {
            return false;
        }

        rec.distance = t;
        rec.position = r.at(t);
        rec.normal = self.normal;
        rec.material = self.material;

        true
    }
}
