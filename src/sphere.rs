//! Sphere primitive.
//!
//! Ray-sphere intersection uses the closest-approach construction: project the
//! center onto the ray, then step back and forth along the ray by the half
//! chord length.

use glam::Vec3A;
use crate::ray::Ray;
use crate::hittable::{Hittable, HitRecord};
use crate::interval::Interval;
use crate::material::Material;

/// Sphere primitive defined by center, radius, and material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Radius of the sphere.
    ///
    /// Stored as given. Zero or negative radii are not rejected; they behave
    /// however the intersection arithmetic makes them behave.
    pub radius: f32,

    /// Material properties used for shading.
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3A, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Signed distance from `p` to the surface: negative inside, positive outside.
    pub fn signed_distance(&self, p: Vec3A) -> f32 {
        (p - self.center).length() - self.radius
    }

    /// Surface area.
    pub fn area(&self) -> f32 {
        4.0 * std::f32::consts::PI * self.radius * self.radius
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f32 {
        4.0 / 3.0 * std::f32::consts::PI * self.radius * self.radius * self.radius
    }

    /// True if `other` lies strictly inside this sphere.
    pub fn contains_sphere(&self, other: &Sphere) -> bool {
        (other.center - self.center).length() + other.radius < self.radius
    }

    /// True if the two surfaces cross, i.e. the spheres touch without one
    /// containing the other.
    pub fn overlaps_sphere(&self, other: &Sphere) -> bool {
        if self.contains_sphere(other) || other.contains_sphere(self) {
            return false;
        }
        (other.center - self.center).length() < self.radius + other.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        // Distance along the ray to the point closest to the center
        let v = self.center - r.origin;
        let d = v.dot(r.unit_direction);

        // The center lies behind the origin. This also rejects rays starting
        // inside the sphere once they are past its center.
        if d < 0.0 {
            return false;
        }

        let squared_distance = v.dot(v) - d * d;
        let radius2 = self.radius * self.radius;
        if squared_distance > radius2 {
            return false;
        }

        let q = (radius2 - squared_distance).sqrt();
        let far = d + q;
        let near = d - q;

        // d >= 0 and q >= 0, so the far root is never negative
        let t = if near >= 0.0 { near } else { far };
        if !ray_t.contains(t) {
            return false;
        }

        rec.distance = t;
        rec.position = r.at(t);
        rec.normal = (rec.position - self.center).normalize();
        rec.material = self.material;

        true
    }
}
