//! Ray representation for 3D ray tracing.
//!
//! A ray is defined as r(t) = origin + t * unit_direction, representing a
//! semi-infinite line in 3D space used for intersection testing.

use glam::Vec3A;

/// Ray in 3D space defined by origin and direction.
///
/// The direction is kept exactly as given; every distance reported by the
/// intersection routines is measured along the derived unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// The camera position for primary rays, or a biased surface point for
    /// shadow and reflection rays.
    pub origin: Vec3A,

    /// Direction vector of the ray, not required to be unit length.
    pub direction: Vec3A,

    /// `direction` normalized once at construction.
    ///
    /// A zero-length direction yields NaN components, which simply make every
    /// intersection test fail.
    pub unit_direction: Vec3A,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction,
            unit_direction: direction.normalize(),
        }
    }

    /// Compute the point at distance t along the ray.
    ///
    /// Returns r(t) = origin + t * unit_direction.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.unit_direction
    }
}
