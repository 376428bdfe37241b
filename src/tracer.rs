//! Whitted ray tracer over an octree-indexed scene.
//!
//! Sphere candidates come from the octree, planes are tested on every ray,
//! and the smallest non-negative distance wins.

use crate::hittable::{HitRecord, Hittable};
use crate::integrator::Integrator;
use crate::interval::Interval;
use crate::octree::Octree;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::sphere::Sphere;

/// Analytic intersection strategy.
///
/// Borrows the scene and a prebuilt octree over `scene.spheres`; both stay
/// read-only for the whole render.
pub struct RayTracer<'a> {
    scene: &'a Scene,
    octree: &'a Octree,
}

impl<'a> RayTracer<'a> {
    /// Create a tracer. The octree root must cover every indexed sphere, or
    /// spheres outside it may be culled.
    pub fn new(scene: &'a Scene, octree: &'a Octree) -> Self {
        Self { scene, octree }
    }

    /// The spatial index in use.
    pub fn octree(&self) -> &Octree {
        self.octree
    }

    /// Nearest hit among the octree candidates and the scene planes.
    pub fn find_nearest_hit(&self, ray: &Ray) -> Option<HitRecord> {
        let mut candidates: Vec<&Sphere> = Vec::new();
        self.octree.query(ray, &mut candidates);

        let mut temp_rec = HitRecord::default();
        let mut nearest = None;
        let mut closest_so_far = f32::INFINITY;

        let objects = candidates
            .into_iter()
            .map(|s| s as &dyn Hittable)
            .chain(self.scene.planes.iter().map(|p| p as &dyn Hittable));

        for object in objects {
            if object.hit(ray, Interval::new(0.0, closest_so_far), &mut temp_rec)
                && temp_rec.distance < closest_so_far
            {
                closest_so_far = temp_rec.distance;
                nearest = Some(temp_rec);
            }
        }

        nearest
    }
}

impl Integrator for RayTracer<'_> {
    fn scene(&self) -> &Scene {
        self.scene
    }

    fn nearest_hit(&self, ray: &Ray) -> Option<HitRecord> {
        self.find_nearest_hit(ray)
    }
}
