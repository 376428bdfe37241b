//! Sphere-traced ray marcher.
//!
//! Steps along the ray by the distance to the closest surface until that
//! distance drops below an epsilon. The scene is scanned linearly on every
//! step; the octree is not consulted.

use glam::Vec3A;
use serde::Deserialize;

use crate::hittable::HitRecord;
use crate::integrator::Integrator;
use crate::material::Material;
use crate::plane::Plane;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::sphere::Sphere;

/// Marching limits.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarchConfig {
    /// Distance along the ray where marching starts.
    pub min_distance: f32,
    /// Travelled distance past which the ray counts as escaped.
    pub max_distance: f32,
    /// Step budget per ray.
    pub max_steps: u32,
    /// Surface distance that counts as a hit.
    pub epsilon: f32,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            min_distance: 1e-3,
            max_distance: 500.0,
            max_steps: 255,
            epsilon: 1e-4,
        }
    }
}

/// Surface a march converged on. The normal is only evaluated on a hit.
#[derive(Debug, Clone, Copy)]
enum Surface<'s> {
    Sphere(&'s Sphere),
    Plane(&'s Plane),
}

impl Surface<'_> {
    fn normal_at(self, p: Vec3A) -> Vec3A {
        match self {
            Surface::Sphere(s) => (p - s.center).normalize(),
            Surface::Plane(pl) => pl.normal,
        }
    }

    fn material(self) -> Material {
        match self {
            Surface::Sphere(s) => s.material,
            Surface::Plane(pl) => pl.material,
        }
    }
}

/// Signed distance strategy over the same scene data as the ray tracer.
pub struct RayMarcher<'a> {
    scene: &'a Scene,
    config: MarchConfig,
}

impl<'a> RayMarcher<'a> {
    /// Marcher with the default limits.
    pub fn new(scene: &'a Scene) -> Self {
        Self::with_config(scene, MarchConfig::default())
    }

    /// Marcher with explicit limits.
    pub fn with_config(scene: &'a Scene, config: MarchConfig) -> Self {
        Self { scene, config }
    }

    /// Limits in use.
    pub fn config(&self) -> MarchConfig {
        self.config
    }

    /// Minimum signed distance from `p` to any sphere or plane.
    ///
    /// Planes are one-sided: a point more than `epsilon` behind a plane does
    /// not see it, matching the ray tracer's back-face rejection.
    pub fn scene_distance(&self, p: Vec3A) -> f32 {
        self.closest(p).map_or(f32::INFINITY, |(distance, _)| distance)
    }

    fn closest(&self, p: Vec3A) -> Option<(f32, Surface<'_>)> {
        let epsilon = self.config.epsilon;
        let spheres = self
            .scene
            .spheres
            .iter()
            .map(|s| (s.signed_distance(p), Surface::Sphere(s)));
        let planes = self.scene.planes.iter().filter_map(|pl| {
            let d = pl.signed_distance(p);
            (d >= -epsilon).then_some((d, Surface::Plane(pl)))
        });

        spheres.chain(planes).fold(None, |best: Option<(f32, Surface<'_>)>, c| match best {
            Some(b) if b.0 <= c.0 => Some(b),
            _ => Some(c),
        })
    }

    /// March `ray` until it converges on a surface, leaves the marching range
    /// or runs out of steps.
    pub fn march(&self, ray: &Ray) -> Option<HitRecord> {
        let mut t = self.config.min_distance;

        for _ in 0..self.config.max_steps {
            if t > self.config.max_distance {
                return None;
            }

            let p = ray.at(t);
            let (distance, surface) = self.closest(p)?;
            if distance < self.config.epsilon {
                return Some(HitRecord {
                    position: p,
                    normal: surface.normal_at(p),
                    distance: t,
                    material: surface.material(),
                });
            }

            t += distance;
        }

        None
    }
}

impl Integrator for RayMarcher<'_> {
    fn scene(&self) -> &Scene {
        self.scene
    }

    fn nearest_hit(&self, ray: &Ray) -> Option<HitRecord> {
        self.march(ray)
    }
}
