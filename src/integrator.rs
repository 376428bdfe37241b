//! Recursive Whitted shading shared by every visibility strategy.
//!
//! A strategy only decides how the nearest surface along a ray is found;
//! shadow testing, the diffuse term and the mirror reflection chain are the
//! same for all of them and live in the provided methods of [`Integrator`].

use glam::Vec3A;
use serde::Deserialize;

use crate::hittable::HitRecord;
use crate::material::{reflect, Color};
use crate::ray::Ray;
use crate::scene::Scene;

/// Deepest recursion level that is still shaded. A call at a greater depth
/// returns the background, so a primary ray spawns at most four reflections.
pub const MAX_RECURSION_DEPTH: u32 = 4;

/// A complete shading strategy for one scene.
///
/// Implementations must be shareable across the render thread pool.
pub trait Integrator: Sync {
    /// The scene being rendered.
    fn scene(&self) -> &Scene;

    /// Nearest surface along `ray`, or `None` if the ray escapes.
    fn nearest_hit(&self, ray: &Ray) -> Option<HitRecord>;

    /// True if anything at all lies between the biased surface point and
    /// infinity in the light direction. Occluders beyond the light count too.
    fn in_shadow(&self, position: Vec3A, normal: Vec3A, light_dir: Vec3A) -> bool {
        let origin = position + normal * self.scene().bias;
        self.nearest_hit(&Ray::new(origin, light_dir)).is_some()
    }

    /// Color seen along `ray` at recursion level `depth` (0 for primary rays).
    ///
    /// Shadowed points are black: there is no ambient term. The result is not
    /// clamped.
    fn shade(&self, ray: &Ray, depth: u32) -> Color {
        let scene = self.scene();
        if depth > MAX_RECURSION_DEPTH {
            return scene.background;
        }

        let Some(hit) = self.nearest_hit(ray) else {
            return scene.background;
        };

        let light_dir = (scene.light.position - hit.position).normalize();
        let shadowed = self.in_shadow(hit.position, hit.normal, light_dir);
        let diffuse = hit.normal.dot(light_dir).max(0.0);

        if shadowed {
            return Color::ZERO;
        }

        let reflected = Ray::new(
            hit.position + hit.normal * scene.bias,
            reflect(ray.unit_direction, hit.normal).normalize(),
        );
        let reflected_color = self.shade(&reflected, depth + 1);

        hit.material.color * diffuse + reflected_color * hit.material.reflectivity
    }
}

/// Which integrator renders the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Analytic intersection against octree candidates.
    #[default]
    Trace,
    /// Sphere tracing through the scene's signed distance field.
    March,
}

impl Strategy {
    /// Short name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "ray tracing",
            Self::March => "ray marching",
        }
    }
}
