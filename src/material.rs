//! Surface materials.
//!
//! A material is a base color plus a reflectivity coefficient that controls
//! how much of the recursively traced mirror reflection is blended in.

use glam::Vec3A;

/// RGB color in 0..255 units, unclamped during shading.
pub type Color = Vec3A;

/// Surface material shared by spheres and planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color, scaled by the diffuse term during shading.
    pub color: Color,
    /// Weight of the reflected color, expected in [0, 1].
    pub reflectivity: f32,
}

impl Material {
    /// Create a material from a color and a reflectivity coefficient.
    pub fn new(color: Color, reflectivity: f32) -> Self {
        Self {
            color,
            reflectivity,
        }
    }

    /// A perfect mirror with no color of its own.
    pub fn mirror() -> Self {
        Self::new(Color::ZERO, 1.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Color::ZERO, 0.0)
    }
}

/// Reflect a vector off a surface using the law of reflection.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}
