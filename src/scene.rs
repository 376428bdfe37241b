//! Scene description shared by every shading strategy.

use glam::Vec3A;

use crate::aabb::Aabb;
use crate::material::{Color, Material};
use crate::plane::Plane;
use crate::random::SceneRng;
use crate::sphere::Sphere;

/// Color returned for rays that escape the scene.
pub const DEFAULT_BACKGROUND: Color = Color::new(150.0, 200.0, 255.0);

/// Offset applied along the surface normal before casting secondary rays.
pub const DEFAULT_BIAS: f32 = 1e-4;

/// Point light without falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position of the light.
    pub position: Vec3A,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3A::new(10.0, 10.0, 0.0),
        }
    }
}

/// Spheres, auxiliary planes and a single light.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Every sphere of the scene.
    pub spheres: Vec<Sphere>,
    /// Planes are never indexed; they are tested on every ray.
    pub planes: Vec<Plane>,
    /// The only light source.
    pub light: PointLight,
    /// Color of rays that hit nothing.
    pub background: Color,
    /// Self-intersection bias for shadow and reflection rays.
    pub bias: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            spheres: Vec::new(),
            planes: Vec::new(),
            light: PointLight::default(),
            background: DEFAULT_BACKGROUND,
            bias: DEFAULT_BIAS,
        }
    }
}

impl Scene {
    /// Empty scene with default light, background and bias.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere.
    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    /// Add a plane.
    pub fn add_plane(&mut self, plane: Plane) {
        self.planes.push(plane);
    }

    /// Box enclosing every sphere with a one unit margin, suitable as an
    /// octree root. An empty scene gets a unit cube around the origin.
    pub fn bounds(&self) -> Aabb {
        Aabb::enclosing(&self.spheres)
            .map(|b| b.padded(1.0))
            .unwrap_or_else(|| Aabb::from_center(Vec3A::ZERO, 1.0))
    }

    /// Four spheres resting above a floor plane, lit from the upper right.
    pub fn demo() -> Self {
        let red = Material::new(Color::new(255.0, 0.0, 0.0), 0.2);
        let blue = Material::new(Color::new(0.0, 0.0, 255.0), 0.1);
        let green = Material::new(Color::new(0.0, 128.0, 0.0), 0.0);
        let yellow = Material::new(Color::new(255.0, 255.0, 0.0), 0.0);

        let mut scene = Self::new();
        scene.add_sphere(Sphere::new(Vec3A::new(-5.0, 0.0, -16.0), 6.0, red));
        scene.add_sphere(Sphere::new(Vec3A::new(4.0, 0.0, -8.0), 2.0, blue));
        scene.add_sphere(Sphere::new(Vec3A::new(8.0, 0.0, -5.0), 3.0, green));
        scene.add_sphere(Sphere::new(Vec3A::new(0.0, -84.0, -10.0), 75.0, yellow));
        scene.add_plane(Plane::new(Vec3A::new(0.0, -20.0, 0.0), Vec3A::Y, yellow));
        scene
    }

    /// `count` small spheres scattered in front of the camera above a floor,
    /// reproducible from `seed`.
    pub fn random(count: usize, seed: u64) -> Self {
        let mut rng = SceneRng::seeded(seed);
        let mut scene = Self::new();
        scene.light.position = Vec3A::new(0.0, 40.0, 0.0);

        let min = Vec3A::new(-30.0, -20.0, -90.0);
        let max = Vec3A::new(30.0, 20.0, -20.0);
        for _ in 0..count {
            let center = rng.random_point(min, max);
            let radius = rng.random_f32_range(0.3, 2.0);
            let material = Material::new(rng.random_color(), rng.random_f32_range(0.0, 0.5));
            scene.add_sphere(Sphere::new(center, radius, material));
        }

        let floor = Material::new(Color::splat(200.0), 0.0);
        scene.add_plane(Plane::new(Vec3A::new(0.0, -25.0, 0.0), Vec3A::Y, floor));
        scene
    }
}
