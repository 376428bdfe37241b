//! TOML scene files.
//!
//! A scene file describes render settings, the light, octree and marching
//! limits, and the scene geometry. Every section is optional:
//!
//! ```toml
//! [render]
//! width = 640
//! height = 480
//! fov = 51.52
//! strategy = "march"
//! output = "spheres.ppm"
//!
//! [light]
//! position = [10.0, 10.0, 0.0]
//!
//! [octree]
//! max_spheres_per_node = 3
//! max_depth = 8
//!
//! [[spheres]]
//! center = [0.0, 0.0, -20.0]
//! radius = 4.0
//! color = [255.0, 0.0, 0.0]
//! reflectivity = 0.2
//!
//! [[planes]]
//! point = [0.0, -5.0, 0.0]
//! normal = [0.0, 1.0, 0.0]
//! color = [200.0, 200.0, 200.0]
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3A;
use serde::Deserialize;
use thiserror::Error;

use crate::aabb::Aabb;
use crate::integrator::Strategy;
use crate::marcher::MarchConfig;
use crate::material::{Color, Material};
use crate::octree::{OctreeConfig, MAX_OCTREE_DEPTH};
use crate::plane::Plane;
use crate::scene::{PointLight, Scene, DEFAULT_BACKGROUND, DEFAULT_BIAS};
use crate::sphere::Sphere;

/// Errors raised while loading or validating scene settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema.
    #[error("failed to parse scene file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings describe something that cannot be rendered.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Result type for scene file operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Output and camera settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Shading strategy
    pub strategy: Strategy,
    /// Output file path (.ppm or .png)
    pub output: String,
    /// Color of rays that escape the scene
    pub background: [f32; 3],
    /// Self-intersection bias for secondary rays
    pub bias: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            fov: 51.52,
            strategy: Strategy::default(),
            output: "render.ppm".to_string(),
            background: DEFAULT_BACKGROUND.to_array(),
            bias: DEFAULT_BIAS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct LightEntry {
    position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct BoundsEntry {
    min: [f32; 3],
    max: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct SphereEntry {
    center: [f32; 3],
    radius: f32,
    color: [f32; 3],
    #[serde(default)]
    reflectivity: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaneEntry {
    point: [f32; 3],
    normal: [f32; 3],
    color: [f32; 3],
    #[serde(default)]
    reflectivity: f32,
}

/// Parsed scene file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneFile {
    /// Output and camera settings
    pub render: RenderSettings,
    /// Octree split thresholds
    pub octree: OctreeConfig,
    /// Ray marching limits
    pub march: MarchConfig,
    light: Option<LightEntry>,
    bounds: Option<BoundsEntry>,
    spheres: Vec<SphereEntry>,
    planes: Vec<PlaneEntry>,
}

impl SceneFile {
    /// Read and validate a scene file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate scene file contents.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: SceneFile = toml::from_str(text)?;
        file.validate()?;
        Ok(file)
    }

    /// Check the settings for values that cannot be rendered.
    pub fn validate(&self) -> Result<()> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size {}x{} must be non-zero",
                render.width, render.height
            )));
        }
        if !(render.fov > 0.0 && render.fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov {} must be between 0 and 180 degrees",
                render.fov
            )));
        }
        if self.octree.max_depth > MAX_OCTREE_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "octree.max_depth {} exceeds {}",
                self.octree.max_depth, MAX_OCTREE_DEPTH
            )));
        }
        if self.march.max_steps == 0 {
            return Err(ConfigError::Invalid("march.max_steps must be at least 1".into()));
        }
        for (i, plane) in self.planes.iter().enumerate() {
            if Vec3A::from_array(plane.normal).try_normalize().is_none() {
                return Err(ConfigError::Invalid(format!("plane {} has a zero normal", i)));
            }
        }
        if let Some(bounds) = &self.bounds {
            let (min, max) = (Vec3A::from_array(bounds.min), Vec3A::from_array(bounds.max));
            if min.cmpgt(max).any() {
                return Err(ConfigError::Invalid("bounds.min must not exceed bounds.max".into()));
            }
            // Rays that miss the root never reach spheres outside it
            let root = Aabb::new(min, max);
            for (i, s) in self.spheres.iter().enumerate() {
                let sphere = Sphere::new(Vec3A::from_array(s.center), s.radius, Material::default());
                if !root.contains_sphere(&sphere) {
                    return Err(ConfigError::Invalid(format!(
                        "sphere {} does not fit inside bounds",
                        i
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build the in-memory scene. Plane normals are normalized.
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new();
        scene.background = Color::from_array(self.render.background);
        scene.bias = self.render.bias;
        if let Some(light) = &self.light {
            scene.light = PointLight {
                position: Vec3A::from_array(light.position),
            };
        }

        for s in &self.spheres {
            let material = Material::new(Color::from_array(s.color), s.reflectivity);
            scene.add_sphere(Sphere::new(Vec3A::from_array(s.center), s.radius, material));
        }
        for p in &self.planes {
            let material = Material::new(Color::from_array(p.color), p.reflectivity);
            let normal = Vec3A::from_array(p.normal).normalize_or_zero();
            scene.add_plane(Plane::new(Vec3A::from_array(p.point), normal, material));
        }
        scene
    }

    /// Explicit octree root volume, if the file gives one.
    pub fn octree_bounds(&self) -> Option<Aabb> {
        self.bounds
            .as_ref()
            .map(|b| Aabb::new(Vec3A::from_array(b.min), Vec3A::from_array(b.max)))
    }
}
