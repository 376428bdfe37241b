//! Random number generation for procedural scenes.
//!
//! Wraps a seeded ChaCha20 PRNG so a scene generated from the same seed is
//! identical on every machine and every run.

use glam::Vec3A;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::material::Color;

/// Deterministic generator for scene content.
pub struct SceneRng {
    rng: ChaCha20Rng,
}

impl SceneRng {
    /// Create a generator from a 64-bit seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Generate a random f32 in [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.random()
    }

    /// Generate a random f32 in [min, max)
    pub fn random_f32_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.random_f32()
    }

    /// Generate a point inside the box spanned by `min` and `max`.
    pub fn random_point(&mut self, min: Vec3A, max: Vec3A) -> Vec3A {
        let t = Vec3A::new(self.random_f32(), self.random_f32(), self.random_f32());
        min + (max - min) * t
    }

    /// Generate a random RGB color with channels in [0, 255).
    pub fn random_color(&mut self) -> Color {
        Color::new(self.random_f32(), self.random_f32(), self.random_f32()) * 255.0
    }
}
