//! orbtrace sphere renderer
//!
//! Renders scenes of spheres and planes lit by a single point light with two
//! interchangeable strategies: a recursive ray tracer that culls spheres with
//! an octree, and a sphere-traced ray marcher. Frames are written as binary
//! PPM or PNG.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod aabb;
pub mod camera;
pub mod config;
pub mod hittable;
pub mod integrator;
pub mod interval;
pub mod marcher;
pub mod material;
pub mod octree;
pub mod output;
pub mod plane;
pub mod random;
pub mod ray;
pub mod scene;
pub mod sphere;
pub mod tracer;
