//! Pinhole camera and frame rendering.

use glam::Vec3A;
use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::integrator::Integrator;
use crate::ray::Ray;

/// Row-major RGB frame with unclamped linear channels in 0..255 units.
pub type FrameBuffer = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Camera at a fixed position looking down -z with +y up.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rendered image width in pixel count
    pub width: u32,
    /// Rendered image height in pixel count
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Position every primary ray starts from
    pub origin: Vec3A,
    /// Draw a progress bar on stderr while rendering
    pub show_progress: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            fov_degrees: 51.52,
            origin: Vec3A::ZERO,
            show_progress: false,
        }
    }
}

impl Camera {
    /// Camera at the origin for a `width` x `height` image.
    pub fn new(width: u32, height: u32, fov_degrees: f32) -> Self {
        Self {
            width,
            height,
            fov_degrees,
            ..Self::default()
        }
    }

    /// Distance from the eye to the image plane, in pixel units.
    fn focal_length(&self) -> f32 {
        self.height as f32 / (2.0 * (self.fov_degrees.to_radians() / 2.0).tan())
    }

    /// Ray through the center of pixel (`row`, `column`), row 0 at the top.
    pub fn primary_ray(&self, row: u32, column: u32) -> Ray {
        self.ray_with_focal(row, column, self.focal_length())
    }

    fn ray_with_focal(&self, row: u32, column: u32, focal: f32) -> Ray {
        let x = column as f32 + 0.5 - self.width as f32 / 2.0;
        let y = -(row as f32 + 0.5) + self.height as f32 / 2.0;
        Ray::new(self.origin, Vec3A::new(x, y, -focal).normalize())
    }

    /// Renders one frame with the given integrator.
    ///
    /// Rows are rendered in parallel; every worker writes only the row slice
    /// it was handed. Each pixel starts a fresh shading recursion at depth 0.
    pub fn render(&self, integrator: &dyn Integrator) -> FrameBuffer {
        let mut image = FrameBuffer::new(self.width, self.height);
        if self.width == 0 || self.height == 0 {
            return image;
        }

        info!(
            "Rendering {}x{} using {} CPU cores...",
            self.width,
            self.height,
            rayon::current_num_threads()
        );
        let generation_start = std::time::Instant::now();

        let pb = if self.show_progress {
            let pb = ProgressBar::new(self.height as u64);
            if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
                pb.set_style(style);
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let focal = self.focal_length();
        let row_len = self.width as usize * 3;
        let buffer: &mut [f32] = &mut image;

        buffer.par_chunks_mut(row_len).enumerate().for_each(|(row, pixels)| {
            for (column, pixel) in pixels.chunks_exact_mut(3).enumerate() {
                let ray = self.ray_with_focal(row as u32, column as u32, focal);
                let color = integrator.shade(&ray, 0);
                pixel.copy_from_slice(&color.to_array());
            }
            pb.inc(1);
        });

        pb.finish_and_clear();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        image
    }
}
