//! # Output Module
//!
//! Converts a rendered [`FrameBuffer`] to 8-bit pixels and writes it out:
//! - Binary PPM (`P6`) through a small hand-written encoder
//! - PNG through the `image` crate
//!
//! Channels are stored unclamped in 0..255 units while rendering; clamping
//! and truncation to `u8` happen here, once, after every pixel has joined.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use log::{info, warn};

use crate::camera::FrameBuffer;
use crate::interval::Interval;

/// Clamp every channel to [0, 255] and truncate it to a byte.
pub fn quantize(frame: &FrameBuffer) -> RgbImage {
    ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
        let pixel = frame.get_pixel(x, y);
        Rgb([
            Interval::CHANNEL.clamp(pixel[0]) as u8,
            Interval::CHANNEL.clamp(pixel[1]) as u8,
            Interval::CHANNEL.clamp(pixel[2]) as u8,
        ])
    })
}

/// Write `frame` as binary PPM: `P6\n<width> <height>\n255\n` followed by
/// row-major RGB byte triples.
pub fn write_ppm<W: Write>(frame: &FrameBuffer, mut writer: W) -> io::Result<()> {
    let bytes = quantize(frame);
    write!(writer, "P6\n{} {}\n255\n", frame.width(), frame.height())?;
    writer.write_all(bytes.as_raw())?;
    writer.flush()
}

/// Encode `frame` as binary PPM in memory.
pub fn encode_ppm(frame: &FrameBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(frame.width() as usize * frame.height() as usize * 3 + 32);
    // Writing into a Vec cannot fail
    let _ = write_ppm(frame, &mut out);
    out
}

fn save_ppm(frame: &FrameBuffer, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_ppm(frame, BufWriter::new(file))
}

/// Save `frame` based on the file extension of `output_path`.
///
/// `.ppm` goes through [`write_ppm`], `.png` through the `image` crate.
/// Failures (unknown extension, I/O errors) are logged as warnings and
/// never returned; a render is never lost to a panic on save.
pub fn save_image(frame: &FrameBuffer, output_path: &str) {
    let path = Path::new(output_path);
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let result = match extension.as_str() {
        "ppm" => save_ppm(frame, path).map_err(|e| e.to_string()),
        "png" => quantize(frame).save(path).map_err(|e| e.to_string()),
        other => Err(format!("unsupported file extension '{}', expected .ppm or .png", other)),
    };

    match result {
        Ok(()) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image {}: {}", output_path, e),
    }
}
