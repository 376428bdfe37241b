use clap::{Parser, ValueEnum};
use log::LevelFilter;
use orbtrace::config::SceneFile;
use orbtrace::integrator::Strategy;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Shading strategy as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Analytic intersection with octree culling
    Trace,
    /// Sphere tracing through the signed distance field
    March,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Trace => Strategy::Trace,
            StrategyArg::March => Strategy::March,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser, Debug)]
#[command(name = "orbtrace")]
#[command(about = "Sphere ray tracer and ray marcher with an octree index")]
pub struct Args {
    /// TOML scene file; without one the built-in demo scene is rendered
    #[arg(short, long)]
    pub config: Option<String>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, help = "Image width in pixels")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, help = "Image height in pixels")]
    pub height: Option<u32>,

    /// Vertical field of view in degrees
    #[arg(long, help = "Vertical field of view in degrees")]
    pub fov: Option<f32>,

    /// Shading strategy
    #[arg(long, short = 's', value_enum, help = "Shading strategy")]
    pub strategy: Option<StrategyArg>,

    /// Output file path (.ppm for binary PPM, .png for PNG)
    #[arg(short, long, help = "Output file path (.ppm for binary PPM, .png for PNG)")]
    pub output: Option<String>,

    /// Render this many random spheres instead of the demo scene
    #[arg(long, help = "Render this many random spheres instead of the demo scene")]
    pub random_spheres: Option<usize>,

    /// Seed for --random-spheres
    #[arg(long, default_value = "42", help = "Seed for --random-spheres")]
    pub seed: u64,

    /// Resident spheres that make an octree leaf split
    #[arg(long, help = "Resident spheres that make an octree leaf split")]
    pub max_spheres_per_node: Option<usize>,

    /// Deepest octree level that may still split
    #[arg(long, help = "Deepest octree level that may still split")]
    pub max_depth: Option<u32>,

    /// Run benchmark comparing octree tracing, linear tracing and marching
    #[arg(long, help = "Run benchmark comparing octree tracing, linear tracing and marching")]
    pub bench: bool,
}

impl Args {
    /// Apply command line overrides on top of the scene file settings
    pub fn apply_overrides(&self, file: &mut SceneFile) {
        let render = &mut file.render;
        if let Some(width) = self.width {
            render.width = width;
        }
        if let Some(height) = self.height {
            render.height = height;
        }
        if let Some(fov) = self.fov {
            render.fov = fov;
        }
        if let Some(strategy) = self.strategy {
            render.strategy = strategy.into();
        }
        if let Some(output) = &self.output {
            render.output = output.clone();
        }
        if let Some(max) = self.max_spheres_per_node {
            file.octree.max_spheres_per_node = max;
        }
        if let Some(depth) = self.max_depth {
            file.octree.max_depth = depth;
        }
    }
}
