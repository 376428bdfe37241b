use clap::Parser;
use log::{error, info};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use orbtrace::aabb::Aabb;
use orbtrace::camera::Camera;
use orbtrace::config::{ConfigError, SceneFile};
use orbtrace::integrator::{Integrator, Strategy};
use orbtrace::marcher::RayMarcher;
use orbtrace::octree::{Octree, OctreeConfig};
use orbtrace::output::save_image;
use orbtrace::scene::Scene;
use orbtrace::tracer::RayTracer;

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("orbtrace - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ConfigError> {
    let mut file = match &args.config {
        Some(path) => {
            info!("Loading scene file {}", path);
            SceneFile::load(path)?
        }
        None => SceneFile::default(),
    };
    args.apply_overrides(&mut file);
    file.validate()?;

    let (scene, bounds) = create_scene(args, &file);
    info!(
        "Scene: {} spheres, {} planes",
        scene.spheres.len(),
        scene.planes.len()
    );

    let mut camera = Camera::new(file.render.width, file.render.height, file.render.fov);
    camera.show_progress = true;

    if args.bench {
        run_benchmark(&scene, bounds, &file, &camera);
        return Ok(());
    }

    info!(
        "Image resolution: {}x{}, fov {} degrees, {}",
        camera.width,
        camera.height,
        camera.fov_degrees,
        file.render.strategy.as_str()
    );

    let image = match file.render.strategy {
        Strategy::Trace => {
            let octree = build_octree(&scene, bounds, file.octree);
            camera.render(&RayTracer::new(&scene, &octree))
        }
        Strategy::March => camera.render(&RayMarcher::with_config(&scene, file.march)),
    };

    save_image(&image, &file.render.output);
    Ok(())
}

/// Pick the scene to render: random spheres, the scene file, or the demo
fn create_scene(args: &Args, file: &SceneFile) -> (Scene, Aabb) {
    let (scene, explicit_bounds) = match (args.random_spheres, &args.config) {
        (Some(count), _) => {
            info!("Generating {} random spheres (seed {})", count, args.seed);
            (Scene::random(count, args.seed), None)
        }
        (None, Some(_)) => (file.scene(), file.octree_bounds()),
        (None, None) => (Scene::demo(), None),
    };
    let bounds = explicit_bounds.unwrap_or_else(|| scene.bounds());
    (scene, bounds)
}

fn build_octree(scene: &Scene, bounds: Aabb, config: OctreeConfig) -> Octree {
    let start = std::time::Instant::now();
    let octree = Octree::build(bounds, config, scene.spheres.iter().copied());
    info!(
        "Octree built in {:.2?}: {} nodes, depth {}",
        start.elapsed(),
        octree.node_count(),
        octree.max_reached_depth()
    );
    octree
}

/// Run benchmark comparing octree tracing, linear tracing and ray marching
fn run_benchmark(scene: &Scene, bounds: Aabb, file: &SceneFile, camera: &Camera) {
    use std::time::{Duration, Instant};

    info!("🏁 Starting benchmark mode - comparing octree tracing, linear tracing and ray marching");
    info!("📊 Resolution: {}x{}", camera.width, camera.height);

    let octree = build_octree(scene, bounds, file.octree);
    // A root that may never split tests every sphere on every ray
    let linear = build_octree(scene, bounds, file.octree.linear());

    let runs: [(&str, &str, Box<dyn Integrator + '_>); 3] = [
        ("Octree trace", "bench_octree.ppm", Box::new(RayTracer::new(scene, &octree))),
        ("Linear trace", "bench_linear.ppm", Box::new(RayTracer::new(scene, &linear))),
        ("Ray march", "bench_march.ppm", Box::new(RayMarcher::with_config(scene, file.march))),
    ];

    let mut timings: Vec<(&str, &str, Duration)> = Vec::with_capacity(runs.len());
    for (name, path, integrator) in &runs {
        info!("\n{}...", name);
        let start = Instant::now();
        let image = camera.render(&**integrator);
        let elapsed = start.elapsed();
        save_image(&image, path);
        info!("✅ {}: {:.2}s - saved as {}", name, elapsed.as_secs_f32(), path);
        timings.push((*name, *path, elapsed));
    }

    // Summary table, relative to the octree tracer
    let baseline = timings[0].2.as_secs_f32();
    info!("\n================== BENCHMARK RESULTS ==================");
    info!("Resolution: {}x{}, Spheres: {}", camera.width, camera.height, scene.spheres.len());
    info!("--------------------------------------------------------");
    for (name, path, elapsed) in &timings {
        let secs = elapsed.as_secs_f32();
        let ratio = if secs > 0.0 { baseline / secs } else { 0.0 };
        info!("{:<14}{:>8.2}s    {:>6.2}x    {}", name, secs, ratio, path);
    }
    info!("========================================================");

    info!("\nBenchmark complete! Output files: bench_*.ppm");
}
