use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use nalgebra::{Point2, Vector3};
use plotters::prelude::*;

use gravity_sandbox::camera::{Camera, Intrinsics};
use gravity_sandbox::file::read_scene;
use gravity_sandbox::scene::{
    Scene, SimulationParams, DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_TIMESTEP,
};

/// Runs a scene without a window and plots where everything went.
#[derive(Debug, Parser)]
struct Args {
    /// Scene file to load; the built-in demo scene is used if omitted
    scene: Option<PathBuf>,
    #[arg(short, long, default_value = "plots/trails.png")]
    output: PathBuf,
    /// Override every body's trail length
    #[arg(long)]
    trail: Option<usize>,
    #[arg(short = 'n', long, default_value_t = 200)]
    steps: usize,
    #[arg(short, long, default_value_t = DEFAULT_GRAVITATIONAL_CONSTANT)]
    gravity: f64,
    #[arg(long, default_value_t = DEFAULT_TIMESTEP)]
    dt: f64,
    /// Camera position
    #[arg(long, num_args = 3, default_values_t = [0.0, 0.0, 8000.0])]
    camera: Vec<f64>,
    /// Camera rotation, in radians
    #[arg(long, num_args = 3, default_values_t = [0.0, 0.0, 0.0])]
    rotation: Vec<f64>,
    #[arg(long, default_value_t = 500.0)]
    focal: f64,
}

const IMAGE_SIZE: (u32, u32) = (800, 800);

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let params = SimulationParams {
        gravitational_constant: args.gravity,
        timestep: args.dt,
        ..SimulationParams::default()
    };
    let mut scene = match &args.scene {
        Some(path) => read_scene(path, params)?,
        None => Scene::demo(params)?,
    };
    if let Some(trail) = args.trail {
        scene.set_trail_length(trail)?;
    }
    scene.step_n(args.steps);
    info!("Ran {} steps, t = {}", args.steps, scene.time());

    let camera = Camera::new(
        Vector3::from_column_slice(&args.camera),
        Vector3::from_column_slice(&args.rotation),
        Intrinsics::new(Point2::origin(), args.focal),
    );

    draw_trails(&args.output, &scene, &camera)
}

fn draw_trails(output: &Path, scene: &Scene, camera: &Camera) -> Result<(), Box<dyn Error>> {
    let trails = scene.projected_trajectories(camera);

    // Fit the plot around everything we're about to draw
    let (mut lo, mut hi) = (Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0));
    for p in trails.iter().flatten().filter(|p| p.x.is_finite() && p.y.is_finite()) {
        lo = lo.inf(p);
        hi = hi.sup(p);
    }

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let root = BitMapBackend::new(output, IMAGE_SIZE).into_drawing_area();
    root.fill(&BLACK)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .caption(format!("t = {}", scene.time()), ("sans-serif", 20).into_font().color(&WHITE))
        .build_cartesian_2d(lo.x..hi.x, -hi.y..-lo.y)?;

    chart
        .configure_mesh()
        .axis_style(&WHITE)
        .label_style(("sans-serif", 12).into_font().color(&WHITE))
        .draw()?;

    // Screen v grows downwards, so flip it to get the picture the right way up
    for (body, trail) in scene.bodies().iter().zip(trails.iter()) {
        let [r, g, b] = body.color();
        let color = RGBColor(r, g, b);
        chart.draw_series(LineSeries::new(trail.iter().map(|p| (p.x, -p.y)), &color))?;
        if let Some(end) = trail.last() {
            chart.draw_series(std::iter::once(Circle::new((end.x, -end.y), 4, color.filled())))?;
        }
    }

    root.present()?;
    info!("Wrote {}", output.display());
    Ok(())
}
