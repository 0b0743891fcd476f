use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use log::info;
use nalgebra::{Point2, Vector3};

use gravity_sandbox::body::Softening;
use gravity_sandbox::camera::{Camera, Intrinsics};
use gravity_sandbox::file::read_scene;
use gravity_sandbox::gui::controller::Controller;
use gravity_sandbox::gui::Simulation;
use gravity_sandbox::scene::{
    Scene, SimulationParams, DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_TIMESTEP,
};

/// Watch a handful of bodies pull on each other.
///
/// Camera: W/S/A/D/Q/E to move, arrow keys and R/F to rotate, Backspace to
/// reset. Space pauses, comma and period halve and double the timestep.
/// Escape quits.
#[derive(Debug, Parser)]
struct Args {
    /// Scene file to load; the built-in demo scene is used if omitted
    scene: Option<PathBuf>,
    /// Gravitational constant
    #[arg(short, long, default_value_t = DEFAULT_GRAVITATIONAL_CONSTANT)]
    gravity: f64,
    /// Timestep per frame
    #[arg(long, default_value_t = DEFAULT_TIMESTEP)]
    dt: f64,
    /// Turn off the repulsion between overlapping bodies
    #[arg(long)]
    no_softening: bool,
    #[arg(long, default_value_t = 30)]
    fps: u64,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
    #[arg(long, default_value_t = 500.0)]
    focal: f64,
    /// Override every body's trail length
    #[arg(long)]
    trail: Option<usize>,
    /// Start with the simulation running
    #[arg(long)]
    run: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let params = SimulationParams {
        gravitational_constant: args.gravity,
        timestep: args.dt,
        softening: if args.no_softening {
            Softening::Disabled
        } else {
            Softening::Overlap
        },
    };
    let mut scene = match &args.scene {
        Some(path) => read_scene(path, params)?,
        None => Scene::demo(params)?,
    };
    if let Some(trail) = args.trail {
        scene.set_trail_length(trail)?;
    }
    info!("Simulating {} bodies with {:?}", scene.bodies().len(), params);

    let camera = Camera::new(
        Vector3::new(0.0, 0.0, 8000.0),
        Vector3::zeros(),
        Intrinsics::new(
            Point2::new(args.width as f64 / 2.0, args.height as f64 / 2.0),
            args.focal,
        ),
    );

    let mut window = Window::new_with_size("Gravity", args.width, args.height);
    window.set_light(Light::StickToCamera);
    window.set_background_color(0.0, 0.0, 0.04);
    window.set_framerate_limit(Some(args.fps));

    let controller = Controller::new(100.0, 0.01, !args.run);
    window.render_loop(Simulation::new(scene, camera, controller));
    Ok(())
}
