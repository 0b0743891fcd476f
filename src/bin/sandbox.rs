use std::error::Error;

use clap::Parser;
use kiss3d::event::EventManager;
use kiss3d::window::{State, Window};
use nalgebra::{Point2, Point3, Vector3};

use gravity_sandbox::camera::{Camera, Intrinsics};
use gravity_sandbox::gui::controller::Controller;
use gravity_sandbox::gui::draw_world_axes;
use gravity_sandbox::gui::overlay::{
    draw_circle, draw_clipped_line, side_view, to_color, to_planar, Viewport,
};
use gravity_sandbox::math::geometry::Axis;

const CUBE_CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, 0.0],
];

// Each corner is colored by its own coordinates
const CORNER_COLORS: [[u8; 3]; 8] = [
    [0, 0, 0],
    [0, 0, 255],
    [255, 0, 255],
    [255, 0, 0],
    [0, 255, 0],
    [0, 255, 255],
    [255, 255, 255],
    [255, 255, 0],
];

// Side views shrink the world by this much
const SIDE_VIEW_SCALE: f64 = 0.1;
const SIDE_VIEW_MARKER_PIXELS: f32 = 3.0;
const CAMERA_COLOR: [u8; 3] = [0, 0, 0];
const DIVIDER_COLOR: [u8; 3] = [40, 40, 40];

const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Fly a camera around a colored wireframe cube.
///
/// The top-left quarter of the window is what the camera sees. The other
/// three look down the x, y and z axes, with the camera drawn in black.
/// Escape quits.
#[derive(Debug, Parser)]
struct Args {
    /// Edge length of the cube
    #[arg(long, default_value_t = 1000.0)]
    scale: f64,
    /// Radius of the corner markers, in world units
    #[arg(long, default_value_t = 10.0)]
    radius: f64,
    #[arg(long, default_value_t = 1000.0)]
    focal: f64,
}

struct CubeSandbox {
    corners: Vec<Point3<f64>>,
    radius: f64,
    camera: Camera,
    controller: Controller,
}

fn mix(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    let mut mixed = [0; 3];
    for (m, (&a, &b)) in mixed.iter_mut().zip(a.iter().zip(b.iter())) {
        *m = ((a as u16 + b as u16) / 2) as u8;
    }
    mixed
}

impl CubeSandbox {
    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller.process_event(event, &mut self.camera, None);
        }
    }

    fn draw(&self, window: &mut Window) {
        let (width, height) = (window.width(), window.height());
        let [perspective, yz, xz, xy] = Viewport::quadrants(width, height);

        let divider = to_color(DIVIDER_COLOR);
        let (w, h) = (width as f64, height as f64);
        let middle = perspective.max;
        draw_clipped_line(
            window,
            &Viewport::full(width, height),
            &Point2::new(middle.x, 0.0),
            &Point2::new(middle.x, h),
            &divider,
        );
        draw_clipped_line(
            window,
            &Viewport::full(width, height),
            &Point2::new(0.0, middle.y),
            &Point2::new(w, middle.y),
            &divider,
        );

        self.draw_perspective(window, &perspective);
        self.draw_side_view(window, &yz, Axis::X);
        self.draw_side_view(window, &xz, Axis::Y);
        self.draw_side_view(window, &xy, Axis::Z);
    }

    fn draw_perspective(&self, window: &mut Window, viewport: &Viewport) {
        let (width, height) = (window.width(), window.height());
        draw_world_axes(window, &self.camera, viewport);

        let projected = self.camera.project_batch(&self.corners);
        for &(i, j) in EDGES.iter() {
            let color = to_color(mix(CORNER_COLORS[i], CORNER_COLORS[j]));
            draw_clipped_line(window, viewport, &projected[i], &projected[j], &color);
        }

        // Furthest first, so nearer markers are drawn over them
        let mut order: Vec<usize> = (0..self.corners.len())
            .filter(|&i| self.camera.depth(&self.corners[i]) > 0.0)
            .filter(|&i| viewport.contains(&projected[i]))
            .collect();
        order.sort_by(|&a, &b| {
            let da = self.camera.depth(&self.corners[a]);
            let db = self.camera.depth(&self.corners[b]);
            db.total_cmp(&da)
        });
        for i in order {
            let radius = self.camera.apparent_radius(self.radius, &self.corners[i]);
            draw_circle(
                window,
                &to_planar(&projected[i], width, height),
                radius as f32,
                &to_color(CORNER_COLORS[i]),
            );
        }
    }

    fn draw_side_view(&self, window: &mut Window, viewport: &Viewport, dropped: Axis) {
        let (width, height) = (window.width(), window.height());
        let origin = viewport.center();
        let flat: Vec<Point2<f64>> = self
            .corners
            .iter()
            .map(|c| side_view(c, dropped, SIDE_VIEW_SCALE, &origin))
            .collect();

        for &(i, j) in EDGES.iter() {
            let color = to_color(mix(CORNER_COLORS[i], CORNER_COLORS[j]));
            draw_clipped_line(window, viewport, &flat[i], &flat[j], &color);
        }
        for (point, &color) in flat.iter().zip(CORNER_COLORS.iter()) {
            if viewport.contains(point) {
                draw_circle(
                    window,
                    &to_planar(point, width, height),
                    SIDE_VIEW_MARKER_PIXELS,
                    &to_color(color),
                );
            }
        }

        let camera = side_view(
            &Point3::from(*self.camera.position()),
            dropped,
            SIDE_VIEW_SCALE,
            &origin,
        );
        if viewport.contains(&camera) {
            draw_circle(
                window,
                &to_planar(&camera, width, height),
                2.0 * SIDE_VIEW_MARKER_PIXELS,
                &to_color(CAMERA_COLOR),
            );
        }
    }
}

impl State for CubeSandbox {
    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        if self.controller.wants_quit() {
            window.close();
            return;
        }
        self.controller.poll_camera_keys(window, &mut self.camera);
        self.camera.apply_pending_movement();
        self.draw(window);
        self.controller.increment_frame_counter();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut window = Window::new("Sandbox");
    window.set_background_color(0.6, 0.6, 0.6);
    window.set_framerate_limit(Some(60));

    // The perspective view lives in the top-left quadrant
    let center = Viewport::quadrants(window.width(), window.height())[0].center();
    let camera = Camera::new(
        Vector3::new(-500.0, -500.0, 2500.0),
        Vector3::zeros(),
        Intrinsics::new(center, args.focal),
    );

    let corners = CUBE_CORNERS
        .iter()
        .map(|c| Point3::new(c[0], c[1], c[2]) * args.scale)
        .collect();

    let sandbox = CubeSandbox {
        corners,
        radius: args.radius,
        camera,
        controller: Controller::new(50.0, 0.01, false),
    };
    window.render_loop(sandbox);
    Ok(())
}
