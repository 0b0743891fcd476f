use kiss3d::event::EventManager;
use kiss3d::window::{State, Window};
use nalgebra::{Point2, Point3};

use self::controller::Controller;
use self::overlay::{draw_circle, draw_clipped_line, draw_path, to_color, to_planar, Viewport};
use crate::camera::Camera;
use crate::scene::Scene;

pub mod controller;
pub mod overlay;

const AXIS_LENGTH: f64 = 1000.0;
const MIN_BODY_PIXELS: f32 = 2.0;

/// Drives a scene and a camera from a kiss3d window: one physics step and one
/// redraw per frame.
pub struct Simulation {
    scene: Scene,
    camera: Camera,
    controller: Controller,
}

impl Simulation {
    pub fn new(scene: Scene, camera: Camera, controller: Controller) -> Self {
        Self {
            scene,
            camera,
            controller,
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller
                .process_event(event, &mut self.camera, Some(self.scene.params_mut()));
        }
    }

    fn draw(&self, window: &mut Window) {
        let (width, height) = (window.width(), window.height());
        draw_world_axes(window, &self.camera, &Viewport::full(width, height));

        let trails = self.scene.projected_trajectories(&self.camera);
        let positions = self.scene.projected_positions(&self.camera);

        for ((body, trail), position) in self.scene.bodies().iter().zip(trails).zip(positions) {
            let color = to_color(body.color());
            draw_path(
                window,
                trail.iter().map(|p| to_planar(p, width, height)),
                &color,
            );

            // Nothing sensible to draw for bodies on or behind the focal plane
            if self.camera.depth(body.position()) <= 0.0 {
                continue;
            }
            let radius = self.camera.apparent_radius(body.radius(), body.position()) as f32;
            draw_circle(
                window,
                &to_planar(&position, width, height),
                radius.max(MIN_BODY_PIXELS),
                &color,
            );
        }

        self.draw_text(window);
    }

    fn draw_text(&self, window: &mut Window) {
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        let position = self.camera.position();
        let rotation = self.camera.rotation();
        let text = format!(
            "Time: {}{}\nPos: {:.2}, {:.2}, {:.2}  Rot: {:.2}, {:.2}, {:.2}\nFPS: {:.1}",
            self.scene.time(),
            if self.controller.is_paused() { " (paused)" } else { "" },
            position.x,
            position.y,
            position.z,
            rotation.x,
            rotation.y,
            rotation.z,
            self.controller.fps(),
        );
        window.draw_text(&text, &Point2::origin(), 48.0, &default_font, &text_color);
    }
}

/// Draws the world x, y and z axes in red, green and blue, cut off at the
/// edges of `viewport`.
pub fn draw_world_axes(window: &mut Window, camera: &Camera, viewport: &Viewport) {
    let ends = [
        Point3::origin(),
        Point3::new(AXIS_LENGTH, 0.0, 0.0),
        Point3::new(0.0, AXIS_LENGTH, 0.0),
        Point3::new(0.0, 0.0, AXIS_LENGTH),
    ];
    let projected = camera.project_batch(&ends);

    let colors = [
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
    ];
    for (end, color) in projected[1..].iter().zip(colors.iter()) {
        draw_clipped_line(window, viewport, &projected[0], end, color);
    }
}

impl State for Simulation {
    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        if self.controller.wants_quit() {
            window.close();
            return;
        }
        self.controller.poll_camera_keys(window, &mut self.camera);
        self.camera.apply_pending_movement();

        if !self.controller.is_paused() {
            self.scene.step();
        }

        self.draw(window);
        self.controller.increment_frame_counter();
    }
}
