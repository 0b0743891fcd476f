use log::{debug, trace};
use nalgebra::{Point2, Point3, Vector3};

use crate::body::{Body, BodyInfo, Softening};
use crate::camera::Camera;
use crate::error::{BodyError, TrajectoryError};

pub const DEFAULT_GRAVITATIONAL_CONSTANT: f64 = 100.0;
pub const DEFAULT_TIMESTEP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub gravitational_constant: f64,
    pub timestep: f64,
    pub softening: Softening,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            gravitational_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            timestep: DEFAULT_TIMESTEP,
            softening: Softening::default(),
        }
    }
}

/// All the bodies in the world, and the clock.
#[derive(Debug, Clone)]
pub struct Scene {
    bodies: Vec<Body>,
    params: SimulationParams,
    time: f64,
}

impl Scene {
    pub fn new(params: SimulationParams) -> Self {
        Scene {
            bodies: vec![],
            params,
            time: 0.0,
        }
    }

    /// Three light bodies thrown around a heavy one.
    pub fn demo(params: SimulationParams) -> Result<Self, BodyError> {
        const RED: [u8; 3] = [255, 0, 0];
        const GREEN: [u8; 3] = [0, 255, 0];
        const BLUE: [u8; 3] = [0, 0, 255];
        const DANDELION_YELLOW: [u8; 3] = [255, 200, 0];

        let mut scene = Scene::new(params);
        scene.add_bodies(vec![
            Body::new(
                BodyInfo::new(10.0, 30.0, RED)?,
                Point3::new(0.0, 1000.0, 0.0),
                Vector3::new(70.0, 0.0, 30.0),
                100,
            )?,
            Body::new(
                BodyInfo::new(10.0, 60.0, GREEN)?,
                Point3::new(0.0, 2000.0, 0.0),
                Vector3::new(50.0, 0.0, 0.0),
                220,
            )?,
            Body::new(
                BodyInfo::new(10.0, 50.0, BLUE)?,
                Point3::new(0.0, 3000.0, 0.0),
                Vector3::new(0.0, 0.0, 30.0),
                230,
            )?,
            Body::new(
                BodyInfo::new(1e6, 100.0, DANDELION_YELLOW)?,
                Point3::origin(),
                Vector3::zeros(),
                2,
            )?,
        ]);
        Ok(scene)
    }

    pub fn add_body(&mut self, body: Body) {
        debug!(
            "Adding body of mass {} at {:?}",
            body.mass(),
            body.position().coords.as_slice()
        );
        self.bodies.push(body);
    }

    pub fn add_bodies<I: IntoIterator<Item = Body>>(&mut self, bodies: I) {
        for body in bodies {
            self.add_body(body);
        }
    }

    /// Gives every body a fresh trail of `capacity` points.
    pub fn set_trail_length(&mut self, capacity: usize) -> Result<(), TrajectoryError> {
        if capacity == 0 {
            return Err(TrajectoryError::ZeroCapacity);
        }
        for body in self.bodies.iter_mut() {
            body.set_trail_length(capacity)?;
        }
        debug!("Trail length set to {}", capacity);
        Ok(())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut SimulationParams {
        &mut self.params
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advances the world by one timestep.
    ///
    /// This runs in two passes. First every body's acceleration is computed
    /// against the same snapshot of positions, and only then does anything
    /// move. Moving bodies during the first pass would make the result depend
    /// on the order of `bodies`.
    pub fn step(&mut self) {
        let SimulationParams {
            gravitational_constant: g,
            timestep: dt,
            softening,
        } = self.params;

        let accelerations: Vec<Vector3<f64>> = self
            .bodies
            .iter()
            .map(|body| body.total_acceleration(&self.bodies, g, softening))
            .collect();

        for (body, acceleration) in self.bodies.iter_mut().zip(accelerations.iter()) {
            body.accelerate(acceleration, dt);
        }
        for body in self.bodies.iter_mut() {
            body.advance();
        }

        self.time += dt;
        trace!("Stepped to t = {}", self.time);
    }

    pub fn step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Where each body shows up on screen, in the same order as `bodies()`.
    pub fn projected_positions(&self, camera: &Camera) -> Vec<Point2<f64>> {
        let positions: Vec<Point3<f64>> = self.bodies.iter().map(|b| *b.position()).collect();
        camera.project_batch(&positions)
    }

    /// The on-screen trail of each body, oldest point first, with the current
    /// position appended so the trail meets the body.
    pub fn projected_trajectories(&self, camera: &Camera) -> Vec<Vec<Point2<f64>>> {
        self.bodies
            .iter()
            .map(|body| {
                let mut points = body.trajectory().to_vec();
                points.push(*body.position());
                camera.project_batch(&points)
            })
            .collect()
    }
}
