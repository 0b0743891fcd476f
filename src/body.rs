use log::warn;
use nalgebra::{Point3, Vector3};

use crate::error::{BodyError, TrajectoryError};
use crate::trajectory::Trajectory;

/// Displacement scale applied to overlapping pairs when softening is on.
pub const OVERLAP_SCALE: f64 = -0.1;
/// Pairs closer than this multiple of their summed radii count as overlapping.
pub const OVERLAP_RADII: f64 = 2.0;

/// What to do with a pair of bodies that get too close.
///
/// This is a crude anti-penetration trick, not collision handling. With
/// `Overlap`, once two bodies are closer than `OVERLAP_RADII * (r_i + r_j)`
/// (strictly), the displacement between them is scaled by `OVERLAP_SCALE`.
/// The pull turns into a weak push. Note that the force flips direction
/// discontinuously as the pair crosses the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Softening {
    Overlap,
    Disabled,
}

impl Default for Softening {
    fn default() -> Self {
        Softening::Overlap
    }
}

impl Softening {
    /// Whether the policy kicks in for two bodies `distance` apart.
    pub fn applies(self, distance: f64, radius_a: f64, radius_b: f64) -> bool {
        match self {
            Softening::Overlap => distance < OVERLAP_RADII * (radius_a + radius_b),
            Softening::Disabled => false,
        }
    }
}

// All the immutable info about a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub mass: f64,
    pub radius: f64,
    pub color: [u8; 3],
}

impl BodyInfo {
    pub fn new(mass: f64, radius: f64, color: [u8; 3]) -> Result<Self, BodyError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(BodyError::InvalidMass(mass));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(BodyError::InvalidRadius(radius));
        }
        Ok(BodyInfo {
            mass,
            radius,
            color,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    info: BodyInfo,
    position: Point3<f64>,
    velocity: Vector3<f64>,
    trajectory: Trajectory<Point3<f64>>,
}

impl Body {
    pub fn new(
        info: BodyInfo,
        position: Point3<f64>,
        velocity: Vector3<f64>,
        trajectory_capacity: usize,
    ) -> Result<Self, BodyError> {
        let trajectory = Trajectory::filled(trajectory_capacity, position)?;
        Ok(Body {
            info,
            position,
            velocity,
            trajectory,
        })
    }

    pub fn info(&self) -> &BodyInfo {
        &self.info
    }

    pub fn mass(&self) -> f64 {
        self.info.mass
    }

    pub fn radius(&self) -> f64 {
        self.info.radius
    }

    pub fn color(&self) -> [u8; 3] {
        self.info.color
    }

    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    pub fn velocity(&self) -> &Vector3<f64> {
        &self.velocity
    }

    pub fn trajectory(&self) -> &Trajectory<Point3<f64>> {
        &self.trajectory
    }

    /// The acceleration `other` induces on this body:
    ///   g * m_j / |r_j - r_i|^3 * (r_j - r_i)
    ///
    /// A body doesn't pull on itself. Two distinct bodies at exactly the same
    /// spot have no direction to pull along, so they don't either. Nothing
    /// clamps tiny non-zero separations; those can blow up to infinity.
    #[allow(clippy::float_cmp)]
    pub fn acceleration_from(&self, other: &Body, g: f64, softening: Softening) -> Vector3<f64> {
        if std::ptr::eq(self, other) {
            return Vector3::zeros();
        }

        let mut displacement = other.position - self.position;
        let distance = displacement.norm();
        if distance == 0.0 {
            return Vector3::zeros();
        }

        if softening.applies(distance, self.radius(), other.radius()) {
            displacement *= OVERLAP_SCALE;
        }

        displacement * (g * other.mass() / distance.powi(3))
    }

    /// Sums the acceleration from every body in `bodies`, which may include
    /// this one.
    pub fn total_acceleration(&self, bodies: &[Body], g: f64, softening: Softening) -> Vector3<f64> {
        let total = bodies
            .iter()
            .map(|other| self.acceleration_from(other, g, softening))
            .fold(Vector3::zeros(), |acc, a| acc + a);

        if !total.iter().all(|x| x.is_finite()) {
            warn!(
                "Non-finite acceleration {:?} on body at {:?}",
                total, self.position
            );
        }
        total
    }

    /// Throws away the trail and starts a new one of `capacity` points, all at
    /// the current position.
    pub fn set_trail_length(&mut self, capacity: usize) -> Result<(), TrajectoryError> {
        self.trajectory = Trajectory::filled(capacity, self.position)?;
        Ok(())
    }

    /// Kicks the velocity by `acceleration * dt`.
    pub fn accelerate(&mut self, acceleration: &Vector3<f64>, dt: f64) {
        self.velocity += acceleration * dt;
    }

    /// Records the current position in the trajectory, then moves by one
    /// velocity step.
    ///
    /// Only call this once every body's acceleration for the step has been
    /// computed, otherwise later bodies see already-moved earlier ones.
    pub fn advance(&mut self) {
        self.trajectory.push(self.position);
        self.position += self.velocity;
    }
}
