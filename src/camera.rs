use log::debug;
use nalgebra::{Matrix3, Matrix3x4, Matrix4xX, Point2, Point3, Vector2, Vector3};

use crate::math::geometry::{
    intrinsic_matrix, perspective_divide, roto_translation_matrix, Axis,
};

/// The fixed, lens-like parameters of a camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Intrinsics {
    pub focal: f64,
    /// Pixels per unit along u and v (ku, kv).
    pub pixel_scale: Vector2<f64>,
    /// Where the optical axis lands on screen.
    pub center: Point2<f64>,
}

impl Intrinsics {
    pub fn new(center: Point2<f64>, focal: f64) -> Self {
        Intrinsics {
            focal,
            pixel_scale: Vector2::new(1.0, 1.0),
            center,
        }
    }

    pub fn with_pixel_scale(mut self, ku: f64, kv: f64) -> Self {
        self.pixel_scale = Vector2::new(ku, kv);
        self
    }
}

/// A pinhole camera that maps world points to screen points.
///
/// Moving and rotating only record the new pose and mark the camera dirty.
/// The extrinsic matrix is rebuilt by `apply_pending_movement`, which the
/// frame driver calls once after handling input and before projecting
/// anything, so a burst of key presses costs one recomputation.
#[derive(Debug, Clone)]
pub struct Camera {
    // -- pose --
    position: Vector3<f64>,
    rotation: Vector3<f64>, // Euler angles in radians, applied X then Y then Z
    initial_position: Vector3<f64>,
    initial_rotation: Vector3<f64>,
    // -- lens --
    intrinsics: Intrinsics,
    // -- derived --
    g: Matrix3x4<f64>, // extrinsic [R | t], from the last applied pose
    a: Matrix3<f64>,   // intrinsic
    moved: bool,
}

impl Camera {
    pub fn new(position: Vector3<f64>, rotation: Vector3<f64>, intrinsics: Intrinsics) -> Self {
        let a = intrinsic_matrix(intrinsics.focal, &intrinsics.pixel_scale, &intrinsics.center);
        let g = roto_translation_matrix(&position, &rotation);
        Camera {
            position,
            rotation,
            initial_position: position,
            initial_rotation: rotation,
            intrinsics,
            g,
            a,
            moved: false,
        }
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn rotation(&self) -> &Vector3<f64> {
        &self.rotation
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    pub fn focal(&self) -> f64 {
        self.intrinsics.focal
    }

    pub fn center(&self) -> &Point2<f64> {
        &self.intrinsics.center
    }

    /// True if the pose changed since the transform was last rebuilt.
    pub fn is_dirty(&self) -> bool {
        self.moved
    }

    pub fn extrinsic_matrix(&self) -> &Matrix3x4<f64> {
        &self.g
    }

    pub fn intrinsic_matrix(&self) -> &Matrix3<f64> {
        &self.a
    }

    pub fn translate(&mut self, axis: Axis, delta: f64) {
        self.position[axis.index()] += delta;
        self.moved = true;
    }

    pub fn rotate(&mut self, axis: Axis, delta: f64) {
        self.rotation[axis.index()] += delta;
        self.moved = true;
    }

    /// Rebuilds the extrinsic matrix if the pose changed. Otherwise does nothing.
    pub fn apply_pending_movement(&mut self) {
        if self.moved {
            self.moved = false;
            self.update_extrinsics();
        }
    }

    /// Goes back to the pose the camera was created with.
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.rotation = self.initial_rotation;
        self.moved = false;
        self.update_extrinsics();
    }

    fn update_extrinsics(&mut self) {
        self.g = roto_translation_matrix(&self.position, &self.rotation);
        debug!(
            "Camera transform rebuilt: position {:?}, rotation {:?}",
            self.position.as_slice(),
            self.rotation.as_slice()
        );
    }

    fn check_fresh(&self) {
        debug_assert!(
            !self.moved,
            "camera projected with a stale transform; call apply_pending_movement first"
        );
    }

    // Homogeneous image coordinates [u, v, w] of a world point
    fn image_coords(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.check_fresh();
        self.a * (self.g * point.to_homogeneous())
    }

    /// Projects a world point onto the screen.
    ///
    /// Points on the focal plane (w = 0) come back unnormalized as (u, v).
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        perspective_divide(&self.image_coords(point))
    }

    /// Projects many points at once, in order. Agrees with calling `project`
    /// on each.
    pub fn project_batch(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        self.check_fresh();
        let world = Matrix4xX::from_fn(points.len(), |row, col| {
            if row < 3 {
                points[col][row]
            } else {
                1.0
            }
        });
        let image = self.a * (self.g * world);
        image
            .column_iter()
            .map(|m| perspective_divide(&m.clone_owned()))
            .collect()
    }

    /// The third image coordinate w of a point. Larger means further along
    /// the optical axis, and it's zero on the focal plane.
    pub fn depth(&self, point: &Point3<f64>) -> f64 {
        self.image_coords(point).z
    }

    /// How big a sphere of `radius` at `point` should be drawn on screen.
    pub fn apparent_radius(&self, radius: f64, point: &Point3<f64>) -> f64 {
        radius * self.focal() / self.depth(point).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn test_camera() -> Camera {
        Camera::new(
            Vector3::new(10.0, -20.0, 500.0),
            Vector3::new(0.1, 0.2, -0.3),
            Intrinsics::new(Point2::new(400.0, 300.0), 1000.0).with_pixel_scale(1.0, 1.5),
        )
    }

    fn test_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1000.0, 0.0, 0.0),
            Point3::new(0.0, 1000.0, 0.0),
            Point3::new(0.0, 0.0, 1000.0),
            Point3::new(-250.0, 75.5, 3.25),
        ]
    }

    #[test]
    fn test_point_ahead_hits_center() {
        let camera = Camera::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Intrinsics::new(Point2::origin(), 1000.0),
        );
        assert_eq!(camera.project(&Point3::new(0.0, 0.0, 1000.0)), Point2::origin());

        let camera = Camera::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Intrinsics::new(Point2::new(320.0, 240.0), 1000.0),
        );
        assert_eq!(
            camera.project(&Point3::new(0.0, 0.0, 1000.0)),
            Point2::new(320.0, 240.0)
        );
    }

    #[test]
    fn test_perspective() {
        let camera = Camera::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Intrinsics::new(Point2::new(100.0, 50.0), 2.0).with_pixel_scale(3.0, 4.0),
        );
        // u = 6 * 10 + 100 * 5 = 560, v = 8 * 20 + 50 * 5 = 410, w = 5
        assert_relative_eq!(
            camera.project(&Point3::new(10.0, 20.0, 5.0)),
            Point2::new(112.0, 82.0)
        );
    }

    #[test]
    fn test_focal_plane_fallback() {
        let camera = Camera::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Intrinsics::new(Point2::new(100.0, 50.0), 2.0),
        );
        // w = 0: no perspective division
        assert_eq!(
            camera.project(&Point3::new(3.0, -4.0, 0.0)),
            Point2::new(6.0, -8.0)
        );
        assert_eq!(camera.depth(&Point3::new(3.0, -4.0, 0.0)), 0.0);
    }

    #[test]
    fn test_translation_is_not_applied_until_commit() {
        let mut camera = Camera::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Intrinsics::new(Point2::origin(), 1.0),
        );
        let before = *camera.extrinsic_matrix();

        camera.translate(Axis::X, 5.0);
        camera.translate(Axis::Z, 1.0);
        camera.rotate(Axis::Y, 0.5);
        assert!(camera.is_dirty());
        assert_eq!(*camera.extrinsic_matrix(), before);
        assert_eq!(*camera.position(), Vector3::new(5.0, 0.0, 1.0));
        assert_eq!(*camera.rotation(), Vector3::new(0.0, 0.5, 0.0));

        camera.apply_pending_movement();
        assert!(!camera.is_dirty());
        assert_eq!(
            *camera.extrinsic_matrix(),
            roto_translation_matrix(&Vector3::new(5.0, 0.0, 1.0), &Vector3::new(0.0, 0.5, 0.0))
        );

        // Nothing pending: no change
        let committed = *camera.extrinsic_matrix();
        camera.apply_pending_movement();
        assert_eq!(*camera.extrinsic_matrix(), committed);
    }

    #[test]
    fn test_translation_shifts_camera_space() {
        let mut camera = Camera::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Intrinsics::new(Point2::origin(), 1.0),
        );
        camera.translate(Axis::Z, 10.0);
        camera.apply_pending_movement();
        // The translation is added to the point, so the depth grows by 10
        assert_relative_eq!(camera.depth(&Point3::new(0.0, 0.0, 10.0)), 20.0);
        assert_relative_eq!(
            camera.project(&Point3::new(4.0, 2.0, 10.0)),
            Point2::new(0.2, 0.1)
        );
    }

    #[test]
    fn test_rotation() {
        let mut camera = Camera::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Intrinsics::new(Point2::origin(), 1.0),
        );
        // Rotating about X sends y to z, so a point on the y-axis ends up dead ahead
        camera.rotate(Axis::X, FRAC_PI_2);
        camera.apply_pending_movement();
        let projected = camera.project(&Point3::new(0.0, 7.0, 0.0));
        assert_relative_eq!(projected, Point2::origin(), epsilon = 1e-12);
        assert_relative_eq!(camera.depth(&Point3::new(0.0, 7.0, 0.0)), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reset_restores_projection() {
        let original = test_camera();
        let mut camera = test_camera();

        camera.translate(Axis::X, 123.0);
        camera.rotate(Axis::Z, 1.0);
        camera.apply_pending_movement();
        camera.rotate(Axis::Y, -0.7);
        camera.translate(Axis::Y, 9.0);
        camera.reset();

        assert!(!camera.is_dirty());
        assert_eq!(camera.position(), original.position());
        assert_eq!(camera.rotation(), original.rotation());
        for p in test_points() {
            assert_eq!(camera.project(&p), original.project(&p));
        }
    }

    #[test]
    fn test_batch_matches_single() {
        let mut camera = test_camera();
        camera.rotate(Axis::X, 0.4);
        camera.apply_pending_movement();

        let points = test_points();
        let batch = camera.project_batch(&points);
        assert_eq!(batch.len(), points.len());
        for (p, projected) in points.iter().zip(batch.iter()) {
            assert_relative_eq!(*projected, camera.project(p), max_relative = 1e-9);
        }
        assert!(camera.project_batch(&[]).is_empty());
    }

    #[test]
    fn test_batch_focal_plane_fallback() {
        let camera = Camera::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Intrinsics::new(Point2::new(100.0, 50.0), 2.0),
        );
        let points = [Point3::new(3.0, -4.0, 0.0), Point3::new(3.0, -4.0, 2.0)];
        let batch = camera.project_batch(&points);
        assert_eq!(batch[0], Point2::new(6.0, -8.0));
        assert_relative_eq!(batch[1], Point2::new(103.0, 46.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "stale transform")]
    fn test_project_with_pending_movement_panics() {
        let mut camera = test_camera();
        camera.translate(Axis::X, 1.0);
        camera.project(&Point3::origin());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "stale transform")]
    fn test_batch_with_pending_movement_panics() {
        let mut camera = test_camera();
        camera.rotate(Axis::Y, 0.1);
        camera.project_batch(&test_points());
    }

    #[test]
    fn test_apparent_radius() {
        let camera = Camera::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Intrinsics::new(Point2::origin(), 1000.0),
        );
        assert_relative_eq!(
            camera.apparent_radius(10.0, &Point3::new(0.0, 0.0, 2000.0)),
            5.0
        );
    }
}
