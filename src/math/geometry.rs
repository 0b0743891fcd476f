use std::convert::TryFrom;

use nalgebra::{Matrix3, Matrix3x4, Point2, Vector2, Vector3};

use crate::error::AxisError;

/// One of the three world axes. Cameras are moved and rotated one axis at a time.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = AxisError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            _ => Err(AxisError(index)),
        }
    }
}

/// Returns the rotation R = Rz * Ry * Rx for the given Euler angles (radians).
///
/// Reading right-to-left, a vector is rotated about X first, then Y, then Z.
/// Swapping this order changes what every camera sees, so don't.
pub fn rotation_matrix(rotation: &Vector3<f64>) -> Matrix3<f64> {
    let (s, c) = rotation.x.sin_cos();
    let rx = Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, c, -s, //
        0.0, s, c,
    );

    let (s, c) = rotation.y.sin_cos();
    let ry = Matrix3::new(
        c, 0.0, s, //
        0.0, 1.0, 0.0, //
        -s, 0.0, c,
    );

    let (s, c) = rotation.z.sin_cos();
    let rz = Matrix3::new(
        c, -s, 0.0, //
        s, c, 0.0, //
        0.0, 0.0, 1.0,
    );

    rz * ry * rx
}

/// Concatenates the rotation for `rotation` with `translation` as a fourth column,
/// giving the 3x4 extrinsic matrix [R | t].
///
/// Note that the translation is taken as-is: it is neither negated nor rotated.
pub fn roto_translation_matrix(
    translation: &Vector3<f64>,
    rotation: &Vector3<f64>,
) -> Matrix3x4<f64> {
    let mut g = Matrix3x4::zeros();
    g.fixed_slice_mut::<3, 3>(0, 0)
        .copy_from(&rotation_matrix(rotation));
    g.set_column(3, translation);
    g
}

/// The intrinsic matrix: diag(f * ku, f * kv, 1), with the image center in the
/// last column.
pub fn intrinsic_matrix(focal: f64, pixel_scale: &Vector2<f64>, center: &Point2<f64>) -> Matrix3<f64> {
    Matrix3::new(
        focal * pixel_scale.x, 0.0, center.x, //
        0.0, focal * pixel_scale.y, center.y, //
        0.0, 0.0, 1.0,
    )
}

/// Perspective division of a homogeneous image point.
///
/// If w is exactly zero the point lies on the focal plane, and we hand back
/// (u, v) unnormalized instead.
#[allow(clippy::float_cmp)]
pub fn perspective_divide(m: &Vector3<f64>) -> Point2<f64> {
    if m.z != 0.0 {
        Point2::new(m.x / m.z, m.y / m.z)
    } else {
        Point2::new(m.x, m.y)
    }
}
