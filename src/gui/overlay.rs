use std::f32::consts::PI;

use kiss3d::window::Window;
use nalgebra::{Point2, Point3};

use crate::math::geometry::Axis;

const CIRCLE_SEGMENTS: usize = 24;

/// Screen coordinates (origin top-left, v down) to kiss3d's planar
/// coordinates (origin at the center, y up).
pub fn to_planar(point: &Point2<f64>, width: u32, height: u32) -> Point2<f32> {
    Point2::new(
        point.x as f32 - width as f32 / 2.0,
        height as f32 / 2.0 - point.y as f32,
    )
}

/// A rectangle of the screen, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Viewport {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Viewport { min, max }
    }

    pub fn full(width: u32, height: u32) -> Self {
        Viewport::new(Point2::origin(), Point2::new(width as f64, height as f64))
    }

    /// Splits a `width` x `height` screen into four equal quadrants, in the
    /// order top-left, top-right, bottom-left, bottom-right.
    pub fn quadrants(width: u32, height: u32) -> [Viewport; 4] {
        let (w, h) = (width as f64 / 2.0, height as f64 / 2.0);
        let quadrant = |col: f64, row: f64| {
            Viewport::new(
                Point2::new(col * w, row * h),
                Point2::new((col + 1.0) * w, (row + 1.0) * h),
            )
        };
        [
            quadrant(0.0, 0.0),
            quadrant(1.0, 0.0),
            quadrant(0.0, 1.0),
            quadrant(1.0, 1.0),
        ]
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// The part of the segment from `a` to `b` inside the viewport, if any.
    pub fn clip_segment(&self, a: &Point2<f64>, b: &Point2<f64>) -> Option<(Point2<f64>, Point2<f64>)> {
        if ![a.x, a.y, b.x, b.y].iter().all(|c| c.is_finite()) {
            return None;
        }

        // Liang-Barsky: shrink the parameter range [t0, t1] one edge at a time
        let d = b - a;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        let edges = [
            (-d.x, a.x - self.min.x),
            (d.x, self.max.x - a.x),
            (-d.y, a.y - self.min.y),
            (d.y, self.max.y - a.y),
        ];
        for &(p, q) in edges.iter() {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let t = q / p;
                if p < 0.0 {
                    t0 = t0.max(t);
                } else {
                    t1 = t1.min(t);
                }
            }
        }
        if t0 <= t1 {
            Some((a + d * t0, a + d * t1))
        } else {
            None
        }
    }
}

/// Orthographic view looking down `dropped`: the other two coordinates, in
/// order, scaled and shifted so the world origin lands on `origin`.
pub fn side_view(point: &Point3<f64>, dropped: Axis, scale: f64, origin: &Point2<f64>) -> Point2<f64> {
    let (a, b) = match dropped {
        Axis::X => (point.y, point.z),
        Axis::Y => (point.x, point.z),
        Axis::Z => (point.x, point.y),
    };
    Point2::new(origin.x + a * scale, origin.y + b * scale)
}

pub fn to_color(rgb: [u8; 3]) -> Point3<f32> {
    Point3::new(
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    )
}

pub fn draw_path<I: Iterator<Item = Point2<f32>>>(window: &mut Window, points: I, color: &Point3<f32>) {
    let mut prev_pt = None;
    for pt in points {
        if let Some(prev_pt) = prev_pt {
            window.draw_planar_line(&prev_pt, &pt, color);
        }
        prev_pt = Some(pt);
    }
}

/// Draws the visible part of a line given in screen coordinates.
pub fn draw_clipped_line(
    window: &mut Window,
    viewport: &Viewport,
    a: &Point2<f64>,
    b: &Point2<f64>,
    color: &Point3<f32>,
) {
    let (width, height) = (window.width(), window.height());
    if let Some((a, b)) = viewport.clip_segment(a, b) {
        window.draw_planar_line(&to_planar(&a, width, height), &to_planar(&b, width, height), color);
    }
}

pub fn draw_circle(window: &mut Window, center: &Point2<f32>, radius: f32, color: &Point3<f32>) {
    let points = (0..=CIRCLE_SEGMENTS).map(|i| {
        let theta = 2.0 * PI * i as f32 / CIRCLE_SEGMENTS as f32;
        Point2::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
    });
    draw_path(window, points, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_to_planar() {
        assert_eq!(
            to_planar(&Point2::new(400.0, 300.0), 800, 600),
            Point2::new(0.0, 0.0)
        );
        assert_eq!(
            to_planar(&Point2::new(0.0, 0.0), 800, 600),
            Point2::new(-400.0, 300.0)
        );
    }

    #[test]
    fn test_quadrants() {
        let [tl, tr, bl, br] = Viewport::quadrants(800, 600);
        assert_eq!(tl, Viewport::new(Point2::new(0.0, 0.0), Point2::new(400.0, 300.0)));
        assert_eq!(br, Viewport::new(Point2::new(400.0, 300.0), Point2::new(800.0, 600.0)));
        assert_eq!(tr.center(), Point2::new(600.0, 150.0));
        assert_eq!(bl.center(), Point2::new(200.0, 450.0));

        assert!(tl.contains(&Point2::new(400.0, 0.0)));
        assert!(!tl.contains(&Point2::new(400.5, 10.0)));
    }

    #[test]
    fn test_clip_segment() {
        let viewport = Viewport::new(Point2::new(0.0, 0.0), Point2::new(100.0, 50.0));

        // Entirely inside
        let (a, b) = (Point2::new(10.0, 10.0), Point2::new(90.0, 40.0));
        assert_eq!(viewport.clip_segment(&a, &b), Some((a, b)));

        // Crosses the right edge
        let clipped = viewport.clip_segment(&Point2::new(50.0, 20.0), &Point2::new(150.0, 20.0));
        assert_eq!(clipped, Some((Point2::new(50.0, 20.0), Point2::new(100.0, 20.0))));

        // Passes through, both ends outside
        let (a, b) = viewport
            .clip_segment(&Point2::new(-50.0, 25.0), &Point2::new(150.0, 25.0))
            .unwrap();
        assert_relative_eq!(a, Point2::new(0.0, 25.0));
        assert_relative_eq!(b, Point2::new(100.0, 25.0));

        // Misses
        assert_eq!(
            viewport.clip_segment(&Point2::new(-10.0, -10.0), &Point2::new(200.0, -1.0)),
            None
        );
        assert_eq!(
            viewport.clip_segment(&Point2::new(10.0, 60.0), &Point2::new(90.0, 60.0)),
            None
        );
        assert_eq!(
            viewport.clip_segment(&Point2::new(f64::NAN, 10.0), &Point2::new(10.0, 10.0)),
            None
        );
    }

    #[test]
    fn test_side_view() {
        let point = Point3::new(100.0, 200.0, 300.0);
        let origin = Point2::new(600.0, 150.0);

        assert_relative_eq!(side_view(&point, Axis::X, 0.1, &origin), Point2::new(620.0, 180.0));
        assert_relative_eq!(side_view(&point, Axis::Y, 0.1, &origin), Point2::new(610.0, 180.0));
        assert_relative_eq!(side_view(&point, Axis::Z, 0.1, &origin), Point2::new(610.0, 170.0));
        assert_eq!(side_view(&Point3::origin(), Axis::Z, 0.1, &origin), origin);
    }

    #[test]
    fn test_to_color() {
        assert_eq!(to_color([255, 0, 51]), Point3::new(1.0, 0.0, 0.2));
    }
}
