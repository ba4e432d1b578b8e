//! Projective maps between quadrilaterals.
//!
//! A 4-point homography is built from two closed-form unit-square-to-quad
//! maps, `H = Q_dst * Q_src^-1`, which is exact for four correspondences and
//! needs no linear solve.

use nalgebra::{Matrix3, Point2, Vector3};

const DEGENERATE_EPS: f64 = 1e-12;

/// Planar projective transform `dst ~ H * src`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        Point2::new((v.x / v.z) as f32, (v.y / v.z) as f32)
    }
}

/// Map the unit square `(0,0) (1,0) (1,1) (0,1)` onto `quad` (same order).
///
/// `None` when three or more corners are collinear.
fn unit_square_to_quad(quad: &[Point2<f32>; 4]) -> Option<Matrix3<f64>> {
    let [p0, p1, p2, p3] = quad.map(|p| (p.x as f64, p.y as f64));

    let sx = p0.0 - p1.0 + p2.0 - p3.0;
    let sy = p0.1 - p1.1 + p2.1 - p3.1;

    let m = if sx.abs() < DEGENERATE_EPS && sy.abs() < DEGENERATE_EPS {
        // Parallelogram: affine.
        Matrix3::new(
            p1.0 - p0.0, p2.0 - p1.0, p0.0, //
            p1.1 - p0.1, p2.1 - p1.1, p0.1, //
            0.0, 0.0, 1.0,
        )
    } else {
        let (dx1, dy1) = (p1.0 - p2.0, p1.1 - p2.1);
        let (dx2, dy2) = (p3.0 - p2.0, p3.1 - p2.1);
        let den = dx1 * dy2 - dx2 * dy1;
        if den.abs() < DEGENERATE_EPS {
            return None;
        }
        let g = (sx * dy2 - dx2 * sy) / den;
        let h = (dx1 * sy - sx * dy1) / den;
        Matrix3::new(
            p1.0 - p0.0 + g * p1.0, p3.0 - p0.0 + h * p3.0, p0.0, //
            p1.1 - p0.1 + g * p1.1, p3.1 - p0.1 + h * p3.1, p0.1, //
            g, h, 1.0,
        )
    };

    (m.determinant().abs() > DEGENERATE_EPS).then_some(m)
}

/// Homography taking each `src[k]` to `dst[k]`.
///
/// Both quads must list their corners in the same cyclic order. Returns
/// `None` for degenerate (collinear) configurations.
pub fn homography_from_4pt(src: &[Point2<f32>; 4], dst: &[Point2<f32>; 4]) -> Option<Homography> {
    let to_src = unit_square_to_quad(src)?;
    let to_dst = unit_square_to_quad(dst)?;
    let h = to_dst * to_src.try_inverse()?;
    let s = h[(2, 2)];
    if s.abs() < DEGENERATE_EPS {
        return None;
    }
    Some(Homography::new(h / s))
}
