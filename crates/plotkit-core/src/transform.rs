//! Linear maps applied to paths in their local frame.
//!
//! Affine modifiers split a transform about an absolute pivot into a linear
//! part, applied to every path and child origin, and a translation applied to
//! the root origin only. This module owns the linear part.

use nalgebra::{Matrix2, Vector2};

use crate::model::Point;

const CONFORMAL_EPSILON: f64 = 1e-9;

/// A 2x2 linear map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMap {
    matrix: Matrix2<f64>,
}

impl LinearMap {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix2::identity(),
        }
    }

    /// Counter-clockwise rotation (toward +Y) by `angle_deg` degrees.
    pub fn rotation(angle_deg: f64) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        Self {
            matrix: Matrix2::new(c, -s, s, c),
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            matrix: Matrix2::new(sx, 0.0, 0.0, sy),
        }
    }

    /// Reflection flipping the X and/or Y coordinate.
    pub fn mirror(flip_x: bool, flip_y: bool) -> Self {
        Self::scale(
            if flip_x { -1.0 } else { 1.0 },
            if flip_y { -1.0 } else { 1.0 },
        )
    }

    /// `other` applied after `self`.
    pub fn then(&self, other: &LinearMap) -> LinearMap {
        LinearMap {
            matrix: other.matrix * self.matrix,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        let v = self.matrix * Vector2::new(p.x, p.y);
        Point::new(v.x, v.y)
    }

    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }

    /// True when the map reverses orientation.
    pub fn is_reflection(&self) -> bool {
        self.determinant() < 0.0
    }

    /// Uniform scale factor of a conformal map.
    pub fn scale_factor(&self) -> f64 {
        self.determinant().abs().sqrt()
    }

    /// True when circles map to circles: a rotation, uniform scale, and
    /// optional reflection.
    pub fn is_conformal(&self) -> bool {
        let m = &self.matrix;
        let col0 = Vector2::new(m[(0, 0)], m[(1, 0)]);
        let col1 = Vector2::new(m[(0, 1)], m[(1, 1)]);
        let n0 = col0.norm();
        let n1 = col1.norm();
        if n0 <= CONFORMAL_EPSILON || n1 <= CONFORMAL_EPSILON {
            return false;
        }
        (n0 - n1).abs() <= CONFORMAL_EPSILON * n0.max(1.0)
            && col0.dot(&col1).abs() <= CONFORMAL_EPSILON * n0 * n1
    }

    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
    }
}

impl Default for LinearMap {
    fn default() -> Self {
        Self::identity()
    }
}
