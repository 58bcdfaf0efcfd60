use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, Point};

/// A 2D affine transform.
///
/// Column-vector convention: `x' = m11*x + m12*y + dx`,
/// `y' = m21*x + m22*y + dy`. Rotation angles are degrees,
/// counter-clockwise positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    /// SVG `matrix(a b c d e f)` element order.
    pub fn from_svg(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            m11: a,
            m12: c,
            m21: b,
            m22: d,
            dx: e,
            dy: f,
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            m11: sx,
            m22: sy,
            ..Self::IDENTITY
        }
    }

    pub fn scale_about(sx: f64, sy: f64, center: Point) -> Self {
        Matrix::translation(-center.x, -center.y)
            .then(Matrix::scale(sx, sy))
            .then(Matrix::translation(center.x, center.y))
    }

    pub fn rotation_deg(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self {
            m11: c,
            m12: -s,
            m21: s,
            m22: c,
            ..Self::IDENTITY
        }
    }

    pub fn rotation_deg_about(degrees: f64, center: Point) -> Self {
        Matrix::translation(-center.x, -center.y)
            .then(Matrix::rotation_deg(degrees))
            .then(Matrix::translation(center.x, center.y))
    }

    /// Compose: apply `self` first, then `next`.
    pub fn then(&self, next: Matrix) -> Matrix {
        Matrix {
            m11: next.m11 * self.m11 + next.m12 * self.m21,
            m12: next.m11 * self.m12 + next.m12 * self.m22,
            m21: next.m21 * self.m11 + next.m22 * self.m21,
            m22: next.m21 * self.m12 + next.m22 * self.m22,
            dx: next.m11 * self.dx + next.m12 * self.dy + next.dx,
            dy: next.m21 * self.dx + next.m22 * self.dy + next.dy,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.m11 * p.x + self.m12 * p.y + self.dx,
            self.m21 * p.x + self.m22 * p.y + self.dy,
        )
    }

    /// Apply the linear part only (no translation).
    pub fn apply_vector(&self, p: Point) -> Point {
        Point::new(self.m11 * p.x + self.m12 * p.y, self.m21 * p.x + self.m22 * p.y)
    }

    /// Transform an axis-aligned box and re-box the result.
    pub fn apply_bbox(&self, bb: &BBox) -> BBox {
        let corners = [
            self.apply(bb.min),
            self.apply(Point::new(bb.max.x, bb.min.y)),
            self.apply(bb.max),
            self.apply(Point::new(bb.min.x, bb.max.y)),
        ];
        BBox::from_points(&corners).unwrap_or(*bb)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn approx_eq(&self, other: &Matrix, epsilon: f64) -> bool {
        (self.m11 - other.m11).abs() < epsilon
            && (self.m12 - other.m12).abs() < epsilon
            && (self.m21 - other.m21).abs() < epsilon
            && (self.m22 - other.m22).abs() < epsilon
            && (self.dx - other.dx).abs() < epsilon
            && (self.dy - other.dy).abs() < epsilon
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}
