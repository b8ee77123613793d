//! Homogeneous 4x4 transforms.
//!
//! Points are `[x, y, z]` with an implicit `w = 1`. Translation and rotation
//! compose by matrix multiplication so a pivot rotation is a single matrix.

use std::ops::Mul;

/// Row-major affine transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    m: [[f64; 4]; 4],
}

impl Transform {
    /// Translation by `d`.
    #[must_use]
    pub const fn translation(d: [f64; 3]) -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, d[0]],
                [0.0, 1.0, 0.0, d[1]],
                [0.0, 0.0, 1.0, d[2]],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Right-handed rotation about the vertical axis.
    ///
    /// A positive angle turns `+z` toward `+x`.
    #[must_use]
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m: [
                [c, 0.0, s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [-s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation about the vertical line through `pivot`.
    #[must_use]
    pub fn rotation_y_about(angle: f64, pivot: [f64; 3]) -> Self {
        let back = Self::translation([-pivot[0], -pivot[1], -pivot[2]]);
        Self::translation(pivot) * Self::rotation_y(angle) * back
    }

    /// Applies the transform to a point.
    #[inline]
    #[must_use]
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let m = &self.m;
        [
            m[0][0] * p[0] + m[0][1] * p[1] + m[0][2] * p[2] + m[0][3],
            m[1][0] * p[0] + m[1][1] * p[1] + m[1][2] * p[2] + m[1][3],
            m[2][0] * p[0] + m[2][1] * p[1] + m[2][2] * p[2] + m[2][3],
        ]
    }

    /// Applies only the linear part, for displacements.
    #[inline]
    #[must_use]
    pub fn apply_vector(&self, v: [f64; 3]) -> [f64; 3] {
        let m = &self.m;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }
}

/// Matrix product: `a * b` applies `b` first, then `a`.
impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Self { m }
    }
}
