//! 3x3 gamut matrix.
//!
//! Coefficients are stored row-major as nine floats, the layout color
//! transforms receive them in. Matrices multiply column vectors:
//! `M * v` transforms `v`, and `A * B` applies `B` first.

use crate::Vec3;
use std::ops::Mul;

/// Row-major 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// `[c0, c1, ..., c8]`, row by row.
    pub c: [f32; 9],
}

impl Mat3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        c: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// From nine row-major coefficients.
    #[inline]
    pub const fn from_array(c: [f32; 9]) -> Self {
        Self { c }
    }

    /// From three rows.
    #[inline]
    pub const fn from_rows(r0: [f32; 3], r1: [f32; 3], r2: [f32; 3]) -> Self {
        Self {
            c: [r0[0], r0[1], r0[2], r1[0], r1[1], r1[2], r2[0], r2[1], r2[2]],
        }
    }

    /// From three column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self {
            c: [c0.x, c1.x, c2.x, c0.y, c1.y, c2.y, c0.z, c1.z, c2.z],
        }
    }

    /// Diagonal matrix.
    #[inline]
    pub const fn diagonal(d: Vec3) -> Self {
        Self {
            c: [d.x, 0.0, 0.0, 0.0, d.y, 0.0, 0.0, 0.0, d.z],
        }
    }

    /// Row-major coefficients.
    #[inline]
    pub const fn to_array(&self) -> [f32; 9] {
        self.c
    }

    /// Row `i` as a vector.
    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::new(self.c[i * 3], self.c[i * 3 + 1], self.c[i * 3 + 2])
    }

    /// Transposed matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        let c = &self.c;
        Self {
            c: [c[0], c[3], c[6], c[1], c[4], c[7], c[2], c[5], c[8]],
        }
    }

    /// Determinant.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.to_glam().determinant()
    }

    /// Inverse, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-10 || !det.is_finite() {
            return None;
        }
        Some(Self::from_glam(self.to_glam().inverse()))
    }

    /// Transforms a column vector.
    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        let c = &self.c;
        Vec3::new(
            v.x * c[0] + v.y * c[1] + v.z * c[2],
            v.x * c[3] + v.y * c[4] + v.z * c[5],
            v.x * c[6] + v.y * c[7] + v.z * c[8],
        )
    }

    /// Transforms an RGB triplet.
    #[inline]
    pub fn transform_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        self.transform(Vec3::from_array(rgb)).to_array()
    }

    /// Whether every coefficient is within `eps` of the identity.
    pub fn is_identity(&self, eps: f32) -> bool {
        self.c
            .iter()
            .zip(Self::IDENTITY.c.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }

    /// Whether every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.c.iter().all(|v| v.is_finite())
    }

    // glam is column-major
    #[inline]
    fn to_glam(self) -> glam::Mat3 {
        glam::Mat3::from_cols(
            self.transpose_cols(0),
            self.transpose_cols(1),
            self.transpose_cols(2),
        )
    }

    #[inline]
    fn transpose_cols(&self, col: usize) -> glam::Vec3 {
        glam::Vec3::new(self.c[col], self.c[3 + col], self.c[6 + col])
    }

    #[inline]
    fn from_glam(m: glam::Mat3) -> Self {
        Self::from_cols(
            Vec3::from_glam(m.x_axis),
            Vec3::from_glam(m.y_axis),
            Vec3::from_glam(m.z_axis),
        )
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_glam(self.to_glam() * rhs.to_glam())
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.transform(v)
    }
}

impl Mul<Vec3> for &Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.transform(v)
    }
}
