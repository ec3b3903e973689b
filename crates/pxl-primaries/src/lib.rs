//! # pxl-primaries
//!
//! Color primaries, color space profiles and the gamut matrices between them.
//!
//! A [`ColorSpaceProfile`] bundles what the color pipeline needs to know
//! about an RGB space: its primaries and white point, the luma coefficients
//! used by tone curves, and the luminance of reference white in nits.
//! Profiles are plain values; the well-known ones come from
//! [`StandardProfile`], others are built from primaries carried by an
//! embedded container profile.
//!
//! # Usage
//!
//! ```rust
//! use pxl_primaries::{gamut_matrix, StandardProfile};
//! use pxl_math::Vec3;
//!
//! let src = StandardProfile::Rec2020.profile();
//! let dst = StandardProfile::Rec709.profile();
//! let m = gamut_matrix(&src, &dst).unwrap();
//!
//! // white stays white
//! let w = m * Vec3::ONE;
//! assert!((w.x - 1.0).abs() < 1e-3 && (w.y - 1.0).abs() < 1e-3);
//! ```
//!
//! # Dependencies
//!
//! - [`pxl-math`] - Matrices and Bradford adaptation
//! - [`thiserror`] - Error derive
//! - [`serde`] (optional) - Derives for [`StandardProfile`]
//!
//! # Used By
//!
//! - `pxl-color` - Gamut step and luma coefficients
//! - `pxl-pipeline` - Profile selection from configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod profile;

pub use profile::*;

use pxl_math::{bradford_adaptation, same_white, Mat3, Vec3};
use thiserror::Error;

/// Result alias for primaries operations.
pub type PrimariesResult<T> = std::result::Result<T, PrimariesError>;

/// Errors building matrices from chromaticities.
#[derive(Debug, Error)]
pub enum PrimariesError {
    /// The primaries are collinear or a chromaticity has `y = 0`.
    #[error("degenerate primaries: {0}")]
    Degenerate(String),

    /// Luma coefficients are not finite or do not sum to about 1.
    #[error("invalid luma coefficients {0:?}")]
    InvalidLuma([f32; 3]),

    /// Reference white luminance is not positive.
    #[error("invalid reference white {0} nits")]
    InvalidWhiteNits(f32),
}

/// D65 white point chromaticity.
pub const D65_XY: (f32, f32) = (0.3127, 0.3290);

/// D50 white point chromaticity.
pub const D50_XY: (f32, f32) = (0.3457, 0.3585);

/// DCI theater white point chromaticity.
pub const DCI_XY: (f32, f32) = (0.3140, 0.3510);

/// RGB primaries and white point as CIE xy chromaticities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    /// Red primary
    pub r: (f32, f32),
    /// Green primary
    pub g: (f32, f32),
    /// Blue primary
    pub b: (f32, f32),
    /// White point
    pub w: (f32, f32),
}

impl Primaries {
    /// From a `[[x, y]; 3]` chromaticity matrix and a white point.
    pub const fn from_matrix(rgb: [[f32; 2]; 3], white: (f32, f32)) -> Self {
        Self {
            r: (rgb[0][0], rgb[0][1]),
            g: (rgb[1][0], rgb[1][1]),
            b: (rgb[2][0], rgb[2][1]),
            w: white,
        }
    }

    /// White point as XYZ with `Y = 1`.
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        Vec3::from_xy(self.w.0, self.w.1)
    }
}

/// BT.709 / sRGB primaries, D65.
pub const REC709: Primaries = Primaries::from_matrix([[0.640, 0.330], [0.300, 0.600], [0.150, 0.060]], D65_XY);

/// BT.2020 / BT.2100 primaries, D65.
pub const REC2020: Primaries = Primaries::from_matrix([[0.708, 0.292], [0.170, 0.797], [0.131, 0.046]], D65_XY);

/// Display P3 primaries, D65.
pub const DISPLAY_P3: Primaries = Primaries::from_matrix([[0.680, 0.320], [0.265, 0.690], [0.150, 0.060]], D65_XY);

/// DCI-P3 primaries, DCI white.
pub const DCI_P3: Primaries = Primaries::from_matrix([[0.680, 0.320], [0.265, 0.690], [0.150, 0.060]], DCI_XY);

/// RGB to XYZ for a set of primaries.
///
/// Columns are the primaries' XYZ scaled so `RGB(1, 1, 1)` lands on the
/// white point.
pub fn rgb_to_xyz_matrix(p: &Primaries) -> PrimariesResult<Mat3> {
    for (name, (_, y)) in [("red", p.r), ("green", p.g), ("blue", p.b), ("white", p.w)] {
        if y == 0.0 || !y.is_finite() {
            return Err(PrimariesError::Degenerate(format!("{name} has y = {y}")));
        }
    }
    let r = Vec3::from_xy(p.r.0, p.r.1);
    let g = Vec3::from_xy(p.g.0, p.g.1);
    let b = Vec3::from_xy(p.b.0, p.b.1);
    let m = Mat3::from_cols(r, g, b);
    let inv = m
        .inverse()
        .ok_or_else(|| PrimariesError::Degenerate("primaries are collinear".into()))?;
    let s = inv * p.white_xyz();
    Ok(Mat3::from_cols(r * s.x, g * s.y, b * s.z))
}

/// XYZ to RGB for a set of primaries.
pub fn xyz_to_rgb_matrix(p: &Primaries) -> PrimariesResult<Mat3> {
    rgb_to_xyz_matrix(p)?
        .inverse()
        .ok_or_else(|| PrimariesError::Degenerate("RGB to XYZ matrix is singular".into()))
}

/// Matrix taking linear RGB in `src` to linear RGB in `dst`.
///
/// Goes through XYZ; a Bradford adaptation is inserted when the white
/// points differ.
pub fn rgb_to_rgb_matrix(src: &Primaries, dst: &Primaries) -> PrimariesResult<Mat3> {
    let to_xyz = rgb_to_xyz_matrix(src)?;
    let from_xyz = xyz_to_rgb_matrix(dst)?;
    let (sw, dw) = (src.white_xyz(), dst.white_xyz());
    if same_white(sw, dw) {
        Ok(from_xyz * to_xyz)
    } else {
        Ok(from_xyz * bradford_adaptation(sw, dw) * to_xyz)
    }
}

/// Gamut matrix between two profiles, row-major coefficients ready for
/// the color transform.
pub fn gamut_matrix(src: &ColorSpaceProfile, dst: &ColorSpaceProfile) -> PrimariesResult<Mat3> {
    rgb_to_rgb_matrix(src.primaries(), dst.primaries())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rec709_to_xyz() {
        let m = rgb_to_xyz_matrix(&REC709).unwrap();
        // standard sRGB matrix
        let expected = [
            0.4124, 0.3576, 0.1805, 0.2126, 0.7152, 0.0722, 0.0193, 0.1192, 0.9505,
        ];
        for (a, b) in m.c.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_rec709_to_rec2020() {
        let m = rgb_to_rgb_matrix(&REC709, &REC2020).unwrap();
        let expected = [
            0.6274, 0.3293, 0.0433, 0.0691, 0.9195, 0.0114, 0.0164, 0.0880, 0.8956,
        ];
        for (a, b) in m.c.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_roundtrip_is_identity() {
        let there = rgb_to_rgb_matrix(&DISPLAY_P3, &REC2020).unwrap();
        let back = rgb_to_rgb_matrix(&REC2020, &DISPLAY_P3).unwrap();
        assert!((back * there).is_identity(1e-4));
    }

    #[test]
    fn test_white_adaptation() {
        // DCI white maps onto D65 white
        let m = rgb_to_rgb_matrix(&DCI_P3, &DISPLAY_P3).unwrap();
        let w = m * Vec3::ONE;
        assert_abs_diff_eq!(w.x, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(w.y, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(w.z, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_degenerate_primaries() {
        let flat = Primaries::from_matrix([[0.2, 0.2], [0.4, 0.4], [0.6, 0.6]], D65_XY);
        assert!(rgb_to_xyz_matrix(&flat).is_err());
        let zero_y = Primaries::from_matrix([[0.64, 0.0], [0.3, 0.6], [0.15, 0.06]], D65_XY);
        assert!(matches!(rgb_to_xyz_matrix(&zero_y), Err(PrimariesError::Degenerate(_))));
    }
}
