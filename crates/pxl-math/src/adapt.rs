//! White-point adaptation.
//!
//! Converting between color spaces with different white points (DCI-P3's
//! 0.314/0.351 against D65) needs a von Kries style adaptation in a cone
//! response space. Bradford is used throughout.

use crate::{Mat3, Vec3};

/// Bradford cone response matrix (XYZ to LMS).
pub const BRADFORD: Mat3 = Mat3::from_rows(
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
);

/// Inverse of [`BRADFORD`].
pub const BRADFORD_INV: Mat3 = Mat3::from_rows(
    [0.9869929, -0.1470543, 0.1599627],
    [0.4323053, 0.5183603, 0.0492912],
    [-0.0085287, 0.0400428, 0.9684867],
);

/// XYZ-to-XYZ matrix adapting `src_white` to `dst_white`.
///
/// Both whites are XYZ with `Y = 1` (see [`Vec3::from_xy`]). Returns the
/// identity when either white has a zero cone response.
///
/// ```rust
/// use pxl_math::{bradford_adaptation, Vec3};
///
/// let d65 = Vec3::from_xy(0.3127, 0.3290);
/// let dci = Vec3::from_xy(0.314, 0.351);
/// let m = bradford_adaptation(dci, d65);
/// let out = m * dci;
/// assert!((out.x - d65.x).abs() < 1e-3 && (out.z - d65.z).abs() < 1e-3);
/// ```
pub fn bradford_adaptation(src_white: Vec3, dst_white: Vec3) -> Mat3 {
    let src = BRADFORD * src_white;
    let dst = BRADFORD * dst_white;
    if src.x == 0.0 || src.y == 0.0 || src.z == 0.0 {
        return Mat3::IDENTITY;
    }
    let scale = Vec3::new(dst.x / src.x, dst.y / src.y, dst.z / src.z);
    BRADFORD_INV * Mat3::diagonal(scale) * BRADFORD
}

/// Whether two whites are close enough that adaptation is a no-op.
#[inline]
pub fn same_white(a: Vec3, b: Vec3) -> bool {
    (a - b).to_array().iter().all(|d| d.abs() < 1e-4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bradford_inverse_constant() {
        assert!((BRADFORD * BRADFORD_INV).is_identity(1e-4));
        let computed = BRADFORD.inverse().unwrap();
        for (a, b) in computed.c.iter().zip(BRADFORD_INV.c.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_same_white_is_identity() {
        let d65 = Vec3::from_xy(0.3127, 0.3290);
        assert!(bradford_adaptation(d65, d65).is_identity(1e-5));
        assert!(same_white(d65, d65));
    }

    #[test]
    fn test_maps_source_white_to_target() {
        let d50 = Vec3::from_xy(0.3457, 0.3585);
        let d65 = Vec3::from_xy(0.3127, 0.3290);
        let out = bradford_adaptation(d50, d65) * d50;
        assert_abs_diff_eq!(out.x, d65.x, epsilon = 1e-4);
        assert_abs_diff_eq!(out.y, d65.y, epsilon = 1e-4);
        assert_abs_diff_eq!(out.z, d65.z, epsilon = 1e-4);
        assert!(!same_white(d50, d65));
    }
}
