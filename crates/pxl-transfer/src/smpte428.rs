//! SMPTE ST 428-1 (DCDM X'Y'Z').
//!
//! `L = v^2.6 * 52.37 / 48`: code value 1.0 is 52.37 nits against a
//! 48 nit reference, so linear tops out slightly above 1.

const GAMMA: f32 = 2.6;
const SCALE: f32 = 52.37 / 48.0;

/// Encoded to linear.
#[inline]
pub fn to_linear(v: f32) -> f32 {
    v.max(0.0).powf(GAMMA) * SCALE
}

/// Linear to encoded.
#[inline]
pub fn from_linear(l: f32) -> f32 {
    (l.max(0.0) / SCALE).powf(1.0 / GAMMA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_peak() {
        assert_abs_diff_eq!(to_linear(1.0), 52.37 / 48.0, epsilon = 1e-6);
        assert_abs_diff_eq!(from_linear(52.37 / 48.0), 1.0, epsilon = 1e-5);
        assert_eq!(to_linear(-1.0), 0.0);
    }
}
