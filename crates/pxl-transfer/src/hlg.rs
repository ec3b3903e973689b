//! BT.2100 hybrid log-gamma.
//!
//! `to_linear` is the inverse OETF and yields scene-linear light in
//! `[0, 1]`; no OOTF is applied.

const A: f32 = 0.17883277;
const B: f32 = 0.28466892;
const C: f32 = 0.55991073;

/// HLG signal to scene linear.
#[inline]
pub fn to_linear(v: f32) -> f32 {
    if v <= 0.0 {
        0.0
    } else if v <= 0.5 {
        v * v / 3.0
    } else {
        (((v - C) / A).exp() + B) / 12.0
    }
}

/// Scene linear to HLG signal.
#[inline]
pub fn from_linear(l: f32) -> f32 {
    if l <= 0.0 {
        0.0
    } else if l <= 1.0 / 12.0 {
        (3.0 * l).sqrt()
    } else {
        A * (12.0 * l - B).ln() + C
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_segments_meet() {
        assert_abs_diff_eq!(from_linear(1.0 / 12.0), 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(to_linear(0.5), 1.0 / 12.0, epsilon = 1e-5);
        assert_abs_diff_eq!(to_linear(1.0), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_roundtrip() {
        for i in 0..=50 {
            let l = i as f32 / 50.0;
            assert_abs_diff_eq!(to_linear(from_linear(l)), l, epsilon = 1e-4);
        }
    }
}
