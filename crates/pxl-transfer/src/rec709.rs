//! BT.709 camera curve (also used by BT.2020 SDR).

const BETA: f32 = 0.018;
const ALPHA: f32 = 1.099;
const INV_THRESHOLD: f32 = 4.5 * BETA;

/// Encoded BT.709 to linear.
#[inline]
pub fn to_linear(v: f32) -> f32 {
    if v < INV_THRESHOLD {
        v / 4.5
    } else {
        ((v + (ALPHA - 1.0)) / ALPHA).powf(1.0 / 0.45)
    }
}

/// Linear to encoded BT.709.
#[inline]
pub fn from_linear(l: f32) -> f32 {
    if l < BETA {
        l * 4.5
    } else {
        ALPHA * l.powf(0.45) - (ALPHA - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_roundtrip() {
        for i in 0..=100 {
            let v = i as f32 / 100.0;
            assert_abs_diff_eq!(from_linear(to_linear(v)), v, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(to_linear(0.0), 0.0);
        assert_abs_diff_eq!(to_linear(1.0), 1.0, epsilon = 1e-5);
    }
}
