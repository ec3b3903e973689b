//! SMPTE ST 2084 perceptual quantizer.
//!
//! Signals are normalized to `[0, 1]`. On the linear side `1.0` is the
//! BT.2408 reference white of 203 nits, so the 10 000 nit peak is
//! `10000 / 203`. [`to_nits`] and [`from_nits`] work in absolute
//! luminance.

const M1: f32 = 2610.0 / 16384.0;
const M2: f32 = 2523.0 / 4096.0 * 128.0;
const C1: f32 = 3424.0 / 4096.0;
const C2: f32 = 2413.0 / 4096.0 * 32.0;
const C3: f32 = 2392.0 / 4096.0 * 32.0;

/// Peak luminance of the PQ signal range.
pub const PEAK_NITS: f32 = 10000.0;

/// Luminance that maps to linear `1.0`.
pub const REFERENCE_WHITE_NITS: f32 = 203.0;

/// PQ signal to absolute luminance in nits.
#[inline]
pub fn to_nits(v: f32) -> f32 {
    let v = v.clamp(0.0, 1.0);
    let p = v.powf(1.0 / M2);
    let num = (p - C1).max(0.0);
    let den = C2 - C3 * p;
    if den <= 0.0 {
        return PEAK_NITS;
    }
    PEAK_NITS * (num / den).powf(1.0 / M1)
}

/// Absolute luminance in nits to PQ signal.
#[inline]
pub fn from_nits(nits: f32) -> f32 {
    let y = (nits / PEAK_NITS).clamp(0.0, 1.0);
    let p = y.powf(M1);
    ((C1 + C2 * p) / (1.0 + C3 * p)).powf(M2)
}

/// PQ signal to linear, `1.0` = 203 nits.
#[inline]
pub fn to_linear(v: f32) -> f32 {
    to_nits(v) / REFERENCE_WHITE_NITS
}

/// Linear (`1.0` = 203 nits) to PQ signal.
#[inline]
pub fn from_linear(l: f32) -> f32 {
    from_nits(l * REFERENCE_WHITE_NITS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_points() {
        assert_eq!(to_nits(0.0), 0.0);
        assert_relative_eq!(to_nits(1.0), 10000.0, max_relative = 1e-3);
        // 100 nits encodes near 0.508
        assert!((from_nits(100.0) - 0.508).abs() < 0.002);
        // 203 nits encodes near 0.58
        assert!((from_linear(1.0) - 0.58).abs() < 0.002);
    }

    #[test]
    fn test_roundtrip() {
        for nits in [0.5, 10.0, 203.0, 1000.0, 4000.0] {
            assert_relative_eq!(to_nits(from_nits(nits)), nits, max_relative = 1e-3);
        }
    }
}
