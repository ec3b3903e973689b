//! Pure power-law curves.
//!
//! Negative inputs are passed through as zero: the power of a negative
//! base is undefined for non-integer exponents.

/// Encoded to linear: `v^gamma`.
#[inline]
pub fn to_linear(v: f32, gamma: f32) -> f32 {
    if v <= 0.0 { 0.0 } else { v.powf(gamma) }
}

/// Linear to encoded: `l^(1/gamma)`.
#[inline]
pub fn from_linear(l: f32, gamma: f32) -> f32 {
    if l <= 0.0 || gamma == 0.0 {
        0.0
    } else {
        l.powf(1.0 / gamma)
    }
}
