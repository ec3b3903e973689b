//! sRGB curve: a linear toe below 0.04045, a 2.4 power above.

/// Encoded sRGB to linear.
///
/// ```rust
/// assert_eq!(pxl_transfer::srgb::to_linear(0.0), 0.0);
/// assert!((pxl_transfer::srgb::to_linear(1.0) - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear to encoded sRGB.
#[inline]
pub fn from_linear(l: f32) -> f32 {
    if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}
