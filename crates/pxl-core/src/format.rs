//! Sample kinds and the traits that tie them to Rust element types.
//!
//! # Types
//!
//! - [`SampleKind`] - Runtime tag for how a buffer stores its samples
//! - [`Sample`] - Storage element of a [`PixelBuffer`](crate::PixelBuffer)
//! - [`NumericSample`] - Samples that carry one channel value each
//!
//! # Storage
//!
//! | Kind | Element | Channels per element | Bit depth |
//! |------|---------|----------------------|-----------|
//! | `U8` | `u8` | 1 | 8 |
//! | `U16` | `u16` | 1 | 9..=16 |
//! | `HalfFloat16` | `f16` | 1 | 16 |
//! | `Packed1010102` | `u32` | 4 | 10 (alpha 2) |

use half::f16;
use std::fmt;

/// How the samples of a buffer are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleKind {
    /// 8-bit unsigned integer per channel.
    U8,
    /// 9 to 16-bit unsigned integer per channel, stored in `u16`.
    U16,
    /// IEEE 754 binary16 per channel.
    HalfFloat16,
    /// One 32-bit word per pixel: `(a2 << 30) | (r10 << 20) | (g10 << 10) | b10`.
    Packed1010102,
}

impl SampleKind {
    /// Bytes each channel occupies.
    ///
    /// Packed words hold four channels in four bytes, so each channel
    /// accounts for one byte of the row.
    #[inline]
    pub const fn bytes_per_sample(&self) -> usize {
        match self {
            Self::U8 | Self::Packed1010102 => 1,
            Self::U16 | Self::HalfFloat16 => 2,
        }
    }

    /// Stored elements per pixel for the given channel count.
    #[inline]
    pub const fn elements_per_pixel(&self, channels: usize) -> usize {
        match self {
            Self::Packed1010102 => 1,
            _ => channels,
        }
    }

    /// Whether samples are floating point.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::HalfFloat16)
    }

    /// Short display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::U8 => "U8",
            Self::U16 => "U16",
            Self::HalfFloat16 => "HalfFloat16",
            Self::Packed1010102 => "Packed1010102",
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Largest integer value representable at `bit_depth` bits.
///
/// ```rust
/// use pxl_core::max_value;
///
/// assert_eq!(max_value(8), 255);
/// assert_eq!(max_value(10), 1023);
/// ```
#[inline]
pub const fn max_value(bit_depth: u32) -> u32 {
    if bit_depth >= 32 {
        u32::MAX
    } else {
        (1u32 << bit_depth) - 1
    }
}

/// Storage element of a pixel buffer.
pub trait Sample: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Runtime tag for this element type.
    const KIND: SampleKind;
    /// Smallest accepted bit depth.
    const MIN_BIT_DEPTH: u32;
    /// Largest accepted bit depth, also the default.
    const MAX_BIT_DEPTH: u32;
}

/// A sample holding exactly one channel value.
///
/// Integer samples round half up and clamp to `[0, max]`; half floats
/// clamp to the finite binary16 range and map NaN to zero.
pub trait NumericSample: Sample {
    /// Whether values are floating point.
    const IS_FLOAT: bool;

    /// Raw value as `f32` (no normalization).
    fn to_f32(self) -> f32;

    /// Converts from `f32`, clamping to `[0, max]` for integers.
    fn from_f32_clamped(v: f32, max: f32) -> Self;

    /// Maximum value for `bit_depth`, as `f32`. `1.0` for floats.
    #[inline]
    fn max_for_depth(bit_depth: u32) -> f32 {
        if Self::IS_FLOAT {
            1.0
        } else {
            max_value(bit_depth) as f32
        }
    }
}

impl Sample for u8 {
    const KIND: SampleKind = SampleKind::U8;
    const MIN_BIT_DEPTH: u32 = 8;
    const MAX_BIT_DEPTH: u32 = 8;
}

impl NumericSample for u8 {
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32_clamped(v: f32, max: f32) -> Self {
        // NaN casts to 0
        (v.clamp(0.0, max) + 0.5) as u8
    }
}

impl Sample for u16 {
    const KIND: SampleKind = SampleKind::U16;
    const MIN_BIT_DEPTH: u32 = 9;
    const MAX_BIT_DEPTH: u32 = 16;
}

impl NumericSample for u16 {
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32_clamped(v: f32, max: f32) -> Self {
        (v.clamp(0.0, max) + 0.5) as u16
    }
}

impl Sample for f16 {
    const KIND: SampleKind = SampleKind::HalfFloat16;
    const MIN_BIT_DEPTH: u32 = 16;
    const MAX_BIT_DEPTH: u32 = 16;
}

impl NumericSample for f16 {
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32_clamped(v: f32, _max: f32) -> Self {
        if v.is_nan() {
            return f16::ZERO;
        }
        f16::from_f32(v.clamp(-65504.0, 65504.0))
    }
}

impl Sample for u32 {
    const KIND: SampleKind = SampleKind::Packed1010102;
    const MIN_BIT_DEPTH: u32 = 10;
    const MAX_BIT_DEPTH: u32 = 10;
}
