//! Resampling kernels and their weight functions.
//!
//! # Kernels
//!
//! | Kernel | Taps | Form |
//! |--------|------|------|
//! | [`Nearest`](ResamplingKernel::Nearest) | 1 | floor of the source coordinate |
//! | [`Bilinear`](ResamplingKernel::Bilinear) | 2 | `(1-d, d)` |
//! | [`Hermite`](ResamplingKernel::Hermite) | 4 | B/C spline, `B=0, C=0` |
//! | [`Mitchell`](ResamplingKernel::Mitchell) | 4 | B/C spline, `B=1/3, C=1/3` |
//! | [`BSpline`](ResamplingKernel::BSpline) | 4 | B/C spline, `B=1, C=0` |
//! | [`CatmullRom`](ResamplingKernel::CatmullRom) | 4 | closed form, zero outside `d ∈ [0, 1]` |
//! | [`GenericCubic`](ResamplingKernel::GenericCubic) | 4 | Keys cubic convolution, `a = -0.5` |
//! | [`Lanczos`](ResamplingKernel::Lanczos) | 6 | `sinc(πx)·sinc(πx/3)` |
//! | [`Hann`](ResamplingKernel::Hann) | 6 | `cos²(πx/6)` |
//!
//! Cubic weights are used as computed. Windowed-sinc weights are
//! normalized by their sum when the sum is non-zero.

use crate::ResampleError;
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Support radius of the windowed-sinc kernels.
pub const WINDOW_RADIUS: usize = 3;

/// Keys cubic convolution parameter used by [`ResamplingKernel::GenericCubic`].
pub const KEYS_A: f32 = -0.5;

/// Resampling kernel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResamplingKernel {
    /// Nearest neighbor.
    Nearest,
    /// Bilinear interpolation over the 2×2 neighborhood.
    #[default]
    Bilinear,
    /// Cubic Hermite (B/C spline with `B=0, C=0`).
    Hermite,
    /// Mitchell-Netravali (`B=1/3, C=1/3`).
    Mitchell,
    /// Cubic B-spline (`B=1, C=0`), smoothing.
    BSpline,
    /// Catmull-Rom spline.
    CatmullRom,
    /// Keys cubic convolution with `a = -0.5`.
    GenericCubic,
    /// Lanczos windowed sinc, `a = 3`.
    Lanczos,
    /// Hann windowed kernel, `a = 3`.
    Hann,
}

impl ResamplingKernel {
    /// Every kernel, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Nearest,
        Self::Bilinear,
        Self::Hermite,
        Self::Mitchell,
        Self::BSpline,
        Self::CatmullRom,
        Self::GenericCubic,
        Self::Lanczos,
        Self::Hann,
    ];

    /// Configuration name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "Nearest",
            Self::Bilinear => "Bilinear",
            Self::Hermite => "Hermite",
            Self::Mitchell => "Mitchell",
            Self::BSpline => "BSpline",
            Self::CatmullRom => "CatmullRom",
            Self::GenericCubic => "GenericCubic",
            Self::Lanczos => "Lanczos",
            Self::Hann => "Hann",
        }
    }

    /// Source samples read along each axis.
    #[inline]
    pub const fn taps(&self) -> usize {
        match self {
            Self::Nearest => 1,
            Self::Bilinear => 2,
            Self::Lanczos | Self::Hann => 2 * WINDOW_RADIUS,
            _ => 4,
        }
    }

    /// B/C parameters, for the spline presets.
    pub const fn bc_spline(&self) -> Option<BcSpline> {
        match self {
            Self::Hermite => Some(BcSpline::HERMITE),
            Self::Mitchell => Some(BcSpline::MITCHELL),
            Self::BSpline => Some(BcSpline::B_SPLINE),
            _ => None,
        }
    }

    /// Whether weights are divided by their sum.
    #[inline]
    pub const fn is_windowed_sinc(&self) -> bool {
        matches!(self, Self::Lanczos | Self::Hann)
    }

    /// Taps read before `floor(pos)`.
    #[inline]
    pub const fn lead(&self) -> usize {
        (self.taps() - 1) / 2
    }

    /// Weights for the taps around `pos`, starting at `floor(pos) - lead()`.
    ///
    /// `frac` is `pos - floor(pos)`.
    pub fn weights(&self, frac: f32, out: &mut [f32; 6]) {
        match self {
            Self::Nearest => out[0] = 1.0,
            Self::Bilinear => {
                out[0] = 1.0 - frac;
                out[1] = frac;
            }
            Self::Hermite => out[..4].copy_from_slice(&BcSpline::HERMITE.weights(frac)),
            Self::Mitchell => out[..4].copy_from_slice(&BcSpline::MITCHELL.weights(frac)),
            Self::BSpline => out[..4].copy_from_slice(&BcSpline::B_SPLINE.weights(frac)),
            Self::CatmullRom => out[..4].copy_from_slice(&catmull_rom_weights(frac)),
            Self::GenericCubic => out[..4].copy_from_slice(&keys_weights(frac, KEYS_A)),
            Self::Lanczos | Self::Hann => {
                let a = WINDOW_RADIUS as f32;
                for (i, w) in out.iter_mut().enumerate() {
                    // tap offsets -2..=3
                    let x = frac - (i as f32 - (a - 1.0));
                    *w = if *self == Self::Lanczos { lanczos(x, a) } else { hann(x, a) };
                }
            }
        }
    }
}

impl fmt::Display for ResamplingKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResamplingKernel {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ResampleError::UnknownKernel(s.to_string()))
    }
}

/// Mitchell-Netravali B/C cubic spline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BcSpline {
    /// Blur parameter.
    pub b: f32,
    /// Ringing parameter.
    pub c: f32,
}

impl BcSpline {
    /// `B=0, C=0`.
    pub const HERMITE: Self = Self { b: 0.0, c: 0.0 };
    /// `B=1/3, C=1/3`.
    pub const MITCHELL: Self = Self {
        b: 1.0 / 3.0,
        c: 1.0 / 3.0,
    };
    /// `B=1, C=0`.
    pub const B_SPLINE: Self = Self { b: 1.0, c: 0.0 };

    /// Weights of the four samples `p0..p3` around a fractional offset `d`
    /// between `p1` and `p2`. They always sum to one.
    #[inline]
    pub fn weights(&self, d: f32) -> [f32; 4] {
        let (b, c) = (self.b, self.c);
        let d2 = d * d;
        let d3 = d2 * d;
        [
            (-b / 6.0 - c) * d3 + (b / 2.0 + 2.0 * c) * d2 + (-b / 2.0 - c) * d + b / 6.0,
            (2.0 - 1.5 * b - c) * d3 + (2.0 * b + c - 3.0) * d2 + (1.0 - b / 3.0),
            (1.5 * b + c - 2.0) * d3 + (3.0 - 2.5 * b - 2.0 * c) * d2 + (b / 2.0 + c) * d + b / 6.0,
            (b / 6.0 + c) * d3 - c * d2,
        ]
    }

    /// Kernel value at distance `x`.
    pub fn eval(&self, x: f32) -> f32 {
        let (b, c) = (self.b, self.c);
        let ax = x.abs();
        if ax < 1.0 {
            ((12.0 - 9.0 * b - 6.0 * c) * ax * ax * ax
                + (-18.0 + 12.0 * b + 6.0 * c) * ax * ax
                + (6.0 - 2.0 * b))
                / 6.0
        } else if ax < 2.0 {
            ((-b - 6.0 * c) * ax * ax * ax
                + (6.0 * b + 30.0 * c) * ax * ax
                + (-12.0 * b - 48.0 * c) * ax
                + (8.0 * b + 24.0 * c))
                / 6.0
        } else {
            0.0
        }
    }
}

/// Catmull-Rom weights for `p0..p3`; all zero when `d` is outside `[0, 1]`.
#[inline]
pub fn catmull_rom_weights(d: f32) -> [f32; 4] {
    if !(0.0..=1.0).contains(&d) {
        return [0.0; 4];
    }
    let d2 = d * d;
    let d3 = d2 * d;
    [
        0.5 * (-d + 2.0 * d2 - d3),
        1.0 + 0.5 * (3.0 * d3 - 5.0 * d2),
        0.5 * (d + 4.0 * d2 - 3.0 * d3),
        0.5 * (d3 - d2),
    ]
}

/// Keys cubic convolution kernel.
#[inline]
pub fn keys_cubic(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    let ax2 = ax * ax;
    let ax3 = ax2 * ax;
    if ax < 1.0 {
        (a + 2.0) * ax3 - (a + 3.0) * ax2 + 1.0
    } else if ax < 2.0 {
        a * ax3 - 5.0 * a * ax2 + 8.0 * a * ax - 4.0 * a
    } else {
        0.0
    }
}

/// Keys weights for taps at offsets `-1..=2` from `floor(pos)`.
#[inline]
pub fn keys_weights(d: f32, a: f32) -> [f32; 4] {
    [
        keys_cubic(d + 1.0, a),
        keys_cubic(d, a),
        keys_cubic(d - 1.0, a),
        keys_cubic(d - 2.0, a),
    ]
}

/// Lanczos window: `sinc(πx)·sinc(πx/a)` for `|x| < a`.
#[inline]
pub fn lanczos(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Hann window: `cos²(πx/(2a))` for `|x| <= a`.
#[inline]
pub fn hann(x: f32, a: f32) -> f32 {
    if x.abs() <= a {
        let v = (PI * x / (2.0 * a)).cos();
        v * v
    } else {
        0.0
    }
}
