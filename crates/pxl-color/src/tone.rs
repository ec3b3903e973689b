//! Tone curves applied to linear light.
//!
//! Every curve maps luminance `L = kr·r + kg·g + kb·b` and scales the
//! pixel by `L_out / L`, so hue and saturation are kept. Pixels with
//! `L <= 0` pass through. Linear values are in units of reference white
//! (`1.0` = 203 nits for PQ).
//!
//! | Curve | `L_out` |
//! |-------|---------|
//! | Rec. 2408 | `L(1 + L·D/Ld²) / (1 + L/D)`, `Ld = content/ref`, `D = display/ref` |
//! | Rec. 2408 perceptual | BT.2408 EETF on the PQ signal |
//! | Logarithmic | `ln(1 + L) / ln 2` |
//! | Filmic | Hable curve, exposure bias 2, white 11.2 |
//! | ACES | Narkowicz fit, clamped to `[0, 1]` |

use crate::ColorError;
use pxl_transfer::pq;
use std::fmt;
use std::str::FromStr;

/// Display peak assumed when none is given.
pub const DEFAULT_DISPLAY_NITS: f32 = 250.0;

/// BT.2408 reference white.
pub const DEFAULT_REFERENCE_NITS: f32 = pq::REFERENCE_WHITE_NITS;

/// Content peak assumed when none is given.
pub const DEFAULT_CONTENT_NITS: f32 = 1000.0;

/// Maps linear luminance.
pub trait ToneMapper: Send + Sync {
    /// Output luminance for input luminance `l > 0`.
    fn map_luminance(&self, l: f32) -> f32;

    /// Tone maps interleaved linear RGB triplets in place.
    fn map_row(&self, rgb: &mut [f32], luma: [f32; 3]) {
        for px in rgb.chunks_exact_mut(3) {
            let l = luma[0] * px[0] + luma[1] * px[1] + luma[2] * px[2];
            if !(l.is_finite() && l > 0.0) {
                continue;
            }
            let scale = self.map_luminance(l) / l;
            px[0] *= scale;
            px[1] *= scale;
            px[2] *= scale;
        }
    }
}

/// Tone curve selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToneCurve {
    /// No tone mapping.
    #[default]
    None,
    /// BT.2408 highlight compression.
    Rec2408 {
        /// Content peak. Zero or less uses the transform's content brightness.
        content_nits: f32,
        /// Display peak.
        display_nits: f32,
        /// Reference white.
        reference_nits: f32,
        /// Use the PQ-domain EETF instead of the rational curve.
        perceptual: bool,
    },
    /// Logarithmic compression.
    Logarithmic,
    /// Hable filmic curve.
    Filmic,
    /// ACES approximation.
    Aces,
}

impl ToneCurve {
    /// Rec. 2408 with a 250 nit display, 203 nit reference white and the
    /// content peak taken from the transform.
    pub const fn rec2408(perceptual: bool) -> Self {
        Self::Rec2408 {
            content_nits: 0.0,
            display_nits: DEFAULT_DISPLAY_NITS,
            reference_nits: DEFAULT_REFERENCE_NITS,
            perceptual,
        }
    }

    /// Configuration name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Rec2408 { perceptual: false, .. } => "Rec2408",
            Self::Rec2408 { perceptual: true, .. } => "Rec2408Perceptual",
            Self::Logarithmic => "Logarithmic",
            Self::Filmic => "Filmic",
            Self::Aces => "Aces",
        }
    }

    /// Checks the Rec. 2408 luminances.
    pub fn validate(&self) -> Result<(), ColorError> {
        if let Self::Rec2408 {
            content_nits,
            display_nits,
            reference_nits,
            ..
        } = *self
        {
            ColorError::check_nits("display_nits", display_nits)?;
            ColorError::check_nits("reference_nits", reference_nits)?;
            if !content_nits.is_finite() {
                return Err(ColorError::InvalidNits {
                    name: "content_nits",
                    value: content_nits,
                });
            }
        }
        Ok(())
    }

    /// Builds the mapper, or `None` for [`ToneCurve::None`].
    pub fn mapper(&self, content_brightness_nits: f32) -> Option<Box<dyn ToneMapper>> {
        match *self {
            Self::None => None,
            Self::Rec2408 {
                content_nits,
                display_nits,
                reference_nits,
                perceptual,
            } => {
                let content = if content_nits > 0.0 { content_nits } else { content_brightness_nits };
                Some(Box::new(Rec2408ToneMapper::new(content, display_nits, reference_nits, perceptual)))
            }
            Self::Logarithmic => Some(Box::new(LogarithmicToneMapper)),
            Self::Filmic => Some(Box::new(FilmicToneMapper::default())),
            Self::Aces => Some(Box::new(AcesToneMapper)),
        }
    }
}

impl fmt::Display for ToneCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToneCurve {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::None,
            Self::rec2408(false),
            Self::rec2408(true),
            Self::Logarithmic,
            Self::Filmic,
            Self::Aces,
        ]
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| ColorError::UnknownToneCurve(s.to_string()))
    }
}

/// BT.2408 highlight compression toward the display peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rec2408ToneMapper {
    content: f32,
    display: f32,
    reference_nits: f32,
    perceptual: bool,
    pq_content: f32,
    max_lum: f32,
    knee: f32,
}

impl Rec2408ToneMapper {
    /// Creates a mapper from absolute luminances.
    pub fn new(content_nits: f32, display_nits: f32, reference_nits: f32, perceptual: bool) -> Self {
        let pq_content = pq::from_nits(content_nits);
        let max_lum = if pq_content > 0.0 { pq::from_nits(display_nits) / pq_content } else { 1.0 };
        Self {
            content: content_nits / reference_nits,
            display: display_nits / reference_nits,
            reference_nits,
            perceptual,
            pq_content,
            max_lum,
            knee: (1.5 * max_lum - 0.5).max(0.0),
        }
    }

    /// Display peak in reference-white units.
    #[inline]
    pub fn display_peak(&self) -> f32 {
        self.display
    }

    fn rational(&self, l: f32) -> f32 {
        let (ld, d) = (self.content, self.display);
        l * (1.0 + l * d / (ld * ld)) / (1.0 + l / d)
    }

    fn eetf(&self, l: f32) -> f32 {
        let e1 = (pq::from_nits(l * self.reference_nits) / self.pq_content).clamp(0.0, 1.0);
        let e2 = if e1 < self.knee {
            e1
        } else {
            let t = (e1 - self.knee) / (1.0 - self.knee);
            let (t2, t3) = (t * t, t * t * t);
            (2.0 * t3 - 3.0 * t2 + 1.0) * self.knee
                + (t3 - 2.0 * t2 + t) * (1.0 - self.knee)
                + (3.0 * t2 - 2.0 * t3) * self.max_lum
        };
        pq::to_nits(e2 * self.pq_content) / self.reference_nits
    }
}

impl ToneMapper for Rec2408ToneMapper {
    fn map_luminance(&self, l: f32) -> f32 {
        // content that already fits the display is left alone
        if self.content <= self.display {
            return l;
        }
        let l = l.min(self.content);
        if self.perceptual && self.knee < 1.0 {
            self.eetf(l)
        } else {
            self.rational(l)
        }
    }
}

/// `ln(1 + L) / ln 2`, so reference white stays at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogarithmicToneMapper;

impl ToneMapper for LogarithmicToneMapper {
    #[inline]
    fn map_luminance(&self, l: f32) -> f32 {
        l.ln_1p() / std::f32::consts::LN_2
    }
}

/// Hable (Uncharted 2) filmic curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmicToneMapper {
    exposure_bias: f32,
    white_scale: f32,
}

impl FilmicToneMapper {
    /// Curve with the given exposure bias and linear white point.
    pub fn new(exposure_bias: f32, white_point: f32) -> Self {
        Self {
            exposure_bias,
            white_scale: 1.0 / hable(white_point),
        }
    }
}

impl Default for FilmicToneMapper {
    fn default() -> Self {
        Self::new(2.0, 11.2)
    }
}

#[inline]
fn hable(x: f32) -> f32 {
    const A: f32 = 0.15;
    const B: f32 = 0.50;
    const C: f32 = 0.10;
    const D: f32 = 0.20;
    const E: f32 = 0.02;
    const F: f32 = 0.30;
    ((x * (A * x + C * B) + D * E) / (x * (A * x + B) + D * F)) - E / F
}

impl ToneMapper for FilmicToneMapper {
    #[inline]
    fn map_luminance(&self, l: f32) -> f32 {
        hable(l * self.exposure_bias) * self.white_scale
    }
}

/// Narkowicz ACES filmic fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcesToneMapper;

impl ToneMapper for AcesToneMapper {
    #[inline]
    fn map_luminance(&self, l: f32) -> f32 {
        const A: f32 = 2.51;
        const B: f32 = 0.03;
        const C: f32 = 2.43;
        const D: f32 = 0.59;
        const E: f32 = 0.14;
        ((l * (A * l + B)) / (l * (C * l + D) + E)).clamp(0.0, 1.0)
    }
}
