//! Runtime selection of a transfer curve.

use crate::{gamma, hlg, pq, rec709, smpte428, srgb};
use std::fmt;

/// Identifies the linearize / gamma pair of a color encoding.
///
/// With the `serde` feature the variant is written as
/// `{ curve: Srgb }` or `{ curve: Gamma, exponent: 2.2 }`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "curve", content = "exponent", deny_unknown_fields)
)]
pub enum TransferFunction {
    /// IEC 61966-2-1.
    #[default]
    Srgb,
    /// Pure power law with the given exponent.
    Gamma(f32),
    /// SMPTE ST 2084, linear `1.0` = 203 nits.
    Pq,
    /// BT.2100 HLG, scene linear.
    Hlg,
    /// BT.709 camera curve.
    Rec709,
    /// SMPTE ST 428-1.
    Smpte428,
    /// Identity.
    Linear,
}

impl TransferFunction {
    /// Encoded value to linear light.
    #[inline]
    pub fn to_linear(&self, v: f32) -> f32 {
        match *self {
            Self::Srgb => srgb::to_linear(v),
            Self::Gamma(g) => gamma::to_linear(v, g),
            Self::Pq => pq::to_linear(v),
            Self::Hlg => hlg::to_linear(v),
            Self::Rec709 => rec709::to_linear(v),
            Self::Smpte428 => smpte428::to_linear(v),
            Self::Linear => v,
        }
    }

    /// Linear light to encoded value.
    #[inline]
    pub fn from_linear(&self, l: f32) -> f32 {
        match *self {
            Self::Srgb => srgb::from_linear(l),
            Self::Gamma(g) => gamma::from_linear(l, g),
            Self::Pq => pq::from_linear(l),
            Self::Hlg => hlg::from_linear(l),
            Self::Rec709 => rec709::from_linear(l),
            Self::Smpte428 => smpte428::from_linear(l),
            Self::Linear => l,
        }
    }

    /// Whether the curve encodes HDR signal (values above reference white).
    #[inline]
    pub fn is_hdr(&self) -> bool {
        matches!(self, Self::Pq | Self::Hlg)
    }

    /// Whether the exponent of a [`Gamma`](Self::Gamma) curve is usable.
    #[inline]
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Gamma(g) => g.is_finite() && g > 0.0,
            _ => true,
        }
    }

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Srgb => "sRGB",
            Self::Gamma(_) => "Gamma",
            Self::Pq => "PQ",
            Self::Hlg => "HLG",
            Self::Rec709 => "BT.709",
            Self::Smpte428 => "SMPTE-428",
            Self::Linear => "Linear",
        }
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gamma(g) => write!(f, "Gamma {g}"),
            other => f.write_str(other.name()),
        }
    }
}
