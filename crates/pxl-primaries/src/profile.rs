//! Color space profiles.

use crate::{
    rgb_to_xyz_matrix, Primaries, PrimariesError, PrimariesResult, DCI_P3, DISPLAY_P3, REC2020,
    REC709,
};
use std::fmt;

/// Immutable description of an RGB color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSpaceProfile {
    primaries: Primaries,
    luma: [f32; 3],
    white_nits: f32,
}

impl ColorSpaceProfile {
    /// Builds a profile whose luma coefficients are derived from the
    /// primaries (the Y row of RGB to XYZ).
    pub fn new(primaries: Primaries, white_nits: f32) -> PrimariesResult<Self> {
        let y = rgb_to_xyz_matrix(&primaries)?.row(1);
        Self::with_luma(primaries, y.to_array(), white_nits)
    }

    /// Builds a profile with explicit luma coefficients.
    pub fn with_luma(primaries: Primaries, luma: [f32; 3], white_nits: f32) -> PrimariesResult<Self> {
        let sum: f32 = luma.iter().sum();
        if luma.iter().any(|c| !c.is_finite()) || (sum - 1.0).abs() > 1e-2 {
            return Err(PrimariesError::InvalidLuma(luma));
        }
        if !(white_nits.is_finite() && white_nits > 0.0) {
            return Err(PrimariesError::InvalidWhiteNits(white_nits));
        }
        rgb_to_xyz_matrix(&primaries)?;
        Ok(Self {
            primaries,
            luma,
            white_nits,
        })
    }

    /// Primaries and white point.
    #[inline]
    pub fn primaries(&self) -> &Primaries {
        &self.primaries
    }

    /// Luma coefficients `[kr, kg, kb]`.
    #[inline]
    pub fn luma(&self) -> [f32; 3] {
        self.luma
    }

    /// Reference white luminance in nits.
    #[inline]
    pub fn white_nits(&self) -> f32 {
        self.white_nits
    }

    /// Luma of a linear RGB triplet.
    #[inline]
    pub fn luminance(&self, rgb: [f32; 3]) -> f32 {
        rgb[0] * self.luma[0] + rgb[1] * self.luma[1] + rgb[2] * self.luma[2]
    }
}

/// Well-known profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StandardProfile {
    /// BT.709 / sRGB, 100 nit white.
    #[default]
    Rec709,
    /// BT.2020, 203 nit white.
    Rec2020,
    /// Display P3, 80 nit white.
    DisplayP3,
    /// DCI-P3 with theater white, 48 nit white.
    DciP3,
}

impl StandardProfile {
    /// All standard profiles.
    pub const ALL: [Self; 4] = [Self::Rec709, Self::Rec2020, Self::DisplayP3, Self::DciP3];

    /// The profile value.
    pub fn profile(&self) -> ColorSpaceProfile {
        let (primaries, luma, white_nits) = match self {
            Self::Rec709 => (REC709, [0.2126, 0.7152, 0.0722], 100.0),
            Self::Rec2020 => (REC2020, [0.2627, 0.6780, 0.0593], 203.0),
            Self::DisplayP3 => (DISPLAY_P3, [0.2290, 0.6917, 0.0793], 80.0),
            Self::DciP3 => (DCI_P3, [0.2095, 0.7216, 0.0689], 48.0),
        };
        ColorSpaceProfile {
            primaries,
            luma,
            white_nits,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rec709 => "Rec.709",
            Self::Rec2020 => "Rec.2020",
            Self::DisplayP3 => "Display P3",
            Self::DciP3 => "DCI-P3",
        }
    }
}

impl From<StandardProfile> for ColorSpaceProfile {
    fn from(p: StandardProfile) -> Self {
        p.profile()
    }
}

impl fmt::Display for StandardProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
