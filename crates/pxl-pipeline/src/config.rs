//! Pipeline configuration.
//!
//! Configurations are usually read from YAML with camelCase keys:
//!
//! ```yaml
//! kernel: Lanczos
//! fitMode: Fill
//! toneCurve: Rec2408Perceptual
//! premultiplyAlpha: true
//! channelPermutation: [2, 1, 0, 3]
//! targetWidth: 1280
//! targetHeight: -2
//! outputKind: U8
//! color:
//!   source: Rec2020
//!   target: Rec709
//!   transferIn: { curve: Pq }
//!   transferOut: { curve: Srgb }
//!   contentBrightnessNits: 1000
//! ```
//!
//! Every key is optional. Unknown keys, unknown enum values and channel
//! permutations that are not bijections are rejected while parsing.

use crate::{PipelineError, PipelineResult};
use pxl_color::tone::{DEFAULT_CONTENT_NITS, DEFAULT_DISPLAY_NITS, DEFAULT_REFERENCE_NITS};
use pxl_color::{ColorTransform, ToneCurve};
use pxl_core::{ChannelPermutation, Sample, SampleKind};
use pxl_primaries::StandardProfile;
use pxl_resample::{FitMode, ResamplingKernel, TargetSize};
use pxl_transfer::TransferFunction;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bit depth used when converting into `U16` output.
pub const DEFAULT_OUTPUT_BIT_DEPTH: u32 = 10;

/// What a [`Processor`](crate::Processor) does to each buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ProcessConfig {
    /// Resampling kernel.
    pub kernel: ResamplingKernel,
    /// Framing into the target canvas.
    pub fit_mode: FitMode,
    /// Tone curve, written by name: `None`, `Rec2408`,
    /// `Rec2408Perceptual`, `Logarithmic`, `Filmic` or `Aces`.
    #[serde(with = "tone_curve_name")]
    pub tone_curve: ToneCurve,
    /// Resample RGBA input with premultiplied alpha.
    pub premultiply_alpha: bool,
    /// Channel reorder applied to RGBA input first.
    pub channel_permutation: ChannelPermutation,
    /// Target width; negative derives it from the height.
    pub target_width: Option<i64>,
    /// Target height; negative derives it from the width.
    pub target_height: Option<i64>,
    /// Output sample kind; the working kind when absent.
    pub output_kind: Option<SampleKind>,
    /// Bit depth of `U16` output converted from another kind.
    pub output_bit_depth: u32,
    /// Color management settings.
    pub color: Option<ColorConfig>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            kernel: ResamplingKernel::default(),
            fit_mode: FitMode::default(),
            tone_curve: ToneCurve::None,
            premultiply_alpha: false,
            channel_permutation: ChannelPermutation::IDENTITY,
            target_width: None,
            target_height: None,
            output_kind: None,
            output_bit_depth: DEFAULT_OUTPUT_BIT_DEPTH,
            color: None,
        }
    }
}

/// Source and destination encodings for color management.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ColorConfig {
    /// Primaries the input is encoded in.
    pub source: StandardProfile,
    /// Primaries to convert to.
    pub target: StandardProfile,
    /// Transfer curve of the input.
    pub transfer_in: TransferFunction,
    /// Transfer curve of the output.
    pub transfer_out: TransferFunction,
    /// Content peak luminance.
    pub content_brightness_nits: f32,
    /// Display peak luminance for Rec. 2408.
    pub display_nits: f32,
    /// Reference white luminance for Rec. 2408.
    pub reference_nits: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            source: StandardProfile::Rec709,
            target: StandardProfile::Rec709,
            transfer_in: TransferFunction::Srgb,
            transfer_out: TransferFunction::Srgb,
            content_brightness_nits: DEFAULT_CONTENT_NITS,
            display_nits: DEFAULT_DISPLAY_NITS,
            reference_nits: DEFAULT_REFERENCE_NITS,
        }
    }
}

impl ProcessConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> PipelineResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Serializes back to YAML.
    pub fn to_yaml(&self) -> PipelineResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks every setting without touching a buffer.
    pub fn validate(&self) -> PipelineResult<()> {
        if let Some(target) = self.target_size() {
            target.validate()?;
        }
        if !(u16::MIN_BIT_DEPTH..=u16::MAX_BIT_DEPTH).contains(&self.output_bit_depth) {
            return Err(PipelineError::config(format!(
                "outputBitDepth must be in {}..={}, got {}",
                u16::MIN_BIT_DEPTH,
                u16::MAX_BIT_DEPTH,
                self.output_bit_depth
            )));
        }
        if let Some(color) = &self.color {
            for (name, nits) in [("displayNits", color.display_nits), ("referenceNits", color.reference_nits)] {
                if !(nits.is_finite() && nits > 0.0) {
                    return Err(PipelineError::config(format!("{name} must be positive, got {nits}")));
                }
            }
        }
        if let Some(transform) = self.color_transform()? {
            transform.validate()?;
        }
        Ok(())
    }

    /// Requested output size, if any dimension was given.
    ///
    /// A missing dimension is derived from the other.
    pub fn target_size(&self) -> Option<TargetSize> {
        match (self.target_width, self.target_height) {
            (None, None) => None,
            (w, h) => Some(TargetSize::new(w.unwrap_or(-1), h.unwrap_or(-1))),
        }
    }

    /// Tone curve with the color block's luminances.
    pub fn tone_curve(&self) -> ToneCurve {
        match (self.tone_curve, &self.color) {
            (ToneCurve::Rec2408 { perceptual, .. }, Some(color)) => ToneCurve::Rec2408 {
                content_nits: 0.0,
                display_nits: color.display_nits,
                reference_nits: color.reference_nits,
                perceptual,
            },
            (curve, _) => curve,
        }
    }

    /// Color transform to apply, if any.
    ///
    /// A tone curve without a color block maps sRGB Rec. 709 to itself.
    pub fn color_transform(&self) -> PipelineResult<Option<ColorTransform>> {
        let tone_curve = self.tone_curve();
        let color = match (self.color, tone_curve) {
            (Some(color), _) => color,
            (None, ToneCurve::None) => return Ok(None),
            (None, _) => ColorConfig::default(),
        };
        let transform = ColorTransform::between(
            &color.source.profile(),
            &color.target.profile(),
            color.transfer_in,
            color.transfer_out,
        )?
        .with_tone_curve(tone_curve)
        .with_content_brightness(color.content_brightness_nits);
        Ok(Some(transform))
    }
}

// tone curves are named in YAML; Rec. 2408 luminances live in the color block
mod tone_curve_name {
    use pxl_color::ToneCurve;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(curve: &ToneCurve, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(curve.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ToneCurve, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
kernel: Lanczos
fitMode: Fill
toneCurve: Rec2408Perceptual
premultiplyAlpha: true
channelPermutation: [2, 1, 0, 3]
targetWidth: 320
targetHeight: -2
outputKind: HalfFloat16
color:
  source: Rec2020
  target: Rec709
  transferIn: { curve: Pq }
  transferOut: { curve: Gamma, exponent: 2.2 }
  displayNits: 300
"#;

    #[test]
    fn test_parse_full() {
        let config = ProcessConfig::from_yaml_str(FULL).unwrap();
        assert_eq!(config.kernel, ResamplingKernel::Lanczos);
        assert_eq!(config.fit_mode, FitMode::Fill);
        assert!(config.premultiply_alpha);
        assert_eq!(config.channel_permutation, ChannelPermutation::BGRA_TO_RGBA);
        assert_eq!(config.target_size(), Some(TargetSize::new(320, -2)));
        assert_eq!(config.output_kind, Some(SampleKind::HalfFloat16));

        let color = config.color.unwrap();
        assert_eq!(color.source, StandardProfile::Rec2020);
        assert_eq!(color.transfer_out, TransferFunction::Gamma(2.2));
        assert_eq!(color.content_brightness_nits, 1000.0);
        assert_eq!(
            config.tone_curve(),
            ToneCurve::Rec2408 {
                content_nits: 0.0,
                display_nits: 300.0,
                reference_nits: 203.0,
                perceptual: true,
            }
        );
        assert!(config.color_transform().unwrap().is_some());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = ProcessConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ProcessConfig::default());
        assert!(config.target_size().is_none());
        assert!(config.color_transform().unwrap().is_none());
    }

    #[test]
    fn test_rejected_at_parse() {
        let cases = [
            "kernel: Bicubic",
            "fitMode: Stretch",
            "toneCurve: Reinhard",
            "channelPermutation: [0, 0, 1, 2]",
            "channelPermutation: [0, 1, 2, 4]",
            "targetWidth: 0",
            "targetWidth: -1\ntargetHeight: -1",
            "outputBitDepth: 20",
            "sharpen: 2",
            "color: { source: Rec601 }",
            "color: { displayNits: -5 }",
            "color: { transferIn: { curve: Gamma, exponent: -1 } }",
        ];
        for yaml in cases {
            assert!(ProcessConfig::from_yaml_str(yaml).is_err(), "{yaml}");
        }
    }

    #[test]
    fn test_unknown_tone_curve_fails_in_serde() {
        let err = ProcessConfig::from_yaml_str("toneCurve: Reinhard").unwrap_err();
        assert!(matches!(err, PipelineError::Yaml(_)), "{err:?}");
        assert!(err.to_string().contains("Reinhard"));

        let config = ProcessConfig::from_yaml_str("toneCurve: rec2408perceptual").unwrap();
        assert_eq!(config.tone_curve, ToneCurve::rec2408(true));
        assert!(config.to_yaml().unwrap().contains("toneCurve: Rec2408Perceptual"));
    }

    #[test]
    fn test_tone_curve_without_color_block() {
        let config = ProcessConfig::from_yaml_str("toneCurve: Aces").unwrap();
        let transform = config.color_transform().unwrap().unwrap();
        assert_eq!(transform.tone_curve, ToneCurve::Aces);
        assert_eq!(transform.transfer_in, TransferFunction::Srgb);
    }

    #[test]
    fn test_single_dimension_is_derived() {
        let config = ProcessConfig::from_yaml_str("targetHeight: 90").unwrap();
        assert_eq!(config.target_size(), Some(TargetSize::new(-1, 90)));
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let config = ProcessConfig::from_yaml_str(FULL).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();
        assert_eq!(ProcessConfig::from_yaml_file(file.path()).unwrap(), config);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            ProcessConfig::from_yaml_file(missing),
            Err(PipelineError::Io(_))
        ));
    }
}
