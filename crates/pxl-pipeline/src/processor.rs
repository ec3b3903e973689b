//! The configured processing chain.
//!
//! [`Processor::process`] runs, in order:
//!
//! 1. Unpack `Packed1010102` words to 10-bit `U16` RGBA
//! 2. Reorder channels
//! 3. Resample into the target canvas with the configured framing
//! 4. Color-manage (`U8` and `U16` only)
//! 5. Convert to the output kind, or back to the input kind when none is
//!    configured
//!
//! Everything that can be checked without pixel data is checked before
//! step 1, so a rejected call leaves no partial results.

use crate::{AnyBuffer, PipelineError, PipelineResult, ProcessConfig};
use pxl_color::{apply_color_transform_in, ColorTransform, LutSample};
use pxl_convert::{packed_to_u16_in, permute_in_place_in};
use pxl_core::{PixelBuffer, RowPool, SampleKind};
use pxl_resample::{resample_framed, ResampleSample, Resampler, TargetSize};
use tracing::{debug, trace};

// 10-10-10-2 color codes carry over into U16 unchanged
const PACKED_BIT_DEPTH: u32 = 10;

/// Runs a validated [`ProcessConfig`] over buffers.
#[derive(Debug, Clone)]
pub struct Processor {
    config: ProcessConfig,
    target: Option<TargetSize>,
    color: Option<ColorTransform>,
}

impl Processor {
    /// Validates `config` and prepares the color transform.
    pub fn new(config: ProcessConfig) -> PipelineResult<Self> {
        config.validate()?;
        let target = config.target_size();
        let color = config.color_transform()?;
        debug!(
            kernel = %config.kernel,
            fit_mode = %config.fit_mode,
            tone_curve = %config.tone_curve,
            color = color.is_some(),
            "Created processor"
        );
        Ok(Self { config, target, color })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Color transform applied in step 4, if any.
    pub fn color_transform(&self) -> Option<&ColorTransform> {
        self.color.as_ref()
    }

    /// Processes `input` on the global pool.
    pub fn process(&self, input: AnyBuffer) -> PipelineResult<AnyBuffer> {
        self.process_in(RowPool::global(), input)
    }

    /// Processes `input`, splitting rows across `pool`.
    pub fn process_in(&self, pool: &RowPool, input: AnyBuffer) -> PipelineResult<AnyBuffer> {
        let (width, height) = input.dimensions();
        let channels = input.channels();
        let kind = input.kind();
        trace!(width, height, channels, kind = %kind, "process");

        self.preflight(&input)?;
        let canvas = self.target.map(|t| t.resolve(width, height)).transpose()?;
        debug!(?canvas, "Processing buffer");

        let working = match input {
            AnyBuffer::Packed(words) => AnyBuffer::U16(packed_to_u16_in(pool, &words, PACKED_BIT_DEPTH)?),
            other => other,
        };
        let out = match working {
            AnyBuffer::U8(buf) => {
                let mut buf = self.reshape(pool, buf, canvas)?;
                self.color_manage(pool, &mut buf)?;
                AnyBuffer::U8(buf)
            }
            AnyBuffer::U16(buf) => {
                let mut buf = self.reshape(pool, buf, canvas)?;
                self.color_manage(pool, &mut buf)?;
                AnyBuffer::U16(buf)
            }
            AnyBuffer::Half(buf) => AnyBuffer::Half(self.reshape(pool, buf, canvas)?),
            AnyBuffer::Packed(_) => return Err(PipelineError::unsupported(kind, "packed words were not unpacked")),
        };

        let output_kind = self.config.output_kind.unwrap_or(kind);
        out.convert_in(pool, output_kind, self.config.output_bit_depth)
    }

    fn preflight(&self, input: &AnyBuffer) -> PipelineResult<()> {
        let kind = input.kind();
        let channels = input.channels();
        if !self.config.channel_permutation.is_identity() && channels != 4 {
            return Err(PipelineError::unsupported(
                kind,
                format!("channel permutation needs 4 channels, got {channels}"),
            ));
        }
        if self.color.is_some() {
            if kind == SampleKind::HalfFloat16 {
                return Err(PipelineError::unsupported(kind, "color management needs integer samples"));
            }
            if !matches!(channels, 3 | 4) {
                return Err(PipelineError::unsupported(
                    kind,
                    format!("color management needs 3 or 4 channels, got {channels}"),
                ));
            }
        }
        if self.config.output_kind == Some(SampleKind::Packed1010102) && !matches!(channels, 3 | 4) {
            return Err(PipelineError::unsupported(
                kind,
                format!("packed output needs 3 or 4 channels, got {channels}"),
            ));
        }
        Ok(())
    }

    fn reshape<T: ResampleSample>(
        &self,
        pool: &RowPool,
        mut buf: PixelBuffer<T>,
        canvas: Option<(usize, usize)>,
    ) -> PipelineResult<PixelBuffer<T>> {
        if !self.config.channel_permutation.is_identity() {
            permute_in_place_in(pool, &mut buf, &self.config.channel_permutation)?;
        }
        let Some((canvas_w, canvas_h)) = canvas else {
            return Ok(buf);
        };
        if (canvas_w, canvas_h) == buf.dimensions() {
            return Ok(buf);
        }
        // premultiplying only applies to RGBA
        let resampler = Resampler::new(self.config.kernel)
            .premultiply_alpha(self.config.premultiply_alpha && buf.channels() == 4);
        Ok(resample_framed(pool, &resampler, &buf, canvas_w, canvas_h, self.config.fit_mode)?)
    }

    fn color_manage<T: LutSample>(&self, pool: &RowPool, buf: &mut PixelBuffer<T>) -> PipelineResult<()> {
        if let Some(transform) = &self.color {
            apply_color_transform_in(pool, buf, transform)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxl_convert::pack_1010102;
    use pxl_core::f16;

    fn processor(yaml: &str) -> Processor {
        Processor::new(ProcessConfig::from_yaml_str(yaml).unwrap()).unwrap()
    }

    fn solid_u8(width: usize, height: usize, px: [u8; 4]) -> PixelBuffer<u8> {
        let mut buf = PixelBuffer::<u8>::new(width, height, 4).unwrap();
        for y in 0..height {
            for p in buf.row_mut(y).chunks_exact_mut(4) {
                p.copy_from_slice(&px);
            }
        }
        buf
    }

    #[test]
    fn test_default_is_passthrough() {
        let src = solid_u8(5, 3, [1, 2, 3, 4]);
        let out = processor("{}").process(src.clone().into()).unwrap();
        assert_eq!(out, AnyBuffer::U8(src));
    }

    #[test]
    fn test_permute_and_fill() {
        let p = processor("channelPermutation: [2, 1, 0, 3]\nfitMode: Fill\ntargetWidth: 4\ntargetHeight: 4");
        let out = p.process(solid_u8(16, 8, [10, 20, 30, 255]).into()).unwrap();
        let buf = out.as_u8().unwrap();
        assert_eq!(buf.dimensions(), (4, 4));
        for y in 0..4 {
            for px in buf.row(y).chunks_exact(4) {
                assert_eq!(px, &[30, 20, 10, 255]);
            }
        }
    }

    #[test]
    fn test_fit_letterboxes() {
        let p = processor("kernel: Nearest\nfitMode: Fit\ntargetWidth: 4\ntargetHeight: 4");
        let out = p.process(solid_u8(8, 4, [200, 200, 200, 255]).into()).unwrap();
        let buf = out.as_u8().unwrap();
        // 4x2 image centered vertically
        assert_eq!(buf.pixel(0, 0), &[0, 0, 0, 0]);
        assert_eq!(buf.pixel(0, 1), &[200, 200, 200, 255]);
        assert_eq!(buf.pixel(3, 2), &[200, 200, 200, 255]);
        assert_eq!(buf.pixel(3, 3), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_derived_target() {
        let p = processor("targetWidth: -2\ntargetHeight: 25");
        let out = p.process(solid_u8(64, 48, [9, 9, 9, 9]).into()).unwrap();
        assert_eq!(out.dimensions(), (32, 24));
    }

    #[test]
    fn test_packed_in_half_out() {
        let words = vec![pack_1010102(1023, 0, 0, 3); 4];
        let src = PixelBuffer::from_vec(2, 2, 4, 8, words).unwrap();
        let out = processor("outputKind: HalfFloat16").process(src.into()).unwrap();
        let half = out.as_half().unwrap();
        assert_eq!(half.row(0)[..4], [f16::ONE, f16::ZERO, f16::ZERO, f16::ONE]);
    }

    #[test]
    fn test_packed_words_pass_through_unchanged() {
        let words = vec![
            pack_1010102(513, 1, 1022, 3),
            pack_1010102(0, 1023, 2, 1),
            pack_1010102(77, 600, 901, 2),
            pack_1010102(1, 2, 3, 0),
        ];
        let src = PixelBuffer::from_vec(2, 2, 4, 8, words).unwrap();
        for yaml in ["{}", "outputKind: Packed1010102", "targetWidth: 2\ntargetHeight: 2"] {
            let out = processor(yaml).process(src.clone().into()).unwrap();
            assert_eq!(out, AnyBuffer::Packed(src.clone()), "config {yaml}");
        }
    }

    #[test]
    fn test_packed_keeps_ten_bits_through_resample() {
        let word = pack_1010102(513, 1, 1022, 3);
        let src = PixelBuffer::from_vec(4, 4, 4, 16, vec![word; 16]).unwrap();
        let p = processor("kernel: Bilinear\ntargetWidth: 2\ntargetHeight: 2\npremultiplyAlpha: true");
        let out = p.process(src.into()).unwrap();
        let packed = out.as_packed().unwrap();
        assert_eq!(packed.dimensions(), (2, 2));
        for y in 0..2 {
            assert_eq!(packed.row(y), &[word, word]);
        }
    }

    #[test]
    fn test_color_managed_u16() {
        let p = processor(
            "toneCurve: Rec2408\ncolor: { source: Rec2020, target: Rec2020, transferIn: { curve: Pq }, transferOut: { curve: Pq } }",
        );
        let mut src = PixelBuffer::<u16>::new(2, 1, 3).unwrap().with_bit_depth(10).unwrap();
        src.row_mut(0).copy_from_slice(&[1023, 1023, 1023, 0, 0, 0]);
        let out = p.process(src.into()).unwrap();
        let row = out.as_u16().unwrap().row(0);
        assert!(row[0] < 1023);
        assert_eq!(&row[3..], &[0, 0, 0]);
    }

    #[test]
    fn test_rejected_before_work() {
        let color = processor("toneCurve: Filmic");
        let half = PixelBuffer::<f16>::new(2, 2, 4).unwrap();
        assert!(matches!(
            color.process(half.into()),
            Err(PipelineError::Unsupported { kind: SampleKind::HalfFloat16, .. })
        ));

        let permute = processor("channelPermutation: [3, 2, 1, 0]");
        let rgb = PixelBuffer::<u8>::new(2, 2, 3).unwrap();
        assert!(matches!(permute.process(rgb.into()), Err(PipelineError::Unsupported { .. })));

        assert!(Processor::new(ProcessConfig {
            target_width: Some(0),
            ..ProcessConfig::default()
        })
        .is_err());
    }

    #[test]
    fn test_pool_matches_global() {
        let p = processor("kernel: Lanczos\ntargetWidth: 37\ntargetHeight: 41\ntoneCurve: Aces\npremultiplyAlpha: true");
        let mut src = PixelBuffer::<u8>::new(90, 70, 4).unwrap();
        for (i, v) in src.data_mut().iter_mut().enumerate() {
            *v = (i * 31 % 251) as u8;
        }
        let pool = RowPool::with_workers(3).unwrap().with_thresholds(0, 1);
        let a = p.process_in(&pool, src.clone().into()).unwrap();
        let b = p.process(src.into()).unwrap();
        assert_eq!(a, b);
    }
}
