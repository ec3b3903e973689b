//! In-place color transforms.
//!
//! Each row goes through four steps, touching only the first three channels:
//!
//! 1. Linearize through a [`LinearizeTable`] for `transfer_in`
//! 2. Tone map in linear light, if a curve is set
//! 3. Multiply by the 3×3 gamut matrix
//! 4. Re-encode through a [`GammaTable`] for `transfer_out`
//!
//! Alpha is never read or written. 8-bit and N-bit buffers share the code
//! path and differ only in table sizes.

use crate::lut::{GammaTable, LinearizeTable, LutSample};
use crate::tone::{ToneCurve, DEFAULT_CONTENT_NITS};
use crate::{ColorError, ColorResult};
use pxl_core::{PixelBuffer, RowPool};
use pxl_math::{simd, Mat3};
use pxl_primaries::{gamut_matrix, ColorSpaceProfile};
use pxl_transfer::TransferFunction;
use tracing::{debug, trace};

/// Everything one color-management call needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransform {
    /// Row-major gamut matrix.
    pub matrix: Mat3,
    /// Curve the samples are encoded with.
    pub transfer_in: TransferFunction,
    /// Curve to encode the result with.
    pub transfer_out: TransferFunction,
    /// Tone curve applied before the matrix.
    pub tone_curve: ToneCurve,
    /// Luminance weights of the source primaries.
    pub luma: [f32; 3],
    /// Content peak used by Rec. 2408 curves without their own.
    pub content_brightness_nits: f32,
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::new(Mat3::IDENTITY)
    }
}

impl ColorTransform {
    /// sRGB in and out with the given matrix and Rec. 709 luma.
    pub fn new(matrix: Mat3) -> Self {
        Self {
            matrix,
            transfer_in: TransferFunction::Srgb,
            transfer_out: TransferFunction::Srgb,
            tone_curve: ToneCurve::None,
            luma: [0.2126, 0.7152, 0.0722],
            content_brightness_nits: DEFAULT_CONTENT_NITS,
        }
    }

    /// Transform from `src` to `dst` primaries, with luma taken from `src`.
    pub fn between(
        src: &ColorSpaceProfile,
        dst: &ColorSpaceProfile,
        transfer_in: TransferFunction,
        transfer_out: TransferFunction,
    ) -> ColorResult<Self> {
        Ok(Self {
            luma: src.luma(),
            ..Self::new(gamut_matrix(src, dst)?)
        }
        .with_transfers(transfer_in, transfer_out))
    }

    /// Sets both transfer curves.
    pub fn with_transfers(mut self, transfer_in: TransferFunction, transfer_out: TransferFunction) -> Self {
        self.transfer_in = transfer_in;
        self.transfer_out = transfer_out;
        self
    }

    /// Sets the tone curve.
    pub fn with_tone_curve(mut self, tone_curve: ToneCurve) -> Self {
        self.tone_curve = tone_curve;
        self
    }

    /// Sets the luma coefficients.
    pub fn with_luma(mut self, luma: [f32; 3]) -> Self {
        self.luma = luma;
        self
    }

    /// Sets the content peak luminance.
    pub fn with_content_brightness(mut self, nits: f32) -> Self {
        self.content_brightness_nits = nits;
        self
    }

    /// Rejects unusable parameters.
    pub fn validate(&self) -> ColorResult<()> {
        if !self.matrix.is_finite() {
            return Err(ColorError::InvalidMatrix);
        }
        for tf in [self.transfer_in, self.transfer_out] {
            if !tf.is_valid() {
                return Err(ColorError::InvalidTransfer(tf));
            }
        }
        ColorError::check_nits("content_brightness_nits", self.content_brightness_nits)?;
        self.tone_curve.validate()
    }
}

/// Applies `transform` to an RGB or RGBA buffer in place on the global pool.
///
/// ```rust
/// use pxl_color::{apply_color_transform, ColorTransform};
/// use pxl_core::PixelBuffer;
///
/// let mut buf = PixelBuffer::<u8>::new(2, 1, 4).unwrap();
/// buf.row_mut(0).copy_from_slice(&[255, 0, 0, 7, 0, 0, 255, 9]);
/// apply_color_transform(&mut buf, &ColorTransform::default()).unwrap();
/// assert_eq!(buf.row(0), &[255, 0, 0, 7, 0, 0, 255, 9]);
/// ```
pub fn apply_color_transform<T: LutSample>(buf: &mut PixelBuffer<T>, transform: &ColorTransform) -> ColorResult<()> {
    apply_color_transform_in(RowPool::global(), buf, transform)
}

/// Applies `transform` in place, splitting rows across `pool`.
pub fn apply_color_transform_in<T: LutSample>(
    pool: &RowPool,
    buf: &mut PixelBuffer<T>,
    transform: &ColorTransform,
) -> ColorResult<()> {
    let (width, height) = buf.dimensions();
    let channels = buf.channels();
    let bit_depth = buf.bit_depth();
    trace!(width, height, channels, bit_depth, "apply_color_transform");

    if !matches!(channels, 3 | 4) {
        return Err(ColorError::Channels(channels));
    }
    transform.validate()?;

    let linearize = LinearizeTable::new(&transform.transfer_in, bit_depth);
    let gamma = GammaTable::<T>::new(&transform.transfer_out, bit_depth);
    let mapper = transform.tone_curve.mapper(transform.content_brightness_nits);
    let matrix_is_identity = transform.matrix.is_identity(0.0);

    debug!(
        transfer_in = %transform.transfer_in,
        transfer_out = %transform.transfer_out,
        tone_curve = %transform.tone_curve,
        lut_entries = linearize.len(),
        gamma_steps = gamma.steps(),
        "Applying color transform"
    );

    let stride = buf.stride_elements();
    let row_len = buf.row_elements();
    pool.for_row_bands(buf.data_mut(), stride, width, height, |first_row, band| {
        // scratch is reused for every row of the band
        let mut rgb = vec![0.0f32; width * 3];
        let mut index = vec![0u32; width * 3];
        for (i, row) in band.chunks_mut(stride).enumerate() {
            if first_row + i >= height {
                break;
            }
            let row = &mut row[..row_len];
            for (px, out) in row.chunks_exact(channels).zip(rgb.chunks_exact_mut(3)) {
                out[0] = linearize.get(px[0].code());
                out[1] = linearize.get(px[1].code());
                out[2] = linearize.get(px[2].code());
            }

            if let Some(mapper) = &mapper {
                mapper.map_row(&mut rgb, transform.luma);
            }
            if !matrix_is_identity {
                simd::transform_rgb_row(&transform.matrix, &mut rgb);
            }

            simd::quantize_unit(&rgb, gamma.steps(), &mut index);
            for (px, idx) in row.chunks_exact_mut(channels).zip(index.chunks_exact(3)) {
                px[0] = gamma.lookup(idx[0]);
                px[1] = gamma.lookup(idx[1]);
                px[2] = gamma.lookup(idx[2]);
            }
        }
    });
    Ok(())
}
