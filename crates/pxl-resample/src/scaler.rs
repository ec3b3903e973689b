//! The resampling engine.
//!
//! Destination pixel `(x, y)` samples the source at
//! `(x · src_w / dst_w, y · src_h / dst_h)`. Each kernel reads a fixed
//! number of taps per axis around the floor of that coordinate, with
//! indices clamped to the image. Tap positions and weights are computed
//! once per axis, then every destination row is filled independently on
//! the [`RowPool`].
//!
//! Integer samples are rounded and clamped to `[0, 2^bit_depth - 1]`;
//! half floats are clamped to the finite range.
//!
//! # Example
//!
//! ```rust
//! use pxl_core::PixelBuffer;
//! use pxl_resample::{Resampler, ResamplingKernel};
//!
//! let src = PixelBuffer::<u8>::new(64, 64, 4).unwrap();
//! let dst = Resampler::new(ResamplingKernel::Lanczos)
//!     .premultiply_alpha(true)
//!     .resample(&src, 32, 24)
//!     .unwrap();
//! assert_eq!(dst.dimensions(), (32, 24));
//! ```

use crate::kernel::ResamplingKernel;
use crate::{ResampleError, ResampleResult};
use pxl_convert::{premultiply_alpha_in, unpremultiply_alpha_in, AlphaSample, ConvertError};
use pxl_core::{Error, NumericSample, PixelBuffer, RowPool};
use std::borrow::Cow;
use tracing::{debug, trace};

const MAX_TAPS: usize = 6;

/// Sample types the engine can resample: `u8`, `u16` and `f16`.
pub trait ResampleSample: NumericSample + AlphaSample {}

impl<T: NumericSample + AlphaSample> ResampleSample for T {}

/// Source taps for every destination coordinate along one axis.
#[derive(Debug, Clone)]
struct AxisTaps {
    taps: usize,
    index: Vec<[usize; MAX_TAPS]>,
    weight: Vec<[f32; MAX_TAPS]>,
    sum: Vec<f32>,
}

impl AxisTaps {
    fn new(kernel: ResamplingKernel, src_len: usize, dst_len: usize) -> Self {
        let taps = kernel.taps();
        let lead = kernel.lead() as isize;
        let last = src_len as isize - 1;
        let scale = src_len as f32 / dst_len as f32;

        let mut index = Vec::with_capacity(dst_len);
        let mut weight = Vec::with_capacity(dst_len);
        let mut sum = Vec::with_capacity(dst_len);
        for d in 0..dst_len {
            let pos = d as f32 * scale;
            let floor = pos.floor();
            let frac = (pos - floor).max(0.0);
            let base = (floor as isize).min(last);

            let mut idx = [0usize; MAX_TAPS];
            for (t, slot) in idx.iter_mut().take(taps).enumerate() {
                *slot = (base - lead + t as isize).clamp(0, last) as usize;
            }
            let mut w = [0.0f32; MAX_TAPS];
            kernel.weights(frac, &mut w);

            index.push(idx);
            sum.push(w[..taps].iter().sum());
            weight.push(w);
        }
        Self {
            taps,
            index,
            weight,
            sum,
        }
    }
}

/// Resampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resampler {
    kernel: ResamplingKernel,
    premultiply_alpha: bool,
}

impl Resampler {
    /// Creates a resampler for `kernel`, alpha left straight.
    pub fn new(kernel: ResamplingKernel) -> Self {
        Self {
            kernel,
            premultiply_alpha: false,
        }
    }

    /// Premultiplies 4-channel input before sampling and unpremultiplies
    /// the result, so transparent pixels do not bleed their color.
    pub fn premultiply_alpha(mut self, enabled: bool) -> Self {
        self.premultiply_alpha = enabled;
        self
    }

    /// Selected kernel.
    #[inline]
    pub fn kernel(&self) -> ResamplingKernel {
        self.kernel
    }

    /// Whether alpha is premultiplied around sampling.
    #[inline]
    pub fn premultiplies_alpha(&self) -> bool {
        self.premultiply_alpha
    }

    /// Resamples into a new tightly packed buffer on the global pool.
    pub fn resample<T: ResampleSample>(
        &self,
        src: &PixelBuffer<T>,
        width: usize,
        height: usize,
    ) -> ResampleResult<PixelBuffer<T>> {
        self.resample_in(RowPool::global(), src, width, height)
    }

    /// Resamples into a new tightly packed buffer on `pool`.
    pub fn resample_in<T: ResampleSample>(
        &self,
        pool: &RowPool,
        src: &PixelBuffer<T>,
        width: usize,
        height: usize,
    ) -> ResampleResult<PixelBuffer<T>> {
        if width == 0 || height == 0 {
            return Err(ResampleError::invalid_target(
                width as i64,
                height as i64,
                "destination size must be non-zero",
            ));
        }
        let mut dst = PixelBuffer::<T>::new(width, height, src.channels())?
            .with_bit_depth(src.bit_depth())?;
        self.resample_into(pool, src, &mut dst)?;
        Ok(dst)
    }

    /// Resamples `src` to fill `dst`, whatever its size and stride.
    ///
    /// `dst` must have the channel count of `src`; its bit depth is
    /// overwritten with the source's.
    pub fn resample_into<T: ResampleSample>(
        &self,
        pool: &RowPool,
        src: &PixelBuffer<T>,
        dst: &mut PixelBuffer<T>,
    ) -> ResampleResult<()> {
        let channels = src.channels();
        if dst.channels() != channels {
            return Err(Error::channel_mismatch(channels, dst.channels()).into());
        }
        if self.premultiply_alpha && channels != 4 {
            return Err(ConvertError::channels("premultiplied resampling", "4", channels).into());
        }
        let (src_w, src_h) = src.dimensions();
        let (dst_w, dst_h) = dst.dimensions();
        trace!(src_w, src_h, dst_w, dst_h, channels, kernel = %self.kernel, "resample");

        let src = if self.premultiply_alpha {
            let mut premul = src.clone();
            premultiply_alpha_in(pool, &mut premul)?;
            Cow::Owned(premul)
        } else {
            Cow::Borrowed(src)
        };
        let src: &PixelBuffer<T> = &src;
        dst.set_bit_depth(src.bit_depth())?;

        if (src_w, src_h) == (dst_w, dst_h) && self.kernel == ResamplingKernel::Nearest {
            debug!(dst_w, dst_h, "Same-size nearest resample, copying rows");
            pool.for_each_row_mut(dst, |y, row| row.copy_from_slice(src.row(y)));
        } else {
            debug!(src_w, src_h, dst_w, dst_h, kernel = %self.kernel, "Resampling");
            let xs = AxisTaps::new(self.kernel, src_w, dst_w);
            let ys = AxisTaps::new(self.kernel, src_h, dst_h);
            let normalize = self.kernel.is_windowed_sinc();
            let max = T::max_for_depth(src.bit_depth());
            pool.for_each_row_mut(dst, |y, row| {
                resample_row(src, &xs, &ys, y, normalize, max, row);
            });
        }

        if self.premultiply_alpha {
            unpremultiply_alpha_in(pool, dst)?;
        }
        Ok(())
    }
}

/// Resamples `src` to `width × height` with `kernel` on the global pool.
///
/// # Example
///
/// ```rust
/// use pxl_core::PixelBuffer;
/// use pxl_resample::{resample, ResamplingKernel};
///
/// let src = PixelBuffer::<u8>::new(8, 8, 3).unwrap();
/// let dst = resample(&src, 4, 4, ResamplingKernel::Bilinear).unwrap();
/// assert_eq!(dst.channels(), 3);
/// ```
pub fn resample<T: ResampleSample>(
    src: &PixelBuffer<T>,
    width: usize,
    height: usize,
    kernel: ResamplingKernel,
) -> ResampleResult<PixelBuffer<T>> {
    Resampler::new(kernel).resample(src, width, height)
}

fn resample_row<T: NumericSample>(
    src: &PixelBuffer<T>,
    xs: &AxisTaps,
    ys: &AxisTaps,
    y: usize,
    normalize: bool,
    max: f32,
    out: &mut [T],
) {
    let channels = src.channels();
    let wy = &ys.weight[y];
    let rows: [&[T]; MAX_TAPS] = std::array::from_fn(|j| src.row(ys.index[y][j.min(ys.taps - 1)]));

    for (x, px) in out.chunks_exact_mut(channels).enumerate() {
        let ix = &xs.index[x];
        let wx = &xs.weight[x];
        let mut acc = [0.0f32; 4];
        for (row, &w_row) in rows.iter().zip(wy).take(ys.taps) {
            let mut line = [0.0f32; 4];
            for (&sx, &w) in ix.iter().zip(wx).take(xs.taps) {
                let p = &row[sx * channels..(sx + 1) * channels];
                for (l, &s) in line.iter_mut().zip(p) {
                    *l += w * s.to_f32();
                }
            }
            for (a, l) in acc.iter_mut().zip(line) {
                *a += w_row * l;
            }
        }

        // a zero weight sum keeps the raw accumulation
        let total = xs.sum[x] * ys.sum[y];
        let norm = normalize && total != 0.0;
        for (d, &v) in px.iter_mut().zip(&acc) {
            let v = if norm { v / total } else { v };
            *d = T::from_f32_clamped(v, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxl_core::f16;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];

    fn checkerboard() -> PixelBuffer<u8> {
        let mut buf = PixelBuffer::<u8>::new(4, 4, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let c = if (x + y) % 2 == 0 { RED } else { GREEN };
                buf.pixel_mut(x, y).copy_from_slice(&c);
            }
        }
        buf
    }

    fn gradient(width: usize, height: usize, channels: usize) -> PixelBuffer<u8> {
        let mut buf = PixelBuffer::<u8>::new(width, height, channels).unwrap();
        for y in 0..height {
            for (i, v) in buf.row_mut(y).iter_mut().enumerate() {
                *v = ((i * 7 + y * 13) % 256) as u8;
            }
        }
        buf
    }

    #[test]
    fn test_nearest_same_size_is_identity() {
        let src = gradient(13, 9, 3);
        for kernel in [ResamplingKernel::Nearest] {
            let dst = resample(&src, 13, 9, kernel).unwrap();
            assert_eq!(dst, src);
        }
    }

    #[test]
    fn test_interpolating_kernels_same_size_identity() {
        let src = gradient(11, 7, 4);
        for kernel in [
            ResamplingKernel::Bilinear,
            ResamplingKernel::Hermite,
            ResamplingKernel::CatmullRom,
            ResamplingKernel::GenericCubic,
            ResamplingKernel::Lanczos,
        ] {
            let dst = resample(&src, 11, 7, kernel).unwrap();
            assert_eq!(dst, src, "{kernel}");
        }
    }

    #[test]
    fn test_checkerboard_nearest() {
        let dst = resample(&checkerboard(), 2, 2, ResamplingKernel::Nearest).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                let px = dst.pixel(x, y);
                assert!(px == RED || px == GREEN, "({x},{y}) = {px:?}");
                // top-left corner of the source quadrant
                let expect = if (2 * x + 2 * y) % 2 == 0 { RED } else { GREEN };
                assert_eq!(px, expect);
            }
        }
    }

    #[test]
    fn test_checkerboard_bilinear_formula() {
        let src = checkerboard();
        let dst = resample(&src, 2, 2, ResamplingKernel::Bilinear).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                let (sx, sy) = (x as f32 * 2.0, y as f32 * 2.0);
                let (x1, y1) = (sx.floor() as usize, sy.floor() as usize);
                let (x2, y2) = ((x1 + 1).min(3), (y1 + 1).min(3));
                let (dx, dy) = (sx - x1 as f32, sy - y1 as f32);
                for c in 0..4 {
                    let v = (1.0 - dx) * (1.0 - dy) * src.pixel(x1, y1)[c] as f32
                        + dx * (1.0 - dy) * src.pixel(x2, y1)[c] as f32
                        + (1.0 - dx) * dy * src.pixel(x1, y2)[c] as f32
                        + dx * dy * src.pixel(x2, y2)[c] as f32;
                    assert_eq!(dst.pixel(x, y)[c], v.round().clamp(0.0, 255.0) as u8);
                }
            }
        }
    }

    #[test]
    fn test_bilinear_upscale_blends() {
        let mut src = PixelBuffer::<u8>::new(2, 1, 1).unwrap();
        src.row_mut(0).copy_from_slice(&[0, 200]);
        let dst = resample(&src, 4, 1, ResamplingKernel::Bilinear).unwrap();
        // positions 0, 0.5, 1, 1.5
        assert_eq!(dst.row(0), &[0, 100, 200, 200]);
    }

    #[test]
    fn test_output_within_range() {
        let black = PixelBuffer::<u8>::new(9, 9, 4).unwrap();
        let mut white = black.clone();
        white.fill(255);
        let mut spikes = black.clone();
        for y in 0..9 {
            for (i, v) in spikes.row_mut(y).iter_mut().enumerate() {
                *v = if (i + y) % 2 == 0 { 255 } else { 0 };
            }
        }
        for kernel in ResamplingKernel::ALL {
            for (w, h) in [(4, 4), (17, 13), (1, 1)] {
                assert!(resample(&black, w, h, kernel).unwrap().data().iter().all(|&v| v == 0));
                assert!(resample(&white, w, h, kernel).unwrap().data().iter().all(|&v| v == 255));
                // ringing kernels clamp instead of wrapping
                let _ = resample(&spikes, w, h, kernel).unwrap();
            }
        }
    }

    #[test]
    fn test_u16_clamps_to_bit_depth() {
        let mut src = PixelBuffer::<u16>::new(6, 6, 3).unwrap().with_bit_depth(10).unwrap();
        for y in 0..6 {
            for (i, v) in src.row_mut(y).iter_mut().enumerate() {
                *v = if (i / 3 + y) % 2 == 0 { 1023 } else { 0 };
            }
        }
        for kernel in ResamplingKernel::ALL {
            let dst = resample(&src, 11, 5, kernel).unwrap();
            assert_eq!(dst.bit_depth(), 10);
            assert!(dst.data().iter().all(|&v| v <= 1023), "{kernel}");
        }
    }

    #[test]
    fn test_half_float_resample() {
        let mut src = PixelBuffer::<f16>::new(4, 4, 4).unwrap();
        src.fill(f16::from_f32(0.5));
        for kernel in ResamplingKernel::ALL {
            let dst = resample(&src, 3, 5, kernel).unwrap();
            for v in dst.data() {
                assert!((v.to_f32() - 0.5).abs() < 1e-2, "{kernel}: {v}");
            }
        }
    }

    #[test]
    fn test_half_float_stays_finite() {
        let mut src = PixelBuffer::<f16>::new(4, 4, 1).unwrap();
        for (i, v) in src.row_mut(1).iter_mut().enumerate() {
            *v = if i % 2 == 0 { f16::MAX } else { f16::MIN };
        }
        for kernel in ResamplingKernel::ALL {
            let dst = resample(&src, 7, 7, kernel).unwrap();
            assert!(dst.data().iter().all(|v| v.is_finite()), "{kernel}");
        }
    }

    #[test]
    fn test_premultiplied_resample_hides_transparent_color() {
        let mut src = PixelBuffer::<u8>::new(2, 1, 4).unwrap();
        src.pixel_mut(0, 0).copy_from_slice(&[255, 0, 0, 255]);
        src.pixel_mut(1, 0).copy_from_slice(&[0, 255, 0, 0]);
        let straight = Resampler::new(ResamplingKernel::Bilinear)
            .resample(&src, 4, 1)
            .unwrap();
        let premul = Resampler::new(ResamplingKernel::Bilinear)
            .premultiply_alpha(true)
            .resample(&src, 4, 1)
            .unwrap();
        // halfway between the two source pixels
        assert!(straight.pixel(1, 0)[1] > 100);
        assert_eq!(premul.pixel(1, 0)[1], 0);
        assert_eq!(premul.pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_rejects_bad_requests() {
        let src = PixelBuffer::<u8>::new(4, 4, 3).unwrap();
        assert!(matches!(
            resample(&src, 0, 4, ResamplingKernel::Bilinear),
            Err(ResampleError::InvalidTarget { .. })
        ));
        assert!(Resampler::new(ResamplingKernel::Bilinear)
            .premultiply_alpha(true)
            .resample(&src, 2, 2)
            .is_err());
        let mut wrong = PixelBuffer::<u8>::new(2, 2, 4).unwrap();
        assert!(Resampler::default()
            .resample_into(RowPool::global(), &src, &mut wrong)
            .is_err());
    }

    #[test]
    fn test_resample_into_padded_destination() {
        let src = gradient(8, 8, 4);
        let mut dst = PixelBuffer::<u8>::with_alignment(5, 3, 4, 64).unwrap();
        Resampler::new(ResamplingKernel::Mitchell)
            .resample_into(RowPool::global(), &src, &mut dst)
            .unwrap();
        assert_eq!(dst.stride(), 64);
        let tight = resample(&src, 5, 3, ResamplingKernel::Mitchell).unwrap();
        assert_eq!(dst.to_packed_vec(), tight.to_packed_vec());
    }
}
