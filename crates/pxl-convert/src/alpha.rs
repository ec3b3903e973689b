//! Premultiplied alpha.
//!
//! Integer samples use rounding integer arithmetic:
//!
//! ```text
//! premultiplied   = (c * a + max/2) / max
//! unpremultiplied = a > 0 ? min((c * max + a/2) / a, max) : c
//! ```
//!
//! For 8-bit samples `max/2` is 127, matching `(c * a + 127) / 255`.
//! Premultiplying loses precision at low alpha; the round trip is within
//! one code value for `a >= max/2`.
//!
//! Rows are interleaved 4-channel pixels with alpha last.

use crate::{ConvertError, ConvertResult};
use pxl_core::{f16, PixelBuffer, RowPool, Sample};
use tracing::trace;

/// Samples that can be premultiplied by an alpha of the same type.
pub trait AlphaSample: Sample {
    /// `c * a / max`, rounded.
    fn premultiply(c: Self, a: Self, max: u32) -> Self;
    /// `c * max / a`, rounded and clamped; `c` when `a` is zero.
    fn unpremultiply(c: Self, a: Self, max: u32) -> Self;
}

/// Premultiplies one 8-bit channel.
#[inline]
pub fn premultiply_u8(c: u8, a: u8) -> u8 {
    ((c as u16 * a as u16 + 127) / 255) as u8
}

/// Undoes [`premultiply_u8`]; zero alpha leaves the channel as is.
#[inline]
pub fn unpremultiply_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return c;
    }
    let a = a as u32;
    ((c as u32 * 255 + a / 2) / a).min(255) as u8
}

impl AlphaSample for u8 {
    #[inline]
    fn premultiply(c: u8, a: u8, _max: u32) -> u8 {
        premultiply_u8(c, a)
    }

    #[inline]
    fn unpremultiply(c: u8, a: u8, _max: u32) -> u8 {
        unpremultiply_u8(c, a)
    }
}

impl AlphaSample for u16 {
    #[inline]
    fn premultiply(c: u16, a: u16, max: u32) -> u16 {
        let max = max.max(1);
        ((c as u32 * a as u32 + max / 2) / max).min(max) as u16
    }

    #[inline]
    fn unpremultiply(c: u16, a: u16, max: u32) -> u16 {
        if a == 0 {
            return c;
        }
        let a = a as u64;
        ((c as u64 * max as u64 + a / 2) / a).min(max as u64) as u16
    }
}

impl AlphaSample for f16 {
    #[inline]
    fn premultiply(c: f16, a: f16, _max: u32) -> f16 {
        f16::from_f32(c.to_f32() * a.to_f32())
    }

    #[inline]
    fn unpremultiply(c: f16, a: f16, _max: u32) -> f16 {
        let a = a.to_f32();
        if a == 0.0 || a.is_nan() {
            return c;
        }
        f16::from_f32((c.to_f32() / a).clamp(-65504.0, 65504.0))
    }
}

/// Premultiplies every RGBA pixel of `row` in place.
pub fn premultiply_row<T: AlphaSample>(row: &mut [T], max: u32) {
    for px in row.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = T::premultiply(*c, a, max);
        }
    }
}

/// Unpremultiplies every RGBA pixel of `row` in place.
pub fn unpremultiply_row<T: AlphaSample>(row: &mut [T], max: u32) {
    for px in row.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = T::unpremultiply(*c, a, max);
        }
    }
}

/// Premultiplies a 4-channel buffer in place on the global pool.
pub fn premultiply_alpha<T: AlphaSample>(buf: &mut PixelBuffer<T>) -> ConvertResult<()> {
    premultiply_alpha_in(RowPool::global(), buf)
}

/// Premultiplies a 4-channel buffer in place, splitting rows across `pool`.
pub fn premultiply_alpha_in<T: AlphaSample>(pool: &RowPool, buf: &mut PixelBuffer<T>) -> ConvertResult<()> {
    check_rgba(buf, "premultiply")?;
    trace!(width = buf.width(), height = buf.height(), kind = %buf.kind(), "premultiply_alpha");
    let max = buf.max_value();
    pool.for_each_row_mut(buf, |_, row| premultiply_row(row, max));
    Ok(())
}

/// Unpremultiplies a 4-channel buffer in place on the global pool.
pub fn unpremultiply_alpha<T: AlphaSample>(buf: &mut PixelBuffer<T>) -> ConvertResult<()> {
    unpremultiply_alpha_in(RowPool::global(), buf)
}

/// Unpremultiplies a 4-channel buffer in place, splitting rows across `pool`.
pub fn unpremultiply_alpha_in<T: AlphaSample>(pool: &RowPool, buf: &mut PixelBuffer<T>) -> ConvertResult<()> {
    check_rgba(buf, "unpremultiply")?;
    trace!(width = buf.width(), height = buf.height(), kind = %buf.kind(), "unpremultiply_alpha");
    let max = buf.max_value();
    pool.for_each_row_mut(buf, |_, row| unpremultiply_row(row, max));
    Ok(())
}

/// Multiplies color by alpha and leaves alpha at its value, as done before
/// dropping the alpha channel.
#[inline]
pub fn attenuate_rgba8(px: [u8; 4]) -> [u8; 3] {
    let a = px[3];
    [
        premultiply_u8(px[0], a),
        premultiply_u8(px[1], a),
        premultiply_u8(px[2], a),
    ]
}

fn check_rgba<T: Sample>(buf: &PixelBuffer<T>, op: &'static str) -> ConvertResult<()> {
    if buf.channels() != 4 || buf.pixel_len() != 4 {
        return Err(ConvertError::channels(op, "4", buf.channels()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premultiply_formula() {
        assert_eq!(premultiply_u8(255, 255), 255);
        assert_eq!(premultiply_u8(255, 0), 0);
        assert_eq!(premultiply_u8(255, 128), 128);
        assert_eq!(premultiply_u8(100, 128), 50);
        assert_eq!(premultiply_u8(1, 127), 0);
        assert_eq!(premultiply_u8(1, 128), 1);
    }

    #[test]
    fn test_unpremultiply_zero_alpha_passthrough() {
        for c in [0u8, 17, 255] {
            assert_eq!(unpremultiply_u8(c, 0), c);
        }
        // premultiplied values above alpha clamp
        assert_eq!(unpremultiply_u8(200, 100), 255);
    }

    #[test]
    fn test_roundtrip_within_one_for_high_alpha() {
        for a in 128..=255u16 {
            for c in 0..=255u16 {
                let p = premultiply_u8(c as u8, a as u8);
                let back = unpremultiply_u8(p, a as u8);
                assert!((back as i32 - c as i32).abs() <= 1, "c={c} a={a} back={back}");
            }
        }
    }

    #[test]
    fn test_roundtrip_error_bounded_by_alpha() {
        for a in 1..=255u16 {
            let bound = (127.5 / a as f32 + 0.5).floor() as i32;
            for c in 0..=255u16 {
                let back = unpremultiply_u8(premultiply_u8(c as u8, a as u8), a as u8);
                assert!((back as i32 - c as i32).abs() <= bound.max(1), "c={c} a={a}");
            }
        }
    }

    #[test]
    fn test_u16_alpha() {
        let max = 1023;
        assert_eq!(u16::premultiply(1023, 1023, max), 1023);
        assert_eq!(u16::premultiply(1000, 0, max), 0);
        let p = u16::premultiply(600, 700, max);
        let back = u16::unpremultiply(p, 700, max);
        assert!((back as i32 - 600).abs() <= 1);
        assert_eq!(u16::unpremultiply(5, 0, max), 5);
    }

    #[test]
    fn test_f16_alpha() {
        let half = f16::from_f32(0.5);
        let p = f16::premultiply(f16::ONE, half, 0);
        assert_eq!(p, half);
        assert_eq!(f16::unpremultiply(p, half, 0), f16::ONE);
        assert_eq!(f16::unpremultiply(half, f16::ZERO, 0), half);
    }

    #[test]
    fn test_buffer_premultiply() {
        let mut buf = PixelBuffer::<u8>::new(3, 2, 4).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                buf.pixel_mut(x, y).copy_from_slice(&[200, 100, 50, 128]);
            }
        }
        premultiply_alpha(&mut buf).unwrap();
        assert_eq!(buf.pixel(2, 1), &[100, 50, 25, 128]);
        unpremultiply_alpha(&mut buf).unwrap();
        assert_eq!(buf.pixel(0, 0), &[199, 100, 50, 128]);

        let mut rgb = PixelBuffer::<u8>::new(3, 2, 3).unwrap();
        assert!(premultiply_alpha(&mut rgb).is_err());
    }

    #[test]
    fn test_pool_premultiply_matches_global() {
        let pool = RowPool::with_workers(3).unwrap().with_thresholds(0, 1);
        let mut a = PixelBuffer::<u16>::new(5, 31, 4).unwrap().with_bit_depth(12).unwrap();
        for (i, v) in a.data_mut().iter_mut().enumerate() {
            *v = (i * 97 % 4096) as u16;
        }
        let mut b = a.clone();
        premultiply_alpha_in(&pool, &mut a).unwrap();
        premultiply_alpha(&mut b).unwrap();
        assert_eq!(a, b);
        unpremultiply_alpha_in(&pool, &mut a).unwrap();
        unpremultiply_alpha(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_attenuate() {
        assert_eq!(attenuate_rgba8([255, 128, 0, 0]), [0, 0, 0]);
        assert_eq!(attenuate_rgba8([255, 128, 0, 255]), [255, 128, 0]);
    }
}
