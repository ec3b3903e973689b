//! Buffer-level sample kind conversions.
//!
//! Every function allocates a tightly packed destination and fills it
//! row-parallel. Channel counts are preserved except where packed words
//! force four channels. The `*_in` forms split rows across a caller's
//! [`RowPool`]; the plain forms use the global pool.
//!
//! | From | To | Function |
//! |------|----|----------|
//! | U8 | Packed1010102 | [`rgba8_to_packed`] |
//! | Packed1010102 | U8 | [`packed_to_rgba8`] |
//! | Packed1010102 | U16 | [`packed_to_u16`] |
//! | U16 | Packed1010102 | [`u16_to_packed`] |
//! | Packed1010102 | HalfFloat16 | [`packed_to_f16`] |
//! | HalfFloat16 | Packed1010102 | [`f16_to_packed`] |
//! | U8 / U16 | HalfFloat16 | [`u8_to_f16`], [`u16_to_f16`] |
//! | HalfFloat16 | U8 / U16 | [`f16_to_u8`], [`f16_to_u16`] |
//! | U8 | U16 | [`u8_to_u16`], [`u16_to_u8`] |
//! | f32 | U8 / Packed1010102 | [`f32_to_u8`], [`f32_to_packed`] |

use crate::kernels::row_kernels;
use crate::packed::{
    f16_to_packed_row, f32_to_packed_row, packed_to_f16_row, packed_to_rgba8_row, packed_to_u16_row,
    rgba8_to_packed_row, u16_to_packed_row,
};
use crate::{ConvertError, ConvertResult};
use pxl_core::{f16, for_each_row_mut, max_value, Error, PixelBuffer, RowPool, Sample};
use tracing::{debug, trace};

fn check_rgb<T: Sample>(src: &PixelBuffer<T>, op: &'static str) -> ConvertResult<()> {
    if !(3..=4).contains(&src.channels()) {
        return Err(ConvertError::channels(op, "3 or 4", src.channels()));
    }
    Ok(())
}

/// Packs RGBA8 (or RGB8 with opaque alpha) into 10:10:10:2 words.
pub fn rgba8_to_packed(src: &PixelBuffer<u8>) -> ConvertResult<PixelBuffer<u32>> {
    rgba8_to_packed_in(RowPool::global(), src)
}

/// [`rgba8_to_packed`] on `pool`.
pub fn rgba8_to_packed_in(pool: &RowPool, src: &PixelBuffer<u8>) -> ConvertResult<PixelBuffer<u32>> {
    check_rgb(src, "rgba8_to_packed")?;
    let (width, height, channels) = (src.width(), src.height(), src.channels());
    trace!(width, height, channels, "rgba8_to_packed");
    let mut dst = PixelBuffer::<u32>::new(width, height, 4)?;
    pool.for_each_row_mut(&mut dst, |y, row| rgba8_to_packed_row(src.row(y), channels, row));
    Ok(dst)
}

/// Unpacks 10:10:10:2 words to RGBA8, optionally premultiplied.
pub fn packed_to_rgba8(src: &PixelBuffer<u32>, premultiply: bool) -> ConvertResult<PixelBuffer<u8>> {
    packed_to_rgba8_in(RowPool::global(), src, premultiply)
}

/// [`packed_to_rgba8`] on `pool`.
pub fn packed_to_rgba8_in(
    pool: &RowPool,
    src: &PixelBuffer<u32>,
    premultiply: bool,
) -> ConvertResult<PixelBuffer<u8>> {
    let (width, height) = src.dimensions();
    trace!(width, height, premultiply, "packed_to_rgba8");
    let mut dst = PixelBuffer::<u8>::new(width, height, 4)?;
    pool.for_each_row_mut(&mut dst, |y, row| packed_to_rgba8_row(src.row(y), row, premultiply));
    Ok(dst)
}

/// Unpacks 10:10:10:2 words to straight N-bit RGBA.
///
/// At a `bit_depth` of 10 color codes are copied unchanged, so
/// [`u16_to_packed`] restores the original words.
pub fn packed_to_u16(src: &PixelBuffer<u32>, bit_depth: u32) -> ConvertResult<PixelBuffer<u16>> {
    packed_to_u16_in(RowPool::global(), src, bit_depth)
}

/// [`packed_to_u16`] on `pool`.
pub fn packed_to_u16_in(pool: &RowPool, src: &PixelBuffer<u32>, bit_depth: u32) -> ConvertResult<PixelBuffer<u16>> {
    let (width, height) = src.dimensions();
    trace!(width, height, bit_depth, "packed_to_u16");
    let mut dst = PixelBuffer::<u16>::new(width, height, 4)?.with_bit_depth(bit_depth)?;
    let max = max_value(bit_depth);
    pool.for_each_row_mut(&mut dst, |y, row| packed_to_u16_row(src.row(y), max, row));
    Ok(dst)
}

/// Packs N-bit RGBA (or RGB with opaque alpha) into 10:10:10:2 words.
pub fn u16_to_packed(src: &PixelBuffer<u16>) -> ConvertResult<PixelBuffer<u32>> {
    u16_to_packed_in(RowPool::global(), src)
}

/// [`u16_to_packed`] on `pool`.
pub fn u16_to_packed_in(pool: &RowPool, src: &PixelBuffer<u16>) -> ConvertResult<PixelBuffer<u32>> {
    check_rgb(src, "u16_to_packed")?;
    let (width, height, channels) = (src.width(), src.height(), src.channels());
    trace!(width, height, channels, bit_depth = src.bit_depth(), "u16_to_packed");
    let mut dst = PixelBuffer::<u32>::new(width, height, 4)?;
    let max = src.max_value();
    pool.for_each_row_mut(&mut dst, |y, row| u16_to_packed_row(src.row(y), channels, max, row));
    Ok(dst)
}

/// Unpacks 10:10:10:2 words to half-float RGBA in `[0, 1]`.
pub fn packed_to_f16(src: &PixelBuffer<u32>) -> ConvertResult<PixelBuffer<f16>> {
    packed_to_f16_in(RowPool::global(), src)
}

/// [`packed_to_f16`] on `pool`.
pub fn packed_to_f16_in(pool: &RowPool, src: &PixelBuffer<u32>) -> ConvertResult<PixelBuffer<f16>> {
    let (width, height) = src.dimensions();
    trace!(width, height, "packed_to_f16");
    let mut dst = PixelBuffer::<f16>::new(width, height, 4)?;
    pool.for_each_row_mut(&mut dst, |y, row| packed_to_f16_row(src.row(y), row));
    Ok(dst)
}

/// Packs half-float RGBA (or RGB) into 10:10:10:2 words.
pub fn f16_to_packed(src: &PixelBuffer<f16>) -> ConvertResult<PixelBuffer<u32>> {
    f16_to_packed_in(RowPool::global(), src)
}

/// [`f16_to_packed`] on `pool`.
pub fn f16_to_packed_in(pool: &RowPool, src: &PixelBuffer<f16>) -> ConvertResult<PixelBuffer<u32>> {
    check_rgb(src, "f16_to_packed")?;
    let (width, height, channels) = (src.width(), src.height(), src.channels());
    trace!(width, height, channels, "f16_to_packed");
    let mut dst = PixelBuffer::<u32>::new(width, height, 4)?;
    pool.for_each_row_mut(&mut dst, |y, row| f16_to_packed_row(src.row(y), channels, row));
    Ok(dst)
}

/// 8-bit to half float, scaled to `[0, 1]`.
pub fn u8_to_f16(src: &PixelBuffer<u8>) -> ConvertResult<PixelBuffer<f16>> {
    u8_to_f16_in(RowPool::global(), src)
}

/// [`u8_to_f16`] on `pool`.
pub fn u8_to_f16_in(pool: &RowPool, src: &PixelBuffer<u8>) -> ConvertResult<PixelBuffer<f16>> {
    let (width, height, channels) = (src.width(), src.height(), src.channels());
    let kernels = row_kernels();
    trace!(width, height, channels, kernels = kernels.name(), "u8_to_f16");
    let mut dst = PixelBuffer::<f16>::new(width, height, channels)?;
    let scale = 1.0 / 255.0;
    pool.for_each_row_mut(&mut dst, |y, row| kernels.u8_to_f16(src.row(y), scale, row));
    Ok(dst)
}

/// N-bit to half float, scaled by `1 / (2^bit_depth - 1)`.
pub fn u16_to_f16(src: &PixelBuffer<u16>) -> ConvertResult<PixelBuffer<f16>> {
    u16_to_f16_in(RowPool::global(), src)
}

/// [`u16_to_f16`] on `pool`.
pub fn u16_to_f16_in(pool: &RowPool, src: &PixelBuffer<u16>) -> ConvertResult<PixelBuffer<f16>> {
    let (width, height, channels) = (src.width(), src.height(), src.channels());
    let kernels = row_kernels();
    trace!(width, height, channels, bit_depth = src.bit_depth(), "u16_to_f16");
    let mut dst = PixelBuffer::<f16>::new(width, height, channels)?;
    let scale = 1.0 / src.max_value() as f32;
    pool.for_each_row_mut(&mut dst, |y, row| kernels.u16_to_f16(src.row(y), scale, row));
    Ok(dst)
}

/// Half float to 8-bit: `round(h * 255)`, clamped.
pub fn f16_to_u8(src: &PixelBuffer<f16>) -> ConvertResult<PixelBuffer<u8>> {
    f16_to_u8_in(RowPool::global(), src)
}

/// [`f16_to_u8`] on `pool`.
pub fn f16_to_u8_in(pool: &RowPool, src: &PixelBuffer<f16>) -> ConvertResult<PixelBuffer<u8>> {
    let (width, height, channels) = (src.width(), src.height(), src.channels());
    let kernels = row_kernels();
    trace!(width, height, channels, "f16_to_u8");
    let mut dst = PixelBuffer::<u8>::new(width, height, channels)?;
    pool.for_each_row_mut(&mut dst, |y, row| kernels.f16_to_u8(src.row(y), 255.0, row));
    Ok(dst)
}

/// Half float to N-bit: `round(h * (2^bit_depth - 1))`, clamped.
pub fn f16_to_u16(src: &PixelBuffer<f16>, bit_depth: u32) -> ConvertResult<PixelBuffer<u16>> {
    f16_to_u16_in(RowPool::global(), src, bit_depth)
}

/// [`f16_to_u16`] on `pool`.
pub fn f16_to_u16_in(pool: &RowPool, src: &PixelBuffer<f16>, bit_depth: u32) -> ConvertResult<PixelBuffer<u16>> {
    let (width, height, channels) = (src.width(), src.height(), src.channels());
    let kernels = row_kernels();
    trace!(width, height, channels, bit_depth, "f16_to_u16");
    let mut dst = PixelBuffer::<u16>::new(width, height, channels)?.with_bit_depth(bit_depth)?;
    let max = max_value(bit_depth) as f32;
    pool.for_each_row_mut(&mut dst, |y, row| kernels.f16_to_u16(src.row(y), max, row));
    Ok(dst)
}

/// 8-bit to N-bit: `round(c * max / 255)`.
pub fn u8_to_u16(src: &PixelBuffer<u8>, bit_depth: u32) -> ConvertResult<PixelBuffer<u16>> {
    u8_to_u16_in(RowPool::global(), src, bit_depth)
}

/// [`u8_to_u16`] on `pool`.
pub fn u8_to_u16_in(pool: &RowPool, src: &PixelBuffer<u8>, bit_depth: u32) -> ConvertResult<PixelBuffer<u16>> {
    let (width, height, channels) = (src.width(), src.height(), src.channels());
    trace!(width, height, channels, bit_depth, "u8_to_u16");
    let mut dst = PixelBuffer::<u16>::new(width, height, channels)?.with_bit_depth(bit_depth)?;
    let max = max_value(bit_depth);
    pool.for_each_row_mut(&mut dst, |y, row| {
        for (d, &s) in row.iter_mut().zip(src.row(y)) {
            *d = ((s as u32 * max + 127) / 255) as u16;
        }
    });
    Ok(dst)
}

/// N-bit to 8-bit: `round(c * 255 / max)`, clamped.
pub fn u16_to_u8(src: &PixelBuffer<u16>) -> ConvertResult<PixelBuffer<u8>> {
    u16_to_u8_in(RowPool::global(), src)
}

/// [`u16_to_u8`] on `pool`.
pub fn u16_to_u8_in(pool: &RowPool, src: &PixelBuffer<u16>) -> ConvertResult<PixelBuffer<u8>> {
    let (width, height, channels) = (src.width(), src.height(), src.channels());
    trace!(width, height, channels, bit_depth = src.bit_depth(), "u16_to_u8");
    let mut dst = PixelBuffer::<u8>::new(width, height, channels)?;
    let max = src.max_value();
    pool.for_each_row_mut(&mut dst, |y, row| {
        for (d, &s) in row.iter_mut().zip(src.row(y)) {
            let s = (s as u32).min(max);
            *d = ((s * 255 + max / 2) / max) as u8;
        }
    });
    Ok(dst)
}

fn check_float_len(data: &[f32], width: usize, height: usize, channels: usize) -> ConvertResult<()> {
    let required = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
    if data.len() < required {
        return Err(Error::BufferTooSmall {
            len: data.len(),
            required,
        }
        .into());
    }
    Ok(())
}

/// Tightly packed `[0, 1]` floats to 8-bit: `round(v * 255)`, clamped.
pub fn f32_to_u8(data: &[f32], width: usize, height: usize, channels: usize) -> ConvertResult<PixelBuffer<u8>> {
    let mut dst = PixelBuffer::<u8>::new(width, height, channels)?;
    check_float_len(data, width, height, channels)?;
    let kernels = row_kernels();
    trace!(width, height, channels, "f32_to_u8");
    let row_len = width * channels;
    for_each_row_mut(&mut dst, |y, row| {
        kernels.f32_to_u8(&data[y * row_len..(y + 1) * row_len], 255.0, row);
    });
    Ok(dst)
}

/// Tightly packed `[0, 1]` floats (3 or 4 channels) to 10:10:10:2 words.
pub fn f32_to_packed(data: &[f32], width: usize, height: usize, channels: usize) -> ConvertResult<PixelBuffer<u32>> {
    if !(3..=4).contains(&channels) {
        return Err(ConvertError::channels("f32_to_packed", "3 or 4", channels));
    }
    let mut dst = PixelBuffer::<u32>::new(width, height, 4)?;
    check_float_len(data, width, height, channels)?;
    debug!(width, height, channels, "Packing float rows into 10:10:10:2");
    let row_len = width * channels;
    for_each_row_mut(&mut dst, |y, row| {
        f32_to_packed_row(&data[y * row_len..(y + 1) * row_len], channels, row);
    });
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packed::{pack_1010102, unpack_1010102};

    #[test]
    fn test_rgba8_half_roundtrip_lossless() {
        let mut src = PixelBuffer::<u8>::new(16, 3, 4).unwrap();
        for y in 0..3 {
            for x in 0..16 {
                let v = (x * 16 + y) as u8;
                src.pixel_mut(x, y).copy_from_slice(&[v, 255 - v, v / 3, 255]);
            }
        }
        src.pixel_mut(5, 1).copy_from_slice(&[255, 128, 64, 255]);
        let half = u8_to_f16(&src).unwrap();
        let back = f16_to_u8(&half).unwrap();
        assert_eq!(back, src);
        assert_eq!(back.pixel(5, 1), &[255, 128, 64, 255]);
    }

    #[test]
    fn test_u16_half_roundtrip_ten_bit() {
        let mut src = PixelBuffer::<u16>::new(1024, 1, 1).unwrap().with_bit_depth(10).unwrap();
        for (i, v) in src.row_mut(0).iter_mut().enumerate() {
            *v = i as u16;
        }
        let half = u16_to_f16(&src).unwrap();
        let back = f16_to_u16(&half, 10).unwrap();
        assert_eq!(back, src);
    }

    #[test]
    fn test_packed_roundtrip_through_u8() {
        let mut src = PixelBuffer::<u32>::new(4, 2, 4).unwrap();
        src.row_mut(0)[1] = pack_1010102(514, 1023, 0, 3);
        let u8s = packed_to_rgba8(&src, false).unwrap();
        assert_eq!(u8s.pixel(1, 0), &[128, 255, 0, 255]);
        let again = rgba8_to_packed(&u8s).unwrap();
        assert_eq!(again, src);
    }

    #[test]
    fn test_packed_u16_roundtrip_exact() {
        let mut src = PixelBuffer::<u32>::new(3, 2, 4).unwrap();
        src.row_mut(0).copy_from_slice(&[
            pack_1010102(513, 1, 1022, 3),
            pack_1010102(0, 1023, 2, 1),
            pack_1010102(77, 78, 79, 2),
        ]);
        let wide = packed_to_u16(&src, 10).unwrap();
        assert_eq!(wide.bit_depth(), 10);
        assert_eq!(wide.pixel(0, 0), &[513, 1, 1022, 1023]);
        assert_eq!(wide.pixel(1, 0)[3], 341);
        assert_eq!(u16_to_packed(&wide).unwrap(), src);
    }

    #[test]
    fn test_pool_variants_match_global() {
        let pool = RowPool::with_workers(3).unwrap().with_thresholds(0, 1);
        let mut src = PixelBuffer::<u8>::new(7, 33, 4).unwrap();
        for (i, v) in src.data_mut().iter_mut().enumerate() {
            *v = (i * 37 % 256) as u8;
        }
        let packed = rgba8_to_packed_in(&pool, &src).unwrap();
        assert_eq!(packed, rgba8_to_packed(&src).unwrap());
        let wide = packed_to_u16_in(&pool, &packed, 12).unwrap();
        assert_eq!(wide, packed_to_u16(&packed, 12).unwrap());
        assert_eq!(u16_to_packed_in(&pool, &wide).unwrap(), packed);
        let half = u8_to_f16_in(&pool, &src).unwrap();
        assert_eq!(f16_to_u8_in(&pool, &half).unwrap(), src);
    }

    #[test]
    fn test_packed_half_roundtrip() {
        let mut src = PixelBuffer::<u32>::new(3, 1, 4).unwrap();
        src.row_mut(0).copy_from_slice(&[
            pack_1010102(0, 1, 2, 0),
            pack_1010102(511, 512, 513, 1),
            pack_1010102(1021, 1022, 1023, 3),
        ]);
        let half = packed_to_f16(&src).unwrap();
        let back = f16_to_packed(&half).unwrap();
        assert_eq!(back, src);
    }

    #[test]
    fn test_depth_change() {
        let mut src = PixelBuffer::<u8>::new(2, 1, 1).unwrap();
        src.row_mut(0).copy_from_slice(&[255, 128]);
        let deep = u8_to_u16(&src, 12).unwrap();
        assert_eq!(deep.row(0), &[4095, 2056]);
        assert_eq!(u16_to_u8(&deep).unwrap(), src);
    }

    #[test]
    fn test_f32_paths() {
        let data = [0.0, 0.5, 1.0, 1.5, -0.5, 0.25];
        let out = f32_to_u8(&data, 2, 1, 3).unwrap();
        assert_eq!(out.row(0), &[0, 128, 255, 255, 0, 64]);
        let packed = f32_to_packed(&data, 2, 1, 3).unwrap();
        assert_eq!(unpack_1010102(packed.row(0)[0]), [0, 512, 1023, 3]);
        assert!(f32_to_u8(&data[..5], 2, 1, 3).is_err());
    }

    #[test]
    fn test_channel_checks() {
        let gray = PixelBuffer::<u8>::new(2, 2, 1).unwrap();
        assert!(matches!(rgba8_to_packed(&gray), Err(ConvertError::Channels { got: 1, .. })));
    }
}
