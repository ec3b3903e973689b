//! RGB565 words.
//!
//! A word is `(r5 << 11) | (g6 << 5) | b5`. Conversions round to the
//! nearest code value in both directions:
//!
//! ```text
//! r5 = (r8 * 31 + 127) / 255      r8 = (r5 * 255 + 15) / 31
//! g6 = (g8 * 63 + 127) / 255      g8 = (g6 * 255 + 31) / 63
//! ```
//!
//! The format has no alpha. Packing from RGBA can attenuate (multiply
//! color by alpha) first; unpacking fills alpha with a caller value.

use crate::alpha::premultiply_u8;
use crate::{ConvertError, ConvertResult};
use pxl_core::{f16, for_each_row_mut, PixelBuffer};
use std::fmt;
use tracing::trace;

/// Packs 8-bit RGB.
#[inline]
pub const fn pack_565(r: u8, g: u8, b: u8) -> u16 {
    let r5 = (r as u16 * 31 + 127) / 255;
    let g6 = (g as u16 * 63 + 127) / 255;
    let b5 = (b as u16 * 31 + 127) / 255;
    (r5 << 11) | (g6 << 5) | b5
}

/// Unpacks to 8-bit RGB.
#[inline]
pub const fn unpack_565(word: u16) -> [u8; 3] {
    let r5 = (word >> 11) & 0x1f;
    let g6 = (word >> 5) & 0x3f;
    let b5 = word & 0x1f;
    [
        ((r5 * 255 + 15) / 31) as u8,
        ((g6 * 255 + 31) / 63) as u8,
        ((b5 * 255 + 15) / 31) as u8,
    ]
}

/// Packs `[0, 1]` floats, rounding and clamping.
#[inline]
pub fn pack_565_f32(r: f32, g: f32, b: f32) -> u16 {
    // NaN casts to 0
    let q = |v: f32, max: f32| (v * max).round().clamp(0.0, max) as u16;
    (q(r, 31.0) << 11) | (q(g, 63.0) << 5) | q(b, 31.0)
}

/// Unpacks to `[0, 1]` floats.
#[inline]
pub fn unpack_565_f32(word: u16) -> [f32; 3] {
    [
        ((word >> 11) & 0x1f) as f32 / 31.0,
        ((word >> 5) & 0x3f) as f32 / 63.0,
        (word & 0x1f) as f32 / 31.0,
    ]
}

/// An image of RGB565 words with an explicit byte stride.
///
/// Stored as a one-channel `u16` [`PixelBuffer`], so shape and stride
/// rules are the same.
#[derive(Clone, PartialEq)]
pub struct Rgb565Buffer {
    words: PixelBuffer<u16>,
}

impl Rgb565Buffer {
    /// Allocates a zeroed, tightly packed buffer.
    pub fn new(width: usize, height: usize) -> ConvertResult<Self> {
        Ok(Self {
            words: PixelBuffer::new(width, height, 1)?,
        })
    }

    /// Wraps existing words. `stride` is in bytes.
    pub fn from_vec(width: usize, height: usize, stride: usize, data: Vec<u16>) -> ConvertResult<Self> {
        Ok(Self {
            words: PixelBuffer::from_vec(width, height, 1, stride, data)?,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.words.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.words.height()
    }

    /// Bytes between row starts.
    #[inline]
    pub fn stride(&self) -> usize {
        self.words.stride()
    }

    /// Raw words including padding.
    #[inline]
    pub fn data(&self) -> &[u16] {
        self.words.data()
    }

    /// Consumes the buffer, returning its words.
    #[inline]
    pub fn into_vec(self) -> Vec<u16> {
        self.words.into_vec()
    }

    /// Row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u16] {
        self.words.row(y)
    }

    /// Word at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.words.pixel(x, y)[0]
    }
}

impl fmt::Debug for Rgb565Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rgb565Buffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("stride", &self.stride())
            .finish()
    }
}

/// Packs an RGBA8 or RGB8 buffer.
///
/// With `attenuate_alpha`, 4-channel color is multiplied by alpha first.
pub fn rgba8_to_rgb565(src: &PixelBuffer<u8>, attenuate_alpha: bool) -> ConvertResult<Rgb565Buffer> {
    let channels = src.channels();
    if channels < 3 {
        return Err(ConvertError::channels("rgba8_to_rgb565", "3 or 4", channels));
    }
    trace!(width = src.width(), height = src.height(), channels, attenuate_alpha, "rgba8_to_rgb565");
    let attenuate = attenuate_alpha && channels == 4;
    let mut out = Rgb565Buffer::new(src.width(), src.height())?;
    for_each_row_mut(&mut out.words, |y, row| {
        for (d, s) in row.iter_mut().zip(src.row(y).chunks_exact(channels)) {
            let (mut r, mut g, mut b) = (s[0], s[1], s[2]);
            if attenuate {
                let a = s[3];
                r = premultiply_u8(r, a);
                g = premultiply_u8(g, a);
                b = premultiply_u8(b, a);
            }
            *d = pack_565(r, g, b);
        }
    });
    Ok(out)
}

/// Packs a half-float RGBA or RGB buffer of `[0, 1]` values.
pub fn f16_to_rgb565(src: &PixelBuffer<f16>, attenuate_alpha: bool) -> ConvertResult<Rgb565Buffer> {
    let channels = src.channels();
    if channels < 3 {
        return Err(ConvertError::channels("f16_to_rgb565", "3 or 4", channels));
    }
    trace!(width = src.width(), height = src.height(), channels, attenuate_alpha, "f16_to_rgb565");
    let attenuate = attenuate_alpha && channels == 4;
    let mut out = Rgb565Buffer::new(src.width(), src.height())?;
    for_each_row_mut(&mut out.words, |y, row| {
        for (d, s) in row.iter_mut().zip(src.row(y).chunks_exact(channels)) {
            let a = if attenuate { s[3].to_f32().clamp(0.0, 1.0) } else { 1.0 };
            *d = pack_565_f32(s[0].to_f32() * a, s[1].to_f32() * a, s[2].to_f32() * a);
        }
    });
    Ok(out)
}

/// Unpacks to RGBA8 with every alpha set to `alpha`.
pub fn rgb565_to_rgba8(src: &Rgb565Buffer, alpha: u8) -> ConvertResult<PixelBuffer<u8>> {
    trace!(width = src.width(), height = src.height(), "rgb565_to_rgba8");
    let mut dst = PixelBuffer::<u8>::new(src.width(), src.height(), 4)?;
    for_each_row_mut(&mut dst, |y, row| {
        for (d, &w) in row.chunks_exact_mut(4).zip(src.row(y)) {
            let [r, g, b] = unpack_565(w);
            d.copy_from_slice(&[r, g, b, alpha]);
        }
    });
    Ok(dst)
}

/// Unpacks to half-float RGBA with opaque alpha.
pub fn rgb565_to_f16(src: &Rgb565Buffer) -> ConvertResult<PixelBuffer<f16>> {
    trace!(width = src.width(), height = src.height(), "rgb565_to_f16");
    let mut dst = PixelBuffer::<f16>::new(src.width(), src.height(), 4)?;
    for_each_row_mut(&mut dst, |y, row| {
        for (d, &w) in row.chunks_exact_mut(4).zip(src.row(y)) {
            let [r, g, b] = unpack_565_f32(w);
            d.copy_from_slice(&[f16::from_f32(r), f16::from_f32(g), f16::from_f32(b), f16::ONE]);
        }
    });
    Ok(dst)
}
