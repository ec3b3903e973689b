//! Packed 10:10:10:2 words.
//!
//! A word is `(a2 << 30) | (r10 << 20) | (g10 << 10) | b10`.
//!
//! # Bit depth changes
//!
//! | From | To | Formula |
//! |------|----|---------|
//! | 10 bit | 8 bit | `(c * 255 + 511) / 1023` |
//! | 8 bit | 10 bit | `(c * 1023 + 127) / 255` |
//! | 2 bit | 8 bit | `a * 85` |
//! | 8 bit | 2 bit | `(a * 3 + 127) / 255` |
//!
//! All four are `round(c * dst_max / src_max)` with halves rounded up, so
//! 8-bit values that are exact multiples of the 10-bit step survive a
//! round trip unchanged.
//!
//! N-bit rows use the same rule through [`rescale`]. At 10 bits color is
//! copied as is and alpha expands to `a * 341`, so words survive
//! unpack-then-pack exactly.

use crate::alpha::premultiply_u8;
use pxl_core::f16;

const MASK10: u32 = 0x3ff;

/// Packs 10-bit color and 2-bit alpha into one word. Inputs are masked.
#[inline]
pub const fn pack_1010102(r: u16, g: u16, b: u16, a: u8) -> u32 {
    ((a as u32 & 0x3) << 30)
        | ((r as u32 & MASK10) << 20)
        | ((g as u32 & MASK10) << 10)
        | (b as u32 & MASK10)
}

/// Splits a word into `[r10, g10, b10, a2]`.
#[inline]
pub const fn unpack_1010102(word: u32) -> [u16; 4] {
    [
        ((word >> 20) & MASK10) as u16,
        ((word >> 10) & MASK10) as u16,
        (word & MASK10) as u16,
        (word >> 30) as u16,
    ]
}

/// 10-bit to 8-bit, rounded.
#[inline]
pub const fn ten_to_eight(c: u16) -> u8 {
    let c = if c > 1023 { 1023 } else { c as u32 };
    ((c * 255 + 511) / 1023) as u8
}

/// 8-bit to 10-bit, rounded.
#[inline]
pub const fn eight_to_ten(c: u8) -> u16 {
    ((c as u32 * 1023 + 127) / 255) as u16
}

/// 2-bit alpha to 8-bit.
#[inline]
pub const fn alpha2_to_8(a: u8) -> u8 {
    let a = if a > 3 { 3 } else { a };
    a * 85
}

/// 8-bit alpha to 2-bit, rounded.
#[inline]
pub const fn alpha8_to_2(a: u8) -> u8 {
    ((a as u16 * 3 + 127) / 255) as u8
}

/// Packs one RGBA8 pixel.
#[inline]
pub fn rgba8_to_word(px: [u8; 4]) -> u32 {
    pack_1010102(
        eight_to_ten(px[0]),
        eight_to_ten(px[1]),
        eight_to_ten(px[2]),
        alpha8_to_2(px[3]),
    )
}

/// Unpacks one word to RGBA8, optionally premultiplying color by alpha.
#[inline]
pub fn word_to_rgba8(word: u32, premultiply: bool) -> [u8; 4] {
    let [r, g, b, a] = unpack_1010102(word);
    let a8 = alpha2_to_8(a as u8);
    let mut px = [ten_to_eight(r), ten_to_eight(g), ten_to_eight(b), a8];
    if premultiply {
        for c in &mut px[..3] {
            *c = premultiply_u8(*c, a8);
        }
    }
    px
}

/// Unpacks one word to half floats in `[0, 1]`.
#[inline]
pub fn word_to_f16(word: u32) -> [f16; 4] {
    let [r, g, b, a] = unpack_1010102(word);
    let s = 1.0 / 1023.0;
    [
        f16::from_f32(r as f32 * s),
        f16::from_f32(g as f32 * s),
        f16::from_f32(b as f32 * s),
        f16::from_f32(a as f32 / 3.0),
    ]
}

/// Packs four `[0, 1]` floats, rounding and clamping each channel.
#[inline]
pub fn f32_to_word(px: [f32; 4]) -> u32 {
    let q = |v: f32, max: f32| -> u16 {
        // NaN casts to 0
        (v * max).round().clamp(0.0, max) as u16
    };
    pack_1010102(
        q(px[0], 1023.0),
        q(px[1], 1023.0),
        q(px[2], 1023.0),
        q(px[3], 3.0) as u8,
    )
}

/// Packs one half-float pixel.
#[inline]
pub fn f16_to_word(px: [f16; 4]) -> u32 {
    f32_to_word(px.map(f16::to_f32))
}

/// Packs a row of RGBA8 (or RGB8, alpha opaque) pixels.
pub fn rgba8_to_packed_row(src: &[u8], channels: usize, dst: &mut [u32]) {
    match channels {
        4 => {
            for (d, s) in dst.iter_mut().zip(src.chunks_exact(4)) {
                *d = rgba8_to_word([s[0], s[1], s[2], s[3]]);
            }
        }
        _ => {
            for (d, s) in dst.iter_mut().zip(src.chunks_exact(channels)) {
                let (r, g, b) = pick_rgb(s);
                *d = rgba8_to_word([r, g, b, 255]);
            }
        }
    }
}

/// Unpacks a row of words to RGBA8.
pub fn packed_to_rgba8_row(src: &[u32], dst: &mut [u8], premultiply: bool) {
    for (d, &w) in dst.chunks_exact_mut(4).zip(src) {
        d.copy_from_slice(&word_to_rgba8(w, premultiply));
    }
}

/// Unpacks a row of words to half-float RGBA.
pub fn packed_to_f16_row(src: &[u32], dst: &mut [f16]) {
    for (d, &w) in dst.chunks_exact_mut(4).zip(src) {
        d.copy_from_slice(&word_to_f16(w));
    }
}

/// Packs a row of half-float RGBA (or RGB, alpha opaque).
pub fn f16_to_packed_row(src: &[f16], channels: usize, dst: &mut [u32]) {
    for (d, s) in dst.iter_mut().zip(src.chunks_exact(channels)) {
        let px = if channels == 4 {
            [s[0], s[1], s[2], s[3]]
        } else {
            let r = s[0];
            let g = s.get(1).copied().unwrap_or(r);
            let b = s.get(2).copied().unwrap_or(r);
            [r, g, b, f16::ONE]
        };
        *d = f16_to_word(px);
    }
}

/// Packs a row of `[0, 1]` floats with `channels` per pixel.
pub fn f32_to_packed_row(src: &[f32], channels: usize, dst: &mut [u32]) {
    for (d, s) in dst.iter_mut().zip(src.chunks_exact(channels)) {
        let r = s[0];
        let g = s.get(1).copied().unwrap_or(r);
        let b = s.get(2).copied().unwrap_or(r);
        let a = if channels == 4 { s[3] } else { 1.0 };
        *d = f32_to_word([r, g, b, a]);
    }
}

/// `round(v * to / from)`, halves rounded up.
#[inline]
pub const fn rescale(v: u32, from: u32, to: u32) -> u32 {
    ((v as u64 * to as u64 + from as u64 / 2) / from as u64) as u32
}

/// Unpacks a row of words to N-bit RGBA whose maximum code is `max`.
pub fn packed_to_u16_row(src: &[u32], max: u32, dst: &mut [u16]) {
    for (d, &w) in dst.chunks_exact_mut(4).zip(src) {
        let [r, g, b, a] = unpack_1010102(w);
        let c = |v: u16| rescale(v as u32, 1023, max) as u16;
        d.copy_from_slice(&[c(r), c(g), c(b), rescale(a as u32, 3, max) as u16]);
    }
}

/// Packs a row of N-bit RGBA (or RGB, alpha opaque) whose maximum code is `max`.
pub fn u16_to_packed_row(src: &[u16], channels: usize, max: u32, dst: &mut [u32]) {
    let c = |v: u16| rescale((v as u32).min(max), max, 1023) as u16;
    for (d, s) in dst.iter_mut().zip(src.chunks_exact(channels)) {
        let a = if channels == 4 {
            rescale((s[3] as u32).min(max), max, 3) as u8
        } else {
            3
        };
        *d = pack_1010102(c(s[0]), c(s[1]), c(s[2]), a);
    }
}

// gray replicates into all three color channels
#[inline]
fn pick_rgb(s: &[u8]) -> (u8, u8, u8) {
    let r = s[0];
    (r, s.get(1).copied().unwrap_or(r), s.get(2).copied().unwrap_or(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let w = pack_1010102(1023, 0, 1, 3);
        assert_eq!(w, 0xC000_0000 | (1023 << 20) | 1);
        assert_eq!(unpack_1010102(w), [1023, 0, 1, 3]);
    }

    #[test]
    fn test_depth_formulas() {
        assert_eq!(ten_to_eight(0), 0);
        assert_eq!(ten_to_eight(1023), 255);
        assert_eq!(ten_to_eight(512), 128);
        assert_eq!(eight_to_ten(255), 1023);
        assert_eq!(eight_to_ten(128), 514);
        assert_eq!(alpha2_to_8(1), 85);
        assert_eq!(alpha2_to_8(3), 255);
        assert_eq!(alpha8_to_2(42), 0);
        assert_eq!(alpha8_to_2(43), 1);
        assert_eq!(alpha8_to_2(255), 3);
    }

    #[test]
    fn test_eight_bit_roundtrip_exact() {
        // every 8-bit value survives 8 -> 10 -> 8
        for c in 0..=255u8 {
            assert_eq!(ten_to_eight(eight_to_ten(c)), c);
        }
        for a in 0..=3u8 {
            assert_eq!(alpha8_to_2(alpha2_to_8(a)), a);
        }
    }

    #[test]
    fn test_word_roundtrip_on_grid() {
        // 10-bit values that are images of 8-bit values round trip exactly
        for c in (0..=255u8).step_by(5) {
            let w = pack_1010102(eight_to_ten(c), eight_to_ten(255 - c), eight_to_ten(c / 2), 2);
            assert_eq!(rgba8_to_word(word_to_rgba8(w, false)), w);
        }
    }

    #[test]
    fn test_word_roundtrip_generic_within_one_step() {
        for c in 0..=1023u16 {
            let w = pack_1010102(c, c, c, 3);
            let back = unpack_1010102(rgba8_to_word(word_to_rgba8(w, false)));
            // one 8-bit step is about four 10-bit steps
            assert!((back[0] as i32 - c as i32).abs() <= 2, "c={c} back={}", back[0]);
        }
    }

    #[test]
    fn test_premultiplied_unpack() {
        let w = pack_1010102(1023, 512, 0, 1);
        assert_eq!(word_to_rgba8(w, true), [85, 43, 0, 85]);
        assert_eq!(word_to_rgba8(w, false), [255, 128, 0, 85]);
    }

    #[test]
    fn test_float_packing_clamps() {
        let w = f32_to_word([2.0, -1.0, 0.5, 0.7]);
        assert_eq!(unpack_1010102(w), [1023, 0, 512, 2]);
        let h = word_to_f16(pack_1010102(1023, 0, 0, 3));
        assert_eq!(h[0], f16::ONE);
        assert_eq!(h[3], f16::ONE);
        assert_eq!(f16_to_word(h), pack_1010102(1023, 0, 0, 3));
        assert_eq!(unpack_1010102(f32_to_word([f32::NAN, 0.0, 0.0, 1.0]))[0], 0);
    }

    #[test]
    fn test_ten_bit_rows_are_lossless() {
        let words: Vec<u32> = (0..=1023u16)
            .map(|c| pack_1010102(c, 1023 - c, c / 3, (c % 4) as u8))
            .collect();
        let mut wide = vec![0u16; words.len() * 4];
        packed_to_u16_row(&words, 1023, &mut wide);
        assert_eq!(&wide[4..8], &[1, 1022, 0, 341]);
        let mut back = vec![0u32; words.len()];
        u16_to_packed_row(&wide, 4, 1023, &mut back);
        assert_eq!(back, words);
    }

    #[test]
    fn test_sixteen_bit_rows() {
        let mut wide = [0u16; 4];
        packed_to_u16_row(&[pack_1010102(1023, 512, 0, 2)], 65535, &mut wide);
        assert_eq!(wide, [65535, 32800, 0, 43690]);
        let mut word = [0u32];
        u16_to_packed_row(&wide, 4, 65535, &mut word);
        assert_eq!(word[0], pack_1010102(1023, 512, 0, 2));
        u16_to_packed_row(&[70, 80, 90], 3, 1023, &mut word);
        assert_eq!(unpack_1010102(word[0]), [70, 80, 90, 3]);
    }

    #[test]
    fn test_rows() {
        let src = [255u8, 0, 0, 255, 0, 255, 0, 0];
        let mut words = [0u32; 2];
        rgba8_to_packed_row(&src, 4, &mut words);
        let mut back = [0u8; 8];
        packed_to_rgba8_row(&words, &mut back, false);
        assert_eq!(back, src);

        let rgb = [10u8, 20, 30];
        rgba8_to_packed_row(&rgb, 3, &mut words[..1]);
        assert_eq!(unpack_1010102(words[0])[3], 3);
    }
}
