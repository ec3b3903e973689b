//! Vectorized row kernels built on `wide`.
//!
//! Each kernel has a scalar twin (`*_scalar`) with identical results; the
//! vector versions handle whole lanes and fall back to the scalar code for
//! the remainder.
//!
//! # Example
//!
//! ```rust
//! use pxl_math::{simd, Mat3};
//!
//! let swap_rb = Mat3::from_rows([0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
//! let mut row = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
//! simd::transform_rgb_row(&swap_rb, &mut row);
//! assert_eq!(row, [0.3, 0.2, 0.1, 0.6, 0.5, 0.4]);
//! ```

use crate::Mat3;
use wide::{f32x4, f32x8};

/// Applies `m` to every interleaved RGB triplet of `rgb`, four pixels per step.
///
/// A trailing partial triplet is left untouched.
pub fn transform_rgb_row(m: &Mat3, rgb: &mut [f32]) {
    let c = m.c.map(f32x4::splat);
    let mut chunks = rgb.chunks_exact_mut(12);
    for px in &mut chunks {
        let r = f32x4::from([px[0], px[3], px[6], px[9]]);
        let g = f32x4::from([px[1], px[4], px[7], px[10]]);
        let b = f32x4::from([px[2], px[5], px[8], px[11]]);

        let nr = (r * c[0] + g * c[1] + b * c[2]).to_array();
        let ng = (r * c[3] + g * c[4] + b * c[5]).to_array();
        let nb = (r * c[6] + g * c[7] + b * c[8]).to_array();

        for i in 0..4 {
            px[i * 3] = nr[i];
            px[i * 3 + 1] = ng[i];
            px[i * 3 + 2] = nb[i];
        }
    }
    transform_rgb_row_scalar(m, chunks.into_remainder());
}

/// Scalar twin of [`transform_rgb_row`].
pub fn transform_rgb_row_scalar(m: &Mat3, rgb: &mut [f32]) {
    for px in rgb.chunks_exact_mut(3) {
        let [r, g, b] = m.transform_rgb([px[0], px[1], px[2]]);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }
}

/// Quantizes `[0, 1]` values to table indices: `min((clamp(v, 0, 1) * steps) as u32, steps)`.
///
/// NaN maps to index 0. Writes `min(values.len(), out.len())` indices.
pub fn quantize_unit(values: &[f32], steps: u32, out: &mut [u32]) {
    let n = values.len().min(out.len());
    let (values, out) = (&values[..n], &mut out[..n]);
    let zero = f32x8::splat(0.0);
    let one = f32x8::splat(1.0);
    let scale = f32x8::splat(steps as f32);

    let mut src = values.chunks_exact(8);
    let mut dst = out.chunks_exact_mut(8);
    for (s, d) in (&mut src).zip(&mut dst) {
        let v = f32x8::from([s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]]);
        // max/min order keeps NaN lanes at zero
        let q = (v.max(zero).min(one) * scale).to_array();
        for (o, q) in d.iter_mut().zip(q) {
            *o = quantize_one(q, steps);
        }
    }
    quantize_unit_scalar(src.remainder(), steps, dst.into_remainder());
}

/// Scalar twin of [`quantize_unit`].
pub fn quantize_unit_scalar(values: &[f32], steps: u32, out: &mut [u32]) {
    for (o, &v) in out.iter_mut().zip(values) {
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        *o = quantize_one(v * steps as f32, steps);
    }
}

#[inline]
fn quantize_one(scaled: f32, steps: u32) -> u32 {
    // `as` saturates and sends NaN to 0
    (scaled as u32).min(steps)
}

/// Scales every value by `scale` and clamps to `[lo, hi]`.
pub fn scale_clamp_row(values: &mut [f32], scale: f32, lo: f32, hi: f32) {
    let (s, l, h) = (f32x8::splat(scale), f32x8::splat(lo), f32x8::splat(hi));
    let mut chunks = values.chunks_exact_mut(8);
    for c in &mut chunks {
        let v = f32x8::from([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]);
        c.copy_from_slice(&(v * s).max(l).min(h).to_array());
    }
    scale_clamp_row_scalar(chunks.into_remainder(), scale, lo, hi);
}

/// Scalar twin of [`scale_clamp_row`].
pub fn scale_clamp_row_scalar(values: &mut [f32], scale: f32, lo: f32, hi: f32) {
    for v in values {
        *v = (*v * scale).max(lo).min(hi);
    }
}
