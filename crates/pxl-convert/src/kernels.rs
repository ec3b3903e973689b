//! Row conversion kernels with a scalar reference and a vector fast path.
//!
//! [`ScalarKernels`] is the reference implementation. [`WideKernels`]
//! processes eight samples per step with `wide::f32x8` and converts halves
//! through `half`'s slice routines (F16C where the CPU has it). Both round
//! the same way, so their output is bit-identical; tests hold them to it.
//!
//! [`row_kernels`] picks one the first time it is called. `wide` fixes its
//! instruction set when the crate is compiled, so the choice follows the
//! build's target features: [`WideKernels`] when `wide` has a native
//! backend (SSE2, NEON or WASM SIMD), [`ScalarKernels`] otherwise. Only the
//! half conversions inside `half` detect CPU features at run time.

use half::slice::HalfFloatSliceExt;
use pxl_core::{f16, NumericSample};
use std::sync::OnceLock;
use tracing::debug;
use wide::f32x8;

/// Per-row sample conversions.
///
/// Each function writes `min(src.len(), dst.len())` samples.
pub trait RowKernels: Send + Sync {
    /// Implementation name for logs.
    fn name(&self) -> &'static str;

    /// `dst = f16(src * scale)`.
    fn u8_to_f16(&self, src: &[u8], scale: f32, dst: &mut [f16]);

    /// `dst = f16(src * scale)`.
    fn u16_to_f16(&self, src: &[u16], scale: f32, dst: &mut [f16]);

    /// `dst = round(clamp(src * max, 0, max))`.
    fn f16_to_u8(&self, src: &[f16], max: f32, dst: &mut [u8]);

    /// `dst = round(clamp(src * max, 0, max))`.
    fn f16_to_u16(&self, src: &[f16], max: f32, dst: &mut [u16]);

    /// `dst = round(clamp(src * max, 0, max))`.
    fn f32_to_u8(&self, src: &[f32], max: f32, dst: &mut [u8]);
}

/// Reference implementation, one sample at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarKernels;

/// Eight samples per step on `wide` vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct WideKernels;

static SCALAR: ScalarKernels = ScalarKernels;
static WIDE: WideKernels = WideKernels;

/// Kernels chosen for this CPU.
pub fn row_kernels() -> &'static dyn RowKernels {
    static SELECTED: OnceLock<&'static dyn RowKernels> = OnceLock::new();
    *SELECTED.get_or_init(|| {
        let k: &'static dyn RowKernels = if WIDE_IS_NATIVE { &WIDE } else { &SCALAR };
        debug!(kernels = k.name(), "Selected row kernels");
        k
    })
}

/// The reference kernels, regardless of CPU.
pub fn scalar_kernels() -> &'static dyn RowKernels {
    &SCALAR
}

/// Whether `wide` compiles to vector instructions for this target.
pub const WIDE_IS_NATIVE: bool = cfg!(any(
    target_feature = "sse2",
    all(target_arch = "aarch64", target_feature = "neon"),
    all(target_arch = "wasm32", target_feature = "simd128"),
));

#[inline]
fn quantize<T: NumericSample>(v: f32, max: f32) -> T {
    T::from_f32_clamped(v * max, max)
}

impl RowKernels for ScalarKernels {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn u8_to_f16(&self, src: &[u8], scale: f32, dst: &mut [f16]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = f16::from_f32(s as f32 * scale);
        }
    }

    fn u16_to_f16(&self, src: &[u16], scale: f32, dst: &mut [f16]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = f16::from_f32(s as f32 * scale);
        }
    }

    fn f16_to_u8(&self, src: &[f16], max: f32, dst: &mut [u8]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = quantize(s.to_f32(), max);
        }
    }

    fn f16_to_u16(&self, src: &[f16], max: f32, dst: &mut [u16]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = quantize(s.to_f32(), max);
        }
    }

    fn f32_to_u8(&self, src: &[f32], max: f32, dst: &mut [u8]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = quantize(s, max);
        }
    }
}

#[inline]
fn lanes<T: Copy + Into<f32>>(s: &[T]) -> f32x8 {
    f32x8::from([
        s[0].into(),
        s[1].into(),
        s[2].into(),
        s[3].into(),
        s[4].into(),
        s[5].into(),
        s[6].into(),
        s[7].into(),
    ])
}

// round(clamp(v * max, 0, max)) on eight lanes; +0.5 then truncation
// matches NumericSample::from_f32_clamped
#[inline]
fn quantize8(v: f32x8, max: f32) -> [f32; 8] {
    let m = f32x8::splat(max);
    ((v * m).max(f32x8::splat(0.0)).min(m) + f32x8::splat(0.5)).to_array()
}

impl RowKernels for WideKernels {
    fn name(&self) -> &'static str {
        "wide"
    }

    fn u8_to_f16(&self, src: &[u8], scale: f32, dst: &mut [f16]) {
        let n = src.len().min(dst.len());
        let s = f32x8::splat(scale);
        let mut sc = src[..n].chunks_exact(8);
        let mut dc = dst[..n].chunks_exact_mut(8);
        for (a, b) in (&mut sc).zip(&mut dc) {
            b.convert_from_f32_slice(&(lanes(a) * s).to_array());
        }
        SCALAR.u8_to_f16(sc.remainder(), scale, dc.into_remainder());
    }

    fn u16_to_f16(&self, src: &[u16], scale: f32, dst: &mut [f16]) {
        let n = src.len().min(dst.len());
        let s = f32x8::splat(scale);
        let mut sc = src[..n].chunks_exact(8);
        let mut dc = dst[..n].chunks_exact_mut(8);
        for (a, b) in (&mut sc).zip(&mut dc) {
            b.convert_from_f32_slice(&(lanes(a) * s).to_array());
        }
        SCALAR.u16_to_f16(sc.remainder(), scale, dc.into_remainder());
    }

    fn f16_to_u8(&self, src: &[f16], max: f32, dst: &mut [u8]) {
        let n = src.len().min(dst.len());
        let mut tmp = [0.0f32; 8];
        let mut sc = src[..n].chunks_exact(8);
        let mut dc = dst[..n].chunks_exact_mut(8);
        for (a, b) in (&mut sc).zip(&mut dc) {
            a.convert_to_f32_slice(&mut tmp);
            for (d, q) in b.iter_mut().zip(quantize8(f32x8::from(tmp), max)) {
                *d = q as u8;
            }
        }
        SCALAR.f16_to_u8(sc.remainder(), max, dc.into_remainder());
    }

    fn f16_to_u16(&self, src: &[f16], max: f32, dst: &mut [u16]) {
        let n = src.len().min(dst.len());
        let mut tmp = [0.0f32; 8];
        let mut sc = src[..n].chunks_exact(8);
        let mut dc = dst[..n].chunks_exact_mut(8);
        for (a, b) in (&mut sc).zip(&mut dc) {
            a.convert_to_f32_slice(&mut tmp);
            for (d, q) in b.iter_mut().zip(quantize8(f32x8::from(tmp), max)) {
                *d = q as u16;
            }
        }
        SCALAR.f16_to_u16(sc.remainder(), max, dc.into_remainder());
    }

    fn f32_to_u8(&self, src: &[f32], max: f32, dst: &mut [u8]) {
        let n = src.len().min(dst.len());
        let mut sc = src[..n].chunks_exact(8);
        let mut dc = dst[..n].chunks_exact_mut(8);
        for (a, b) in (&mut sc).zip(&mut dc) {
            for (d, q) in b.iter_mut().zip(quantize8(lanes(a), max)) {
                *d = q as u8;
            }
        }
        SCALAR.f32_to_u8(sc.remainder(), max, dc.into_remainder());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halves() -> Vec<f16> {
        let mut v: Vec<f16> = (0..=300).map(|i| f16::from_f32(i as f32 / 256.0 - 0.1)).collect();
        v.extend([f16::INFINITY, f16::NEG_INFINITY, f16::NAN, f16::MAX, f16::from_f32(0.5)]);
        v
    }

    #[test]
    fn test_u8_to_f16_agree() {
        let src: Vec<u8> = (0..=255).chain(0..13).collect();
        let mut a = vec![f16::ZERO; src.len()];
        let mut b = a.clone();
        ScalarKernels.u8_to_f16(&src, 1.0 / 255.0, &mut a);
        WideKernels.u8_to_f16(&src, 1.0 / 255.0, &mut b);
        assert_eq!(
            a.iter().map(|h| h.to_bits()).collect::<Vec<_>>(),
            b.iter().map(|h| h.to_bits()).collect::<Vec<_>>()
        );
        assert_eq!(a[255], f16::ONE);
    }

    #[test]
    fn test_u16_to_f16_agree() {
        let src: Vec<u16> = (0..1024).step_by(3).collect();
        let mut a = vec![f16::ZERO; src.len()];
        let mut b = a.clone();
        ScalarKernels.u16_to_f16(&src, 1.0 / 1023.0, &mut a);
        WideKernels.u16_to_f16(&src, 1.0 / 1023.0, &mut b);
        assert_eq!(
            a.iter().map(|h| h.to_bits()).collect::<Vec<_>>(),
            b.iter().map(|h| h.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_f16_to_int_agree() {
        let src = halves();
        let mut a = vec![0u8; src.len()];
        let mut b = a.clone();
        ScalarKernels.f16_to_u8(&src, 255.0, &mut a);
        WideKernels.f16_to_u8(&src, 255.0, &mut b);
        assert_eq!(a, b);

        let mut a = vec![0u16; src.len()];
        let mut b = a.clone();
        ScalarKernels.f16_to_u16(&src, 4095.0, &mut a);
        WideKernels.f16_to_u16(&src, 4095.0, &mut b);
        assert_eq!(a, b);
        assert!(a.iter().all(|&v| v <= 4095));
    }

    #[test]
    fn test_f32_to_u8_agree_and_clamp() {
        let src: Vec<f32> = (0..100).map(|i| i as f32 / 50.0 - 0.5).collect();
        let mut a = vec![0u8; src.len()];
        let mut b = a.clone();
        ScalarKernels.f32_to_u8(&src, 255.0, &mut a);
        WideKernels.f32_to_u8(&src, 255.0, &mut b);
        assert_eq!(a, b);
        assert_eq!(a[0], 0);
        assert_eq!(a[99], 255);
    }

    #[test]
    fn test_selection_follows_build_target() {
        let expected = if WIDE_IS_NATIVE { "wide" } else { "scalar" };
        assert_eq!(row_kernels().name(), expected);
        assert_eq!(row_kernels().name(), expected);
        assert_eq!(scalar_kernels().name(), "scalar");
    }
}
