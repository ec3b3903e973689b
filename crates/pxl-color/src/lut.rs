//! Transfer curve lookup tables.
//!
//! Linearizing reads one table entry per code value. Re-encoding quantizes
//! a linear `[0, 1]` value to `steps + 1` table indices:
//!
//! | Samples | Linearize entries | Gamma entries | Steps |
//! |---------|-------------------|---------------|-------|
//! | 8-bit | 256 | 2049 | 2048 |
//! | N-bit | `2^N` | `2^N` | `2^N - 1` |
//!
//! Gamma entries are `clamp(round(from_linear(j / steps) × max), 0, max)`.

use pxl_core::{max_value, Sample};
use pxl_transfer::TransferFunction;

/// Integer samples that index the tables.
pub trait LutSample: Sample {
    /// Sample as a table index.
    fn code(self) -> usize;

    /// Table entry to sample. `code` never exceeds the bit depth maximum.
    fn from_code(code: u32) -> Self;

    /// Quantization steps of the gamma table at `bit_depth`.
    fn gamma_steps(bit_depth: u32) -> u32;
}

impl LutSample for u8 {
    #[inline]
    fn code(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_code(code: u32) -> Self {
        code as u8
    }

    #[inline]
    fn gamma_steps(_bit_depth: u32) -> u32 {
        2048
    }
}

impl LutSample for u16 {
    #[inline]
    fn code(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_code(code: u32) -> Self {
        code as u16
    }

    #[inline]
    fn gamma_steps(bit_depth: u32) -> u32 {
        max_value(bit_depth)
    }
}

/// Code value to linear light.
#[derive(Debug, Clone)]
pub struct LinearizeTable {
    values: Vec<f32>,
}

impl LinearizeTable {
    /// Builds `2^bit_depth` entries of `to_linear(j / max)`.
    pub fn new(transfer: &TransferFunction, bit_depth: u32) -> Self {
        let max = max_value(bit_depth);
        let values = (0..=max).map(|j| transfer.to_linear(j as f32 / max as f32)).collect();
        Self { values }
    }

    /// Linear value of `code`; codes above the maximum read the last entry.
    #[inline]
    pub fn get(&self, code: usize) -> f32 {
        self.values[code.min(self.values.len() - 1)]
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; tables hold at least 256 entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Quantized linear light to code value.
#[derive(Debug, Clone)]
pub struct GammaTable<T> {
    codes: Vec<T>,
    steps: u32,
}

impl<T: LutSample> GammaTable<T> {
    /// Builds the table for samples at `bit_depth`.
    pub fn new(transfer: &TransferFunction, bit_depth: u32) -> Self {
        let steps = T::gamma_steps(bit_depth);
        let max = max_value(bit_depth) as f32;
        let codes = (0..=steps)
            .map(|j| {
                let v = (transfer.from_linear(j as f32 / steps as f32) * max).round();
                // NaN casts to 0
                T::from_code(v.clamp(0.0, max) as u32)
            })
            .collect();
        Self { codes, steps }
    }

    /// Highest valid index.
    #[inline]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Entry at `index`, clamped to the table.
    #[inline]
    pub fn lookup(&self, index: u32) -> T {
        self.codes[index.min(self.steps) as usize]
    }

    /// Quantizes one linear value and looks it up.
    #[inline]
    pub fn encode(&self, linear: f32) -> T {
        let v = if linear.is_nan() { 0.0 } else { linear.clamp(0.0, 1.0) };
        self.lookup((v * self.steps as f32) as u32)
    }
}
