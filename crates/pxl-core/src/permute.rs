//! Validated channel permutations.
//!
//! A [`ChannelPermutation`] reorders the four channels of a pixel. It is
//! checked once at construction, so code that applies it never has to trust
//! a raw index array.
//!
//! # Semantics
//!
//! `dst[i] = src[map[i]]`. The permutation `[3, 2, 1, 0]` reverses channel
//! order (ABGR <-> RGBA), `[1, 2, 3, 0]` moves a leading alpha to the end.
//!
//! ```rust
//! use pxl_core::ChannelPermutation;
//!
//! let argb_to_rgba = ChannelPermutation::ARGB_TO_RGBA;
//! let px = argb_to_rgba.apply([255u8, 10, 20, 30]);
//! assert_eq!(px, [10, 20, 30, 255]);
//! assert_eq!(argb_to_rgba.inverse().apply(px), [255, 10, 20, 30]);
//! ```

use crate::{Error, Result};

/// A bijection over channel indices `{0, 1, 2, 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[i64; 4]", into = "[i64; 4]"))]
pub struct ChannelPermutation {
    map: [usize; 4],
}

impl ChannelPermutation {
    /// Leaves channels in place.
    pub const IDENTITY: Self = Self { map: [0, 1, 2, 3] };
    /// Reverses channel order (RGBA <-> ABGR).
    pub const REVERSE: Self = Self { map: [3, 2, 1, 0] };
    /// Alpha-first to alpha-last.
    pub const ARGB_TO_RGBA: Self = Self { map: [1, 2, 3, 0] };
    /// Alpha-last to alpha-first.
    pub const RGBA_TO_ARGB: Self = Self { map: [3, 0, 1, 2] };
    /// Swaps red and blue (its own inverse).
    pub const BGRA_TO_RGBA: Self = Self { map: [2, 1, 0, 3] };

    /// Builds a permutation, rejecting anything that is not a bijection.
    pub fn new(map: [usize; 4]) -> Result<Self> {
        let mut seen = [false; 4];
        for &idx in &map {
            if idx > 3 {
                return Err(Error::invalid_permutation(
                    map.map(|v| v as i64),
                    format!("index {idx} is outside 0..=3"),
                ));
            }
            if seen[idx] {
                return Err(Error::invalid_permutation(
                    map.map(|v| v as i64),
                    format!("index {idx} appears more than once"),
                ));
            }
            seen[idx] = true;
        }
        Ok(Self { map })
    }

    /// Builds a permutation from signed indices, as they arrive from configuration.
    pub fn from_signed(map: [i64; 4]) -> Result<Self> {
        let mut out = [0usize; 4];
        for (slot, &idx) in out.iter_mut().zip(&map) {
            if !(0..=3).contains(&idx) {
                return Err(Error::invalid_permutation(
                    map,
                    format!("index {idx} is outside 0..=3"),
                ));
            }
            *slot = idx as usize;
        }
        Self::new(out)
    }

    /// Source index for each destination channel.
    #[inline]
    pub const fn map(&self) -> [usize; 4] {
        self.map
    }

    /// Whether this permutation leaves every channel in place.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// The permutation that undoes this one.
    pub fn inverse(&self) -> Self {
        let mut inv = [0usize; 4];
        for (i, &src) in self.map.iter().enumerate() {
            inv[src] = i;
        }
        Self { map: inv }
    }

    /// Applies `self`, then `next`.
    pub fn then(&self, next: &Self) -> Self {
        Self {
            map: next.map.map(|i| self.map[i]),
        }
    }

    /// Reorders one pixel.
    #[inline]
    pub fn apply<T: Copy>(&self, px: [T; 4]) -> [T; 4] {
        [px[self.map[0]], px[self.map[1]], px[self.map[2]], px[self.map[3]]]
    }

    /// Reorders one pixel held in a slice of at least four elements.
    #[inline]
    pub fn apply_slice<T: Copy>(&self, src: &[T], dst: &mut [T]) {
        dst[0] = src[self.map[0]];
        dst[1] = src[self.map[1]];
        dst[2] = src[self.map[2]];
        dst[3] = src[self.map[3]];
    }

    /// Reorders every 4-element pixel of `row` in place.
    pub fn apply_row_in_place<T: Copy>(&self, row: &mut [T]) {
        if self.is_identity() {
            return;
        }
        for px in row.chunks_exact_mut(4) {
            let p = [px[0], px[1], px[2], px[3]];
            self.apply_slice(&p, px);
        }
    }
}

impl Default for ChannelPermutation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<[i64; 4]> for ChannelPermutation {
    type Error = Error;

    fn try_from(map: [i64; 4]) -> Result<Self> {
        Self::from_signed(map)
    }
}

impl TryFrom<[usize; 4]> for ChannelPermutation {
    type Error = Error;

    fn try_from(map: [usize; 4]) -> Result<Self> {
        Self::new(map)
    }
}

impl From<ChannelPermutation> for [i64; 4] {
    fn from(p: ChannelPermutation) -> Self {
        p.map.map(|v| v as i64)
    }
}
