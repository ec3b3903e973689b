//! # pxl-core
//!
//! Core types for the pxl image-processing engine.
//!
//! This crate provides the foundational types used by every other pxl crate:
//!
//! - [`SampleKind`], [`Sample`], [`NumericSample`] - How samples are stored
//! - [`PixelBuffer`] - Row-major interleaved buffer with an explicit byte stride
//! - [`StridedView`], [`StridedViewMut`] - Bounds-checked row/pixel accessors
//! - [`ChannelPermutation`] - Validated 4-channel bijection
//! - [`RowPool`], [`parallel_for_rows`] - Row-partitioned worker pool
//!
//! ## Crate Structure
//!
//! ```text
//! pxl-core (this crate)
//!    ^
//!    |
//!    +-- pxl-convert (pixel-format conversion)
//!    +-- pxl-resample (resampling engine)
//!    +-- pxl-color (color management / tone mapping)
//!    +-- pxl-pipeline (configuration + composition)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pxl_core::{PixelBuffer, ChannelPermutation};
//!
//! let mut buf = PixelBuffer::<u8>::new(64, 32, 4).unwrap();
//! buf.row_mut(0)[0] = 255;
//!
//! let perm = ChannelPermutation::new([2, 1, 0, 3]).unwrap();
//! assert_eq!(perm.apply([1, 2, 3, 4]), [3, 2, 1, 4]);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/deserialize [`SampleKind`] and [`ChannelPermutation`]
//!
//! # Dependencies
//!
//! - [`half`] - `f16` sample storage
//! - [`rayon`] - Worker pool
//! - [`thiserror`] - Error derive
//! - [`tracing`] - Diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod format;
pub mod parallel;
pub mod permute;

pub use buffer::*;
pub use error::*;
pub use format::*;
pub use parallel::{for_each_row_mut, parallel_for_rows, parallel_row_bands, partition_rows, RowPool};
pub use permute::ChannelPermutation;

pub use half::f16;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use pxl_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{PixelBuffer, StridedView, StridedViewMut};
    pub use crate::error::{Error, Result};
    pub use crate::format::{NumericSample, Sample, SampleKind};
    pub use crate::parallel::{parallel_for_rows, RowPool};
    pub use crate::permute::ChannelPermutation;
    pub use half::f16;
}
