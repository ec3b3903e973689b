//! # pxl-convert
//!
//! Pixel-format conversion for pxl buffers.
//!
//! Converts between the storage kinds of [`pxl_core::SampleKind`], packs
//! and unpacks RGB565, premultiplies alpha and reorders channels.
//!
//! # Modules
//!
//! - [`convert`] - Buffer-level kind conversions
//! - [`packed`] - 10:10:10:2 word layout and bit depth changes
//! - [`rgb565`] - 16-bit RGB565 words
//! - [`alpha`] - Premultiply / unpremultiply
//! - [`channels`] - Permutation and channel count changes
//! - [`kernels`] - Scalar and vector row kernels
//!
//! # Example
//!
//! ```rust
//! use pxl_convert::{f16_to_u8, u8_to_f16};
//! use pxl_core::PixelBuffer;
//!
//! let mut src = PixelBuffer::<u8>::new(4, 4, 4).unwrap();
//! src.pixel_mut(1, 1).copy_from_slice(&[255, 128, 64, 255]);
//!
//! let half = u8_to_f16(&src).unwrap();
//! let back = f16_to_u8(&half).unwrap();
//! assert_eq!(back.pixel(1, 1), &[255, 128, 64, 255]);
//! ```
//!
//! ## Packed 10-bit
//!
//! ```rust,ignore
//! use pxl_convert::{packed_to_rgba8, rgba8_to_packed};
//!
//! let words = rgba8_to_packed(&rgba)?;
//! let premul = packed_to_rgba8(&words, true)?;
//! ```
//!
//! # Dependencies
//!
//! - [`half`] - Half-float slice conversion
//! - [`wide`] - Eight-lane row kernels
//! - [`thiserror`] - Error derive
//! - [`tracing`] - Diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod alpha;
pub mod channels;
pub mod convert;
pub mod kernels;
pub mod packed;
pub mod rgb565;

pub use alpha::{premultiply_alpha, premultiply_alpha_in, unpremultiply_alpha, unpremultiply_alpha_in, AlphaSample};
pub use channels::{
    permute_in_place, permute_in_place_in, pick_channel, reduce_channels, rgb_to_rgba, rgba_to_rgb,
};
pub use convert::*;
pub use error::{ConvertError, ConvertResult};
pub use kernels::{row_kernels, scalar_kernels, RowKernels};
pub use packed::{pack_1010102, unpack_1010102};
pub use rgb565::{
    f16_to_rgb565, pack_565, rgb565_to_f16, rgb565_to_rgba8, rgba8_to_rgb565, unpack_565,
    Rgb565Buffer,
};
