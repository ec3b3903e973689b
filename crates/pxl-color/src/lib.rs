//! # pxl-color
//!
//! Color management for pxl buffers.
//!
//! Converts 8-bit and N-bit RGB(A) buffers between transfer curves and
//! gamuts in place, with optional tone mapping for HDR content:
//!
//! ```text
//! code -> [LinearizeTable] -> tone curve -> gamut matrix -> [GammaTable] -> code
//! ```
//!
//! # Modules
//!
//! - [`lut`] - Transfer lookup tables
//! - [`tone`] - Tone curves and the [`ToneMapper`] trait
//! - [`transform`] - [`ColorTransform`] and [`apply_color_transform`]
//!
//! # Example
//!
//! ```rust
//! use pxl_color::{apply_color_transform, ColorTransform, ToneCurve};
//! use pxl_core::PixelBuffer;
//! use pxl_primaries::StandardProfile;
//! use pxl_transfer::TransferFunction;
//!
//! // 10-bit Rec. 2100 PQ down to an SDR Rec. 709 display
//! let mut hdr = PixelBuffer::<u16>::new(16, 16, 4).unwrap().with_bit_depth(10).unwrap();
//! let transform = ColorTransform::between(
//!     &StandardProfile::Rec2020.profile(),
//!     &StandardProfile::Rec709.profile(),
//!     TransferFunction::Pq,
//!     TransferFunction::Srgb,
//! )
//! .unwrap()
//! .with_tone_curve(ToneCurve::rec2408(true));
//! apply_color_transform(&mut hdr, &transform).unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/deserialize [`ToneCurve`]
//!
//! # Dependencies
//!
//! - [`pxl_math`] - Vectorized matrix and quantization kernels
//! - [`pxl_transfer`], [`pxl_primaries`] - Curves and gamut matrices

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod lut;
pub mod tone;
pub mod transform;

pub use error::{ColorError, ColorResult};
pub use lut::{GammaTable, LinearizeTable, LutSample};
pub use tone::{
    AcesToneMapper, FilmicToneMapper, LogarithmicToneMapper, Rec2408ToneMapper, ToneCurve, ToneMapper,
};
pub use transform::{apply_color_transform, apply_color_transform_in, ColorTransform};
