//! # pxl-resample
//!
//! Resampling engine for pxl buffers.
//!
//! One algorithm serves every sample type: 8-bit and N-bit integers are
//! rounded and clamped to their bit depth, half floats to the finite range.
//! Rows are filled in parallel on a [`pxl_core::RowPool`].
//!
//! # Modules
//!
//! - [`kernel`] - Kernel selection and weight functions
//! - [`scaler`] - The [`Resampler`] and [`resample`]
//! - [`framing`] - Fit / Fill framing and [`TargetSize`] resolution
//!
//! # Example
//!
//! ```rust
//! use pxl_core::{PixelBuffer, RowPool};
//! use pxl_resample::{resample_framed, FitMode, Resampler, ResamplingKernel};
//!
//! let src = PixelBuffer::<u8>::new(640, 480, 4).unwrap();
//! let thumb = resample_framed(
//!     RowPool::global(),
//!     &Resampler::new(ResamplingKernel::CatmullRom),
//!     &src,
//!     128,
//!     128,
//!     FitMode::Fill,
//! )
//! .unwrap();
//! assert_eq!(thumb.dimensions(), (128, 128));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/deserialize [`ResamplingKernel`] and [`FitMode`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod framing;
pub mod kernel;
pub mod scaler;

pub use error::{ResampleError, ResampleResult};
pub use framing::{resample_framed, FitMode, FramePlan, TargetSize};
pub use kernel::{BcSpline, ResamplingKernel};
pub use scaler::{resample, ResampleSample, Resampler};
