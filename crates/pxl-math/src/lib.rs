//! # pxl-math
//!
//! Math primitives for the color pipeline.
//!
//! - [`Mat3`] - 3x3 gamut matrix, row-major, applied to column vectors
//! - [`Vec3`] - RGB / XYZ triplet
//! - [`bradford_adaptation`] - White-point adaptation between two illuminants
//! - [`simd`] - `wide`-based row kernels (mat-vec over interleaved RGB, quantization)
//!
//! # Convention
//!
//! The nine matrix coefficients are stored row-major, so applying
//! `[c0..c8]` to a pixel gives
//!
//! ```text
//! r' = r*c0 + g*c1 + b*c2
//! g' = r*c3 + g*c4 + b*c5
//! b' = r*c6 + g*c7 + b*c8
//! ```
//!
//! # Usage
//!
//! ```rust
//! use pxl_math::{Mat3, Vec3};
//!
//! let m = Mat3::from_array([
//!     0.6274, 0.3293, 0.0433,
//!     0.0691, 0.9195, 0.0114,
//!     0.0164, 0.0880, 0.8956,
//! ]);
//! let white = m * Vec3::ONE;
//! assert!((white.y - 1.0).abs() < 1e-3);
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - Matrix inverse and products
//! - [`wide`] - Portable SIMD on stable Rust
//!
//! # Used By
//!
//! - `pxl-primaries` - RGB/XYZ matrix generation
//! - `pxl-color` - Gamut step of the color transform

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod mat3;
mod vec3;
pub mod simd;

pub use adapt::*;
pub use mat3::*;
pub use vec3::*;
