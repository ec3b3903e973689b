//! # pxl-transfer
//!
//! Transfer curves relating stored sample values to linear light.
//!
//! Every module exposes the same pair:
//!
//! - `to_linear(v)` - encoded `[0, 1]` to linear light
//! - `from_linear(l)` - linear light to encoded `[0, 1]`
//!
//! and [`TransferFunction`] selects one at runtime.
//!
//! # Curves
//!
//! | Curve | Linear range | Notes |
//! |-------|--------------|-------|
//! | [`srgb`] | `[0, 1]` | IEC 61966-2-1 |
//! | [`gamma`] | `[0, 1]` | Pure power law |
//! | [`rec709`] | `[0, 1]` | BT.709 / BT.2020 camera curve |
//! | [`pq`] | `[0, 49.26]` | `1.0` is 203 nits (BT.2408 reference white) |
//! | [`hlg`] | `[0, 1]` | Scene linear, BT.2100 |
//! | [`smpte428`] | `[0, 1.09]` | DCDM, 48 nits reference |
//!
//! # Usage
//!
//! ```rust
//! use pxl_transfer::TransferFunction;
//!
//! let lin = TransferFunction::Srgb.to_linear(0.5);
//! assert!((lin - 0.214).abs() < 0.001);
//! let back = TransferFunction::Srgb.from_linear(lin);
//! assert!((back - 0.5).abs() < 1e-5);
//! ```
//!
//! # Dependencies
//!
//! - [`serde`] (optional) - Derives for the configuration surface
//!
//! # Used By
//!
//! - `pxl-color` - Linearize and gamma tables, PQ-domain tone curve

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod gamma;
pub mod hlg;
pub mod pq;
pub mod rec709;
pub mod smpte428;
pub mod srgb;

mod function;

pub use function::TransferFunction;
