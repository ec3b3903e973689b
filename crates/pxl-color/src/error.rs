//! Error types for color transforms.

use pxl_primaries::PrimariesError;
use pxl_transfer::TransferFunction;
use thiserror::Error;

/// Result type for color operations.
pub type ColorResult<T> = std::result::Result<T, ColorError>;

/// Errors raised before a transform touches the buffer.
#[derive(Debug, Error)]
pub enum ColorError {
    /// Buffer validation failed.
    #[error(transparent)]
    Core(#[from] pxl_core::Error),

    /// Gamut matrix could not be derived.
    #[error(transparent)]
    Primaries(#[from] PrimariesError),

    /// Transfer curve parameters are unusable.
    #[error("invalid transfer function: {0}")]
    InvalidTransfer(TransferFunction),

    /// Gamut matrix has NaN or infinite entries.
    #[error("gamut matrix has non-finite entries")]
    InvalidMatrix,

    /// A luminance setting is zero, negative or not finite.
    #[error("{name} must be a positive finite luminance, got {value}")]
    InvalidNits {
        /// Setting name
        name: &'static str,
        /// Rejected value
        value: f32,
    },

    /// Transforms need RGB or RGBA.
    #[error("color transform needs 3 or 4 channels, got {0}")]
    Channels(usize),

    /// Tone curve name not recognized.
    #[error("unknown tone curve: {0}")]
    UnknownToneCurve(String),
}

impl ColorError {
    /// Checks that `value` is usable as a luminance.
    pub(crate) fn check_nits(name: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidNits { name, value })
        }
    }
}
