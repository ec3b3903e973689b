//! Error types for resampling.

use thiserror::Error;

/// Result type for resampling operations.
pub type ResampleResult<T> = std::result::Result<T, ResampleError>;

/// Errors raised before any destination pixel is written.
#[derive(Debug, Error)]
pub enum ResampleError {
    /// Buffer construction or validation failed.
    #[error(transparent)]
    Core(#[from] pxl_core::Error),

    /// Premultiply / unpremultiply failed.
    #[error(transparent)]
    Convert(#[from] pxl_convert::ConvertError),

    /// Target size is zero, or both dimensions ask to be derived.
    #[error("invalid target size {width}x{height}: {reason}")]
    InvalidTarget {
        /// Requested width (negative means derived)
        width: i64,
        /// Requested height (negative means derived)
        height: i64,
        /// Why it was rejected
        reason: String,
    },

    /// Kernel name not recognized.
    #[error("unknown resampling kernel: {0}")]
    UnknownKernel(String),

    /// Fit mode name not recognized.
    #[error("unknown fit mode: {0}")]
    UnknownFitMode(String),
}

impl ResampleError {
    /// Creates a [`ResampleError::InvalidTarget`] error.
    #[inline]
    pub fn invalid_target(width: i64, height: i64, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            width,
            height,
            reason: reason.into(),
        }
    }
}
