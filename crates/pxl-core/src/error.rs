//! Error types for pxl-core operations.
//!
//! Errors fall into two groups: configuration errors (bad dimensions, a
//! stride that cannot hold a row, a channel map that is not a permutation)
//! which are always reported before any pixel is touched, and resource
//! errors (allocation, thread pool creation).
//!
//! Numeric edge cases inside pixel loops are never errors: they are clamped.
//!
//! # Usage
//!
//! ```rust
//! use pxl_core::{Error, Result};
//!
//! fn check(width: usize, height: usize) -> Result<()> {
//!     if width == 0 || height == 0 {
//!         return Err(Error::invalid_dimensions(width, height, "must be non-zero"));
//!     }
//!     Ok(())
//! }
//! assert!(check(0, 10).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building buffers or dispatching row work.
///
/// # Categories
///
/// - **Configuration**: [`InvalidDimensions`](Error::InvalidDimensions),
///   [`InvalidStride`](Error::InvalidStride), [`BufferTooSmall`](Error::BufferTooSmall),
///   [`UnsupportedChannels`](Error::UnsupportedChannels),
///   [`ChannelMismatch`](Error::ChannelMismatch),
///   [`InvalidPermutation`](Error::InvalidPermutation),
///   [`InvalidBitDepth`](Error::InvalidBitDepth)
/// - **Resources**: [`AllocationFailed`](Error::AllocationFailed),
///   [`ThreadPool`](Error::ThreadPool)
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height is zero, or the buffer size overflows `usize`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// Stride cannot hold a row or is not a multiple of the sample size.
    #[error("stride {stride} is invalid for width {width} (minimum {min_stride}, sample size {sample_size})")]
    InvalidStride {
        /// Provided stride in bytes
        stride: usize,
        /// Minimum stride in bytes
        min_stride: usize,
        /// Image width
        width: usize,
        /// Size of one stored element in bytes
        sample_size: usize,
    },

    /// Backing storage is shorter than `stride × height` requires.
    #[error("buffer holds {len} samples, {required} required")]
    BufferTooSmall {
        /// Samples available
        len: usize,
        /// Samples required
        required: usize,
    },

    /// Memory allocation failed.
    ///
    /// Surfaced to the caller instead of aborting the process.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// Channel count outside what the operation accepts.
    #[error("unsupported channel count {channels} for {kind}")]
    UnsupportedChannels {
        /// Channel count that was given
        channels: usize,
        /// Sample kind or operation name
        kind: String,
    },

    /// Source and destination disagree on channel count.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch {
        /// Expected channel count
        expected: usize,
        /// Actual channel count
        got: usize,
    },

    /// Channel map is not a bijection over `{0, 1, 2, 3}`.
    #[error("channel map {map:?} is not a permutation: {reason}")]
    InvalidPermutation {
        /// The rejected map
        map: [i64; 4],
        /// Why it was rejected
        reason: String,
    },

    /// Bit depth outside the range the sample type can hold.
    #[error("bit depth {bit_depth} out of range {min}..={max}")]
    InvalidBitDepth {
        /// Requested bit depth
        bit_depth: u32,
        /// Smallest allowed bit depth
        min: u32,
        /// Largest allowed bit depth
        max: u32,
    },

    /// Worker pool could not be created.
    #[error("thread pool: {0}")]
    ThreadPool(String),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: usize, height: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::UnsupportedChannels`] error.
    #[inline]
    pub fn unsupported_channels(channels: usize, kind: impl Into<String>) -> Self {
        Self::UnsupportedChannels {
            channels,
            kind: kind.into(),
        }
    }

    /// Creates an [`Error::ChannelMismatch`] error.
    #[inline]
    pub fn channel_mismatch(expected: usize, got: usize) -> Self {
        Self::ChannelMismatch { expected, got }
    }

    /// Creates an [`Error::InvalidPermutation`] error.
    #[inline]
    pub fn invalid_permutation(map: [i64; 4], reason: impl Into<String>) -> Self {
        Self::InvalidPermutation {
            map,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }

    /// Returns `true` if the error was caused by caller-supplied configuration.
    #[inline]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions { .. }
                | Self::InvalidStride { .. }
                | Self::BufferTooSmall { .. }
                | Self::UnsupportedChannels { .. }
                | Self::ChannelMismatch { .. }
                | Self::InvalidPermutation { .. }
                | Self::InvalidBitDepth { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(0, 50, "width is zero");
        let msg = err.to_string();
        assert!(msg.contains("0x50"));
        assert!(msg.contains("width is zero"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_allocation_failed() {
        let err = Error::allocation_failed(1 << 40, "out of memory");
        assert!(err.to_string().contains("out of memory"));
        assert!(err.is_allocation_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_invalid_permutation_message() {
        let err = Error::invalid_permutation([0, 0, 1, 2], "index 0 repeats");
        assert!(err.to_string().contains("[0, 0, 1, 2]"));
        assert!(err.is_config_error());
    }
}
