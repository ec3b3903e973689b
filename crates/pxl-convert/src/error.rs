//! Error types for format conversion.

use pxl_core::SampleKind;
use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Errors raised before a conversion touches any pixel.
///
/// Out-of-range sample values are never errors; they are clamped.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Buffer construction or validation failed.
    #[error(transparent)]
    Core(#[from] pxl_core::Error),

    /// The conversion needs a different channel count.
    #[error("{op} needs {expected} channels, got {got}")]
    Channels {
        /// Operation name
        op: &'static str,
        /// Accepted channel counts
        expected: &'static str,
        /// Channel count of the input
        got: usize,
    },

    /// No conversion exists between the two kinds.
    #[error("cannot convert {from} to {to}")]
    Unsupported {
        /// Source kind
        from: SampleKind,
        /// Destination kind
        to: SampleKind,
    },

    /// Channel index outside the buffer.
    #[error("channel {channel} out of range for {channels}-channel buffer")]
    ChannelIndex {
        /// Requested channel
        channel: usize,
        /// Channels in the buffer
        channels: usize,
    },
}

impl ConvertError {
    /// Creates a [`ConvertError::Channels`] error.
    #[inline]
    pub fn channels(op: &'static str, expected: &'static str, got: usize) -> Self {
        Self::Channels { op, expected, got }
    }

    /// Returns `true` if this wraps an allocation failure.
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_allocation_error())
    }
}
