//! Error types for the processing pipeline.

use pxl_color::ColorError;
use pxl_convert::ConvertError;
use pxl_core::SampleKind;
use pxl_resample::ResampleError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors from configuring or running a [`Processor`](crate::Processor).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error, including unknown keys and enum values.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration is well-formed but unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input buffer cannot go through the configured steps.
    #[error("cannot process {kind} input: {reason}")]
    Unsupported {
        /// Input sample kind
        kind: SampleKind,
        /// What rules it out
        reason: String,
    },

    /// Buffer error.
    #[error(transparent)]
    Core(#[from] pxl_core::Error),

    /// Pixel-format conversion error.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// Resampling error.
    #[error(transparent)]
    Resample(#[from] ResampleError),

    /// Color transform error.
    #[error(transparent)]
    Color(#[from] ColorError),
}

impl PipelineError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an unsupported-input error.
    pub fn unsupported(kind: SampleKind, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            kind,
            reason: reason.into(),
        }
    }

    /// Whether an intermediate or destination buffer could not be allocated.
    pub fn is_allocation_error(&self) -> bool {
        match self {
            Self::Core(e)
            | Self::Resample(ResampleError::Core(e))
            | Self::Color(ColorError::Core(e)) => e.is_allocation_error(),
            Self::Convert(e) | Self::Resample(ResampleError::Convert(e)) => e.is_allocation_error(),
            _ => false,
        }
    }
}
