//! # pxl-pipeline
//!
//! Configuration and composition of the pxl processing steps.
//!
//! A [`ProcessConfig`] names the kernel, framing, tone curve and color
//! encodings; a [`Processor`] validates it once and then runs any number
//! of buffers through unpack, permute, resample, color-manage and
//! output conversion.
//!
//! # Example
//!
//! ```rust
//! use pxl_core::PixelBuffer;
//! use pxl_pipeline::{AnyBuffer, ProcessConfig, Processor};
//!
//! let config = ProcessConfig::from_yaml_str(
//!     "kernel: CatmullRom\nfitMode: Fill\ntargetWidth: 64\ntargetHeight: 64\noutputKind: HalfFloat16",
//! )
//! .unwrap();
//! let processor = Processor::new(config).unwrap();
//!
//! let frame = PixelBuffer::<u8>::new(320, 240, 4).unwrap();
//! let out = processor.process(AnyBuffer::from(frame)).unwrap();
//! assert_eq!(out.dimensions(), (64, 64));
//! ```
//!
//! # Dependencies
//!
//! - [`serde`], [`serde_yaml`] - Configuration files
//! - [`thiserror`] - Error derive
//! - [`tracing`] - Diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod buffer;
pub mod config;
pub mod processor;

pub use buffer::AnyBuffer;
pub use config::{ColorConfig, ProcessConfig, DEFAULT_OUTPUT_BIT_DEPTH};
pub use error::{PipelineError, PipelineResult};
pub use processor::Processor;
