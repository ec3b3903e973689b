//! Integration tests for pxl crates.
//!
//! End-to-end scenarios that thread buffers through conversion,
//! resampling and color management together.
