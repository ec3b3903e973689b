//! Aspect-ratio framing and target size resolution.
//!
//! Framing runs before the kernel: the source is scaled uniformly to an
//! intermediate size, then center-cropped and/or padded to the canvas.
//!
//! | Mode | Scale factor | Result |
//! |------|--------------|--------|
//! | [`FitMode::Fit`] | `min(cw/sw, ch/sh)` | whole image, padded with transparent black |
//! | [`FitMode::Fill`] | `max(cw/sw, ch/sh)` | canvas covered, overflow cropped |
//! | [`FitMode::None`] | per axis | stretched to the canvas |
//!
//! Intermediate dimensions are `(int)(src × factor)`, at least 1. Crop
//! offsets are `max((intermediate − canvas) / 2, 0)`, pad offsets
//! `max((canvas − intermediate) / 2, 0)`.

use crate::scaler::{ResampleSample, Resampler};
use crate::{ResampleError, ResampleResult};
use pxl_core::{PixelBuffer, RowPool};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Row alignment of the intermediate buffer, in bytes.
pub const INTERMEDIATE_ALIGNMENT: usize = 64;

/// How the source is framed into the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitMode {
    /// Scale to fit inside the canvas, letterboxing the rest.
    Fit,
    /// Scale to cover the canvas, cropping the overflow.
    Fill,
    /// Stretch to the canvas, ignoring aspect ratio.
    #[default]
    None,
}

impl FitMode {
    /// Configuration name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fit => "Fit",
            Self::Fill => "Fill",
            Self::None => "None",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FitMode {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Fit, Self::Fill, Self::None]
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ResampleError::UnknownFitMode(s.to_string()))
    }
}

/// Requested output size, where a negative dimension is derived from the
/// other one and the source aspect ratio.
///
/// `-2` additionally rounds both derived dimensions down to even values.
///
/// ```rust
/// use pxl_resample::TargetSize;
///
/// assert_eq!(TargetSize::new(-1, 100).resolve(400, 300).unwrap(), (133, 100));
/// assert_eq!(TargetSize::new(-2, 100).resolve(400, 300).unwrap(), (132, 100));
/// assert!(TargetSize::new(-1, -1).resolve(400, 300).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetSize {
    /// Width in pixels, or negative to derive.
    pub width: i64,
    /// Height in pixels, or negative to derive.
    pub height: i64,
}

impl TargetSize {
    /// Creates a target size.
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Whether one dimension is derived from the aspect ratio.
    #[inline]
    pub const fn is_derived(&self) -> bool {
        self.width < 0 || self.height < 0
    }

    /// Checks the request without a source.
    pub fn validate(&self) -> ResampleResult<()> {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return Err(ResampleError::invalid_target(w, h, "dimensions must be non-zero"));
        }
        if w < 0 && h < 0 {
            return Err(ResampleError::invalid_target(w, h, "only one dimension can be derived"));
        }
        Ok(())
    }

    /// Concrete output size for a `src_w × src_h` source.
    pub fn resolve(&self, src_w: usize, src_h: usize) -> ResampleResult<(usize, usize)> {
        self.validate()?;
        let (w, h) = (self.width, self.height);
        if !self.is_derived() {
            return Ok((w as usize, h as usize));
        }
        let (factor, even) = if w < 0 {
            (h as f32 / src_h as f32, w == -2)
        } else {
            (w as f32 / src_w as f32, h == -2)
        };
        let mut out = (
            (src_w as f32 * factor) as usize,
            (src_h as f32 * factor) as usize,
        );
        if even {
            out = (out.0 / 2 * 2, out.1 / 2 * 2);
        }
        if out.0 == 0 || out.1 == 0 {
            return Err(ResampleError::invalid_target(w, h, format!("derived size {}x{} is empty", out.0, out.1)));
        }
        Ok(out)
    }
}

/// Geometry of one framed resample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    /// Final canvas size.
    pub canvas: (usize, usize),
    /// Size the source is resampled to.
    pub scaled: (usize, usize),
    /// Top-left of the region taken from the scaled image.
    pub crop: (usize, usize),
    /// Top-left where that region lands on the canvas.
    pub pad: (usize, usize),
}

impl FramePlan {
    /// Plans framing a `src` sized image into `canvas` with `mode`.
    pub fn new(src: (usize, usize), canvas: (usize, usize), mode: FitMode) -> ResampleResult<Self> {
        let (sw, sh) = src;
        let (cw, ch) = canvas;
        if sw == 0 || sh == 0 {
            return Err(pxl_core::Error::invalid_dimensions(sw, sh, "source is empty").into());
        }
        if cw == 0 || ch == 0 {
            return Err(ResampleError::invalid_target(cw as i64, ch as i64, "canvas must be non-zero"));
        }
        let scaled = match mode {
            FitMode::None => canvas,
            FitMode::Fit | FitMode::Fill => {
                let fx = cw as f32 / sw as f32;
                let fy = ch as f32 / sh as f32;
                let factor = if mode == FitMode::Fit { fx.min(fy) } else { fx.max(fy) };
                (
                    ((sw as f32 * factor) as usize).max(1),
                    ((sh as f32 * factor) as usize).max(1),
                )
            }
        };
        Ok(Self {
            canvas,
            scaled,
            crop: (scaled.0.saturating_sub(cw) / 2, scaled.1.saturating_sub(ch) / 2),
            pad: (cw.saturating_sub(scaled.0) / 2, ch.saturating_sub(scaled.1) / 2),
        })
    }

    /// Whether the scaled image is the canvas.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.scaled == self.canvas
    }

    /// Size of the copied region.
    #[inline]
    pub fn visible(&self) -> (usize, usize) {
        (
            (self.scaled.0 - self.crop.0).min(self.canvas.0 - self.pad.0),
            (self.scaled.1 - self.crop.1).min(self.canvas.1 - self.pad.1),
        )
    }
}

/// Resamples `src` into a `canvas_w × canvas_h` canvas framed by `mode`.
///
/// The scaled image lives in a buffer whose rows are aligned to
/// [`INTERMEDIATE_ALIGNMENT`] bytes. When it already matches the canvas it
/// is returned as is, aligned stride included; otherwise the visible
/// region is copied into a tightly packed canvas.
pub fn resample_framed<T: ResampleSample>(
    pool: &RowPool,
    resampler: &Resampler,
    src: &PixelBuffer<T>,
    canvas_w: usize,
    canvas_h: usize,
    mode: FitMode,
) -> ResampleResult<PixelBuffer<T>> {
    let plan = FramePlan::new(src.dimensions(), (canvas_w, canvas_h), mode)?;
    let channels = src.channels();
    trace!(canvas_w, canvas_h, channels, mode = %mode, "resample_framed");

    let mut scaled = PixelBuffer::<T>::with_alignment(plan.scaled.0, plan.scaled.1, channels, INTERMEDIATE_ALIGNMENT)?;
    resampler.resample_into(pool, src, &mut scaled)?;
    if plan.is_exact() {
        return Ok(scaled);
    }

    debug!(
        scaled_w = plan.scaled.0,
        scaled_h = plan.scaled.1,
        crop_x = plan.crop.0,
        crop_y = plan.crop.1,
        pad_x = plan.pad.0,
        pad_y = plan.pad.1,
        "Framing scaled image into canvas"
    );
    let mut canvas = PixelBuffer::<T>::new(canvas_w, canvas_h, channels)?.with_bit_depth(src.bit_depth())?;
    let (vis_w, vis_h) = plan.visible();
    let pixel_len = canvas.pixel_len();
    let scaled = &scaled;
    pool.for_each_row_mut(&mut canvas, |y, row| {
        if y < plan.pad.1 || y >= plan.pad.1 + vis_h {
            return;
        }
        let src_row = scaled.row(plan.crop.1 + y - plan.pad.1);
        let from = plan.crop.0 * pixel_len;
        let to = plan.pad.0 * pixel_len;
        let len = vis_w * pixel_len;
        row[to..to + len].copy_from_slice(&src_row[from..from + len]);
    });
    Ok(canvas)
}
