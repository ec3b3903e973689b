//! Pixel buffers with an explicit byte stride.
//!
//! [`PixelBuffer`] owns a rectangular grid of interleaved samples. Rows start
//! `stride` bytes apart; the stride may exceed the tightly packed row width
//! so rows can be aligned (the resampler aligns intermediates to 64 bytes).
//!
//! # Invariants
//!
//! - `stride ≥ width × channels × bytes_per_sample(kind)`
//! - `stride` is a multiple of the element size
//! - storage length ≥ `stride × height` bytes
//!
//! Row and pixel access goes through [`StridedView`] / [`StridedViewMut`],
//! which check coordinates instead of trusting pointer arithmetic.
//!
//! # Usage
//!
//! ```rust
//! use pxl_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::<u8>::with_alignment(3, 2, 4, 64).unwrap();
//! assert_eq!(buf.stride(), 64);
//! buf.pixel_mut(2, 1).copy_from_slice(&[1, 2, 3, 4]);
//! assert_eq!(buf.pixel(2, 1), &[1, 2, 3, 4]);
//! ```

use crate::format::{max_value, Sample, SampleKind};
use crate::{Error, Result};
use std::fmt;
use std::mem::size_of;

/// Owned image buffer: row-major, interleaved channels, explicit stride.
#[derive(Clone, PartialEq)]
pub struct PixelBuffer<T: Sample> {
    data: Vec<T>,
    width: usize,
    height: usize,
    stride: usize,
    channels: usize,
    bit_depth: u32,
}

impl<T: Sample> PixelBuffer<T> {
    /// Allocates a zeroed buffer with a tightly packed stride.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self> {
        let stride = min_stride::<T>(width, height, channels)?;
        Self::allocate(width, height, channels, stride)
    }

    /// Allocates a zeroed buffer whose stride is rounded up to `alignment` bytes.
    pub fn with_alignment(
        width: usize,
        height: usize,
        channels: usize,
        alignment: usize,
    ) -> Result<Self> {
        if alignment == 0 || alignment % size_of::<T>() != 0 {
            return Err(Error::other(format!(
                "alignment {alignment} is not a multiple of the {}-byte sample",
                size_of::<T>()
            )));
        }
        let tight = min_stride::<T>(width, height, channels)?;
        let stride = tight
            .checked_next_multiple_of(alignment)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "aligned stride overflows"))?;
        Self::allocate(width, height, channels, stride)
    }

    /// Wraps existing samples. `stride` is in bytes.
    pub fn from_vec(
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
        data: Vec<T>,
    ) -> Result<Self> {
        let tight = min_stride::<T>(width, height, channels)?;
        check_stride::<T>(stride, tight, width)?;
        let required = (stride / size_of::<T>())
            .checked_mul(height)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
        if data.len() < required {
            return Err(Error::BufferTooSmall {
                len: data.len(),
                required,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            channels,
            bit_depth: T::MAX_BIT_DEPTH,
        })
    }

    /// Sets the bit depth the samples are interpreted at.
    ///
    /// Only meaningful for `u16` storage (9..=16 bits); other kinds accept
    /// their single native depth.
    pub fn with_bit_depth(mut self, bit_depth: u32) -> Result<Self> {
        self.set_bit_depth(bit_depth)?;
        Ok(self)
    }

    /// In-place form of [`with_bit_depth`](Self::with_bit_depth).
    pub fn set_bit_depth(&mut self, bit_depth: u32) -> Result<()> {
        if bit_depth < T::MIN_BIT_DEPTH || bit_depth > T::MAX_BIT_DEPTH {
            return Err(Error::InvalidBitDepth {
                bit_depth,
                min: T::MIN_BIT_DEPTH,
                max: T::MAX_BIT_DEPTH,
            });
        }
        self.bit_depth = bit_depth;
        Ok(())
    }

    fn allocate(width: usize, height: usize, channels: usize, stride: usize) -> Result<Self> {
        let len = (stride / size_of::<T>())
            .checked_mul(height)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
        let data = try_alloc(len)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            channels,
            bit_depth: T::MAX_BIT_DEPTH,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Bytes between row starts.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Elements between row starts.
    #[inline]
    pub fn stride_elements(&self) -> usize {
        self.stride / size_of::<T>()
    }

    /// Elements per pixel (4 channels share one element for packed words).
    #[inline]
    pub fn pixel_len(&self) -> usize {
        T::KIND.elements_per_pixel(self.channels)
    }

    /// Elements in the used part of a row.
    #[inline]
    pub fn row_elements(&self) -> usize {
        self.width * self.pixel_len()
    }

    /// Channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Bit depth of the samples.
    #[inline]
    pub fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    /// Largest integer sample value at the current bit depth.
    #[inline]
    pub fn max_value(&self) -> u32 {
        max_value(self.bit_depth)
    }

    /// Sample kind tag.
    #[inline]
    pub fn kind(&self) -> SampleKind {
        T::KIND
    }

    /// Raw storage including row padding.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw storage including row padding.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the buffer, returning its storage.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Used part of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        self.view().row(y)
    }

    /// Used part of row `y`, or `None` when out of range.
    #[inline]
    pub fn get_row(&self, y: usize) -> Option<&[T]> {
        self.view().get_row(y)
    }

    /// Mutable used part of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y * self.stride_elements();
        let len = self.row_elements();
        &mut self.data[start..start + len]
    }

    /// Elements of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[T] {
        self.view().pixel(x, y)
    }

    /// Mutable elements of pixel `(x, y)`.
    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [T] {
        assert!(x < self.width, "column {x} out of bounds for width {}", self.width);
        let pl = self.pixel_len();
        &mut self.row_mut(y)[x * pl..(x + 1) * pl]
    }

    /// Iterates over the used part of every row.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        let len = self.row_elements();
        self.data
            .chunks(self.stride_elements())
            .take(self.height)
            .map(move |row| &row[..len])
    }

    /// Sets every element (padding included) to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Read-only strided view.
    #[inline]
    pub fn view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride_elements(),
            pixel_len: self.pixel_len(),
        }
    }

    /// Mutable strided view.
    #[inline]
    pub fn view_mut(&mut self) -> StridedViewMut<'_, T> {
        let stride = self.stride_elements();
        let pixel_len = self.pixel_len();
        StridedViewMut {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            stride,
            pixel_len,
        }
    }

    /// Copies rows into a tightly packed `Vec`.
    pub fn to_packed_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.row_elements() * self.height);
        for row in self.rows() {
            out.extend_from_slice(row);
        }
        out
    }
}

impl<T: Sample> fmt::Debug for PixelBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("kind", &T::KIND)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("channels", &self.channels)
            .field("bit_depth", &self.bit_depth)
            .finish()
    }
}

/// Minimum byte stride for `width` pixels, after validating the shape.
pub fn min_stride<T: Sample>(width: usize, height: usize, channels: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
    }
    check_channels(T::KIND, channels)?;
    width
        .checked_mul(channels)
        .and_then(|v| v.checked_mul(T::KIND.bytes_per_sample()))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "row size overflows"))
}

/// Validates a channel count for a sample kind.
pub fn check_channels(kind: SampleKind, channels: usize) -> Result<()> {
    let ok = match kind {
        SampleKind::Packed1010102 => channels == 4,
        _ => (1..=4).contains(&channels),
    };
    if ok {
        Ok(())
    } else {
        Err(Error::unsupported_channels(channels, kind.name()))
    }
}

fn check_stride<T: Sample>(stride: usize, min_stride: usize, width: usize) -> Result<()> {
    if stride < min_stride || stride % size_of::<T>() != 0 {
        return Err(Error::InvalidStride {
            stride,
            min_stride,
            width,
            sample_size: size_of::<T>(),
        });
    }
    Ok(())
}

fn try_alloc<T: Sample>(len: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        Error::allocation_failed(len.saturating_mul(size_of::<T>()), e.to_string())
    })?;
    data.resize(len, T::default());
    Ok(data)
}

/// Read-only row/pixel accessor over a slice and an element stride.
#[derive(Debug, Clone, Copy)]
pub struct StridedView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
    pixel_len: usize,
}

impl<'a, T> StridedView<'a, T> {
    /// Wraps `data`; `stride` and `pixel_len` are in elements.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
        pixel_len: usize,
    ) -> Result<Self> {
        validate_view(data.len(), width, height, stride, pixel_len)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            pixel_len,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Elements per pixel.
    #[inline]
    pub fn pixel_len(&self) -> usize {
        self.pixel_len
    }

    /// Used part of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y * self.stride;
        &self.data[start..start + self.width * self.pixel_len]
    }

    /// Used part of row `y`, or `None` when out of range.
    #[inline]
    pub fn get_row(&self, y: usize) -> Option<&'a [T]> {
        (y < self.height).then(|| self.row(y))
    }

    /// Elements of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the image.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &'a [T] {
        assert!(x < self.width, "column {x} out of bounds for width {}", self.width);
        let pl = self.pixel_len;
        &self.row(y)[x * pl..(x + 1) * pl]
    }

    /// Elements of pixel `(x, y)`, or `None` when out of range.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<&'a [T]> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Elements of the pixel nearest to `(x, y)` inside the image.
    #[inline]
    pub fn pixel_clamped(&self, x: isize, y: isize) -> &'a [T] {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.pixel(cx, cy)
    }
}

/// Mutable row/pixel accessor over a slice and an element stride.
#[derive(Debug)]
pub struct StridedViewMut<'a, T> {
    data: &'a mut [T],
    width: usize,
    height: usize,
    stride: usize,
    pixel_len: usize,
}

impl<'a, T> StridedViewMut<'a, T> {
    /// Wraps `data`; `stride` and `pixel_len` are in elements.
    pub fn new(
        data: &'a mut [T],
        width: usize,
        height: usize,
        stride: usize,
        pixel_len: usize,
    ) -> Result<Self> {
        validate_view(data.len(), width, height, stride, pixel_len)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            pixel_len,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Used part of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y * self.stride;
        &self.data[start..start + self.width * self.pixel_len]
    }

    /// Mutable used part of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y * self.stride;
        let len = self.width * self.pixel_len;
        &mut self.data[start..start + len]
    }

    /// Mutable elements of pixel `(x, y)`.
    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [T] {
        assert!(x < self.width, "column {x} out of bounds for width {}", self.width);
        let pl = self.pixel_len;
        &mut self.row_mut(y)[x * pl..(x + 1) * pl]
    }

    /// Reborrows as a read-only view.
    #[inline]
    pub fn as_view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &*self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            pixel_len: self.pixel_len,
        }
    }
}

fn validate_view(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    pixel_len: usize,
) -> Result<()> {
    if width == 0 || height == 0 || pixel_len == 0 {
        return Err(Error::invalid_dimensions(width, height, "empty view"));
    }
    let row = width
        .checked_mul(pixel_len)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "row size overflows"))?;
    if stride < row {
        return Err(Error::InvalidStride {
            stride,
            min_stride: row,
            width,
            sample_size: 1,
        });
    }
    let required = stride
        .checked_mul(height - 1)
        .and_then(|v| v.checked_add(row))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "view size overflows"))?;
    if len < required {
        return Err(Error::BufferTooSmall { len, required });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn test_tight_stride() {
        let buf = PixelBuffer::<u8>::new(10, 4, 3).unwrap();
        assert_eq!(buf.stride(), 30);
        assert_eq!(buf.data().len(), 120);
        assert_eq!(buf.kind(), SampleKind::U8);
        assert_eq!(buf.bit_depth(), 8);
    }

    #[test]
    fn test_aligned_stride() {
        let buf = PixelBuffer::<f16>::with_alignment(5, 2, 4, 64).unwrap();
        // 5 * 4 * 2 = 40 bytes -> 64
        assert_eq!(buf.stride(), 64);
        assert_eq!(buf.stride_elements(), 32);
        assert_eq!(buf.row(1).len(), 20);
    }

    #[test]
    fn test_packed_uses_one_word_per_pixel() {
        let buf = PixelBuffer::<u32>::new(7, 3, 4).unwrap();
        assert_eq!(buf.stride(), 28);
        assert_eq!(buf.pixel_len(), 1);
        assert_eq!(buf.row(2).len(), 7);
        assert!(PixelBuffer::<u32>::new(7, 3, 3).is_err());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(PixelBuffer::<u8>::new(0, 4, 4).unwrap_err().is_config_error());
        assert!(PixelBuffer::<u8>::new(4, 0, 4).is_err());
        assert!(PixelBuffer::<u8>::new(4, 4, 5).is_err());
    }

    #[test]
    fn test_from_vec_validation() {
        assert!(PixelBuffer::<u8>::from_vec(2, 2, 4, 8, vec![0; 16]).is_ok());
        // stride too small
        assert!(matches!(
            PixelBuffer::<u8>::from_vec(2, 2, 4, 7, vec![0; 16]),
            Err(Error::InvalidStride { .. })
        ));
        // stride not a multiple of the element size
        assert!(PixelBuffer::<u16>::from_vec(2, 2, 4, 17, vec![0; 32]).is_err());
        // not enough data
        assert!(matches!(
            PixelBuffer::<u8>::from_vec(2, 2, 4, 8, vec![0; 15]),
            Err(Error::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_bit_depth() {
        let buf = PixelBuffer::<u16>::new(2, 2, 4).unwrap().with_bit_depth(10).unwrap();
        assert_eq!(buf.max_value(), 1023);
        assert!(PixelBuffer::<u16>::new(2, 2, 4).unwrap().with_bit_depth(8).is_err());
        assert!(PixelBuffer::<u8>::new(2, 2, 4).unwrap().with_bit_depth(10).is_err());
    }

    #[test]
    fn test_pixel_access_respects_stride() {
        let mut buf = PixelBuffer::<u8>::with_alignment(3, 3, 4, 16).unwrap();
        buf.pixel_mut(2, 1).copy_from_slice(&[9, 8, 7, 6]);
        assert_eq!(buf.pixel(2, 1), &[9, 8, 7, 6]);
        // stride 16, row 1 starts at 16, pixel 2 at 16 + 8
        assert_eq!(&buf.data()[24..28], &[9, 8, 7, 6]);
        assert_eq!(buf.to_packed_vec().len(), 36);
    }

    #[test]
    fn test_view_bounds() {
        let buf = PixelBuffer::<u8>::new(2, 2, 1).unwrap();
        let view = buf.view();
        assert!(view.get_row(2).is_none());
        assert!(view.get_pixel(2, 0).is_none());
        assert_eq!(view.pixel_clamped(-5, 9).len(), 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_row_out_of_range_panics() {
        let buf = PixelBuffer::<u8>::new(2, 2, 1).unwrap();
        let _ = buf.row(2);
    }

    #[test]
    fn test_strided_view_over_slice() {
        let data = vec![1u8, 2, 0, 3, 4, 0];
        let view = StridedView::new(&data, 2, 2, 3, 1).unwrap();
        assert_eq!(view.row(1), &[3, 4]);
        assert!(StridedView::new(&data[..4], 2, 2, 3, 1).is_err());
    }
}
