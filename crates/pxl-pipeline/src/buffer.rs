//! Buffers whose sample kind is known only at runtime.

use crate::PipelineResult;
use pxl_convert::{
    f16_to_packed_in, f16_to_u16_in, f16_to_u8_in, packed_to_f16_in, packed_to_rgba8_in, packed_to_u16_in,
    rgba8_to_packed_in, u16_to_f16_in, u16_to_packed_in, u16_to_u8_in, u8_to_f16_in, u8_to_u16_in,
};
use pxl_core::{f16, PixelBuffer, RowPool, SampleKind};

/// A [`PixelBuffer`] of any supported sample kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyBuffer {
    /// 8-bit samples.
    U8(PixelBuffer<u8>),
    /// 9 to 16-bit samples.
    U16(PixelBuffer<u16>),
    /// Half-float samples.
    Half(PixelBuffer<f16>),
    /// Packed 10-10-10-2 words.
    Packed(PixelBuffer<u32>),
}

macro_rules! dispatch {
    ($self:expr, $buf:ident => $body:expr) => {
        match $self {
            AnyBuffer::U8($buf) => $body,
            AnyBuffer::U16($buf) => $body,
            AnyBuffer::Half($buf) => $body,
            AnyBuffer::Packed($buf) => $body,
        }
    };
}

impl AnyBuffer {
    /// Sample kind.
    pub fn kind(&self) -> SampleKind {
        dispatch!(self, b => b.kind())
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (usize, usize) {
        dispatch!(self, b => b.dimensions())
    }

    /// Channels per pixel.
    pub fn channels(&self) -> usize {
        dispatch!(self, b => b.channels())
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        dispatch!(self, b => b.stride())
    }

    /// Bits per channel.
    pub fn bit_depth(&self) -> u32 {
        dispatch!(self, b => b.bit_depth())
    }

    /// The 8-bit buffer, if that is the kind.
    pub fn as_u8(&self) -> Option<&PixelBuffer<u8>> {
        match self {
            Self::U8(b) => Some(b),
            _ => None,
        }
    }

    /// The N-bit buffer, if that is the kind.
    pub fn as_u16(&self) -> Option<&PixelBuffer<u16>> {
        match self {
            Self::U16(b) => Some(b),
            _ => None,
        }
    }

    /// The half-float buffer, if that is the kind.
    pub fn as_half(&self) -> Option<&PixelBuffer<f16>> {
        match self {
            Self::Half(b) => Some(b),
            _ => None,
        }
    }

    /// The packed buffer, if that is the kind.
    pub fn as_packed(&self) -> Option<&PixelBuffer<u32>> {
        match self {
            Self::Packed(b) => Some(b),
            _ => None,
        }
    }

    /// Converts to `kind` on the global pool, using `bit_depth` when
    /// producing `U16` from another kind. Same-kind buffers are returned
    /// unchanged.
    pub fn convert(self, kind: SampleKind, bit_depth: u32) -> PipelineResult<Self> {
        self.convert_in(RowPool::global(), kind, bit_depth)
    }

    /// [`convert`](Self::convert) with rows split across `pool`.
    ///
    /// Packed words unpack to straight alpha. Packing `U16` keeps all ten
    /// bits, so a 10-bit buffer from packed input packs back to the same
    /// words.
    pub fn convert_in(self, pool: &RowPool, kind: SampleKind, bit_depth: u32) -> PipelineResult<Self> {
        use SampleKind as K;

        if self.kind() == kind {
            return Ok(self);
        }
        Ok(match (self, kind) {
            (Self::U8(b), K::U16) => Self::U16(u8_to_u16_in(pool, &b, bit_depth)?),
            (Self::U8(b), K::HalfFloat16) => Self::Half(u8_to_f16_in(pool, &b)?),
            (Self::U8(b), K::Packed1010102) => Self::Packed(rgba8_to_packed_in(pool, &b)?),
            (Self::U16(b), K::U8) => Self::U8(u16_to_u8_in(pool, &b)?),
            (Self::U16(b), K::HalfFloat16) => Self::Half(u16_to_f16_in(pool, &b)?),
            (Self::U16(b), K::Packed1010102) => Self::Packed(u16_to_packed_in(pool, &b)?),
            (Self::Half(b), K::U8) => Self::U8(f16_to_u8_in(pool, &b)?),
            (Self::Half(b), K::U16) => Self::U16(f16_to_u16_in(pool, &b, bit_depth)?),
            (Self::Half(b), K::Packed1010102) => Self::Packed(f16_to_packed_in(pool, &b)?),
            (Self::Packed(b), K::U8) => Self::U8(packed_to_rgba8_in(pool, &b, false)?),
            (Self::Packed(b), K::U16) => Self::U16(packed_to_u16_in(pool, &b, bit_depth)?),
            (Self::Packed(b), K::HalfFloat16) => Self::Half(packed_to_f16_in(pool, &b)?),
            (same, _) => same,
        })
    }
}

impl From<PixelBuffer<u8>> for AnyBuffer {
    fn from(b: PixelBuffer<u8>) -> Self {
        Self::U8(b)
    }
}

impl From<PixelBuffer<u16>> for AnyBuffer {
    fn from(b: PixelBuffer<u16>) -> Self {
        Self::U16(b)
    }
}

impl From<PixelBuffer<f16>> for AnyBuffer {
    fn from(b: PixelBuffer<f16>) -> Self {
        Self::Half(b)
    }
}

impl From<PixelBuffer<u32>> for AnyBuffer {
    fn from(b: PixelBuffer<u32>) -> Self {
        Self::Packed(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxl_convert::pack_1010102;

    #[test]
    fn test_accessors() {
        let buf = AnyBuffer::from(PixelBuffer::<u16>::new(3, 2, 4).unwrap().with_bit_depth(12).unwrap());
        assert_eq!(buf.kind(), SampleKind::U16);
        assert_eq!(buf.dimensions(), (3, 2));
        assert_eq!(buf.channels(), 4);
        assert_eq!(buf.bit_depth(), 12);
        assert_eq!(buf.stride(), 3 * 4 * 2);
        assert!(buf.as_u16().is_some());
        assert!(buf.as_u8().is_none());
    }

    #[test]
    fn test_convert_paths() {
        let mut src = PixelBuffer::<u8>::new(2, 1, 4).unwrap();
        src.row_mut(0).copy_from_slice(&[255, 128, 64, 255, 0, 0, 0, 0]);
        let any = AnyBuffer::U8(src.clone());

        let half = any.clone().convert(SampleKind::HalfFloat16, 10).unwrap();
        assert_eq!(half.convert(SampleKind::U8, 10).unwrap(), AnyBuffer::U8(src.clone()));

        let deep = any.clone().convert(SampleKind::U16, 12).unwrap();
        assert_eq!(deep.bit_depth(), 12);
        assert_eq!(deep.convert(SampleKind::U8, 10).unwrap(), AnyBuffer::U8(src.clone()));

        let packed = any.convert(SampleKind::Packed1010102, 10).unwrap();
        assert_eq!(packed.as_packed().unwrap().row(0)[1], pack_1010102(0, 0, 0, 0));
        let words = AnyBuffer::Packed(PixelBuffer::from_vec(1, 1, 4, 4, vec![pack_1010102(1023, 0, 1023, 3)]).unwrap());
        let wide = words.clone().convert(SampleKind::U16, 10).unwrap();
        assert_eq!(wide.as_u16().unwrap().row(0), &[1023, 0, 1023, 1023]);
        assert_eq!(wide.convert(SampleKind::Packed1010102, 10).unwrap(), words);
    }
}
