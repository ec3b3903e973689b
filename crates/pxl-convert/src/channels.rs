//! Channel order and channel count.
//!
//! Permutations follow [`ChannelPermutation`]: `dst[i] = src[map[i]]`.
//! Reducing the channel count keeps the leading lanes of the permuted
//! pixel and drops the rest without rescaling.

use crate::{ConvertError, ConvertResult};
use pxl_core::{for_each_row_mut, ChannelPermutation, PixelBuffer, RowPool, Sample, SampleKind};
use tracing::trace;

fn check_interleaved<T: Sample>(buf: &PixelBuffer<T>, op: &'static str) -> ConvertResult<()> {
    if T::KIND == SampleKind::Packed1010102 || buf.channels() != 4 {
        return Err(ConvertError::channels(op, "4 interleaved", buf.channels()));
    }
    Ok(())
}

/// Reorders the channels of a 4-channel buffer in place.
pub fn permute_in_place<T: Sample>(buf: &mut PixelBuffer<T>, perm: &ChannelPermutation) -> ConvertResult<()> {
    permute_in_place_in(RowPool::global(), buf, perm)
}

/// [`permute_in_place`] with rows split across `pool`.
pub fn permute_in_place_in<T: Sample>(
    pool: &RowPool,
    buf: &mut PixelBuffer<T>,
    perm: &ChannelPermutation,
) -> ConvertResult<()> {
    check_interleaved(buf, "permute")?;
    if perm.is_identity() {
        return Ok(());
    }
    trace!(width = buf.width(), height = buf.height(), map = ?perm.map(), "permute_in_place");
    pool.for_each_row_mut(buf, |_, row| perm.apply_row_in_place(row));
    Ok(())
}

/// Copies a 4-channel buffer, permuting and keeping the first `keep` channels.
///
/// `keep` of 4 is a plain permuted copy, 3 drops the last lane (RGBA to
/// RGB after an alpha-first permutation, for example), 1 picks a single
/// channel.
pub fn reduce_channels<T: Sample>(
    src: &PixelBuffer<T>,
    perm: &ChannelPermutation,
    keep: usize,
) -> ConvertResult<PixelBuffer<T>> {
    check_interleaved(src, "reduce_channels")?;
    if !(1..=4).contains(&keep) {
        return Err(ConvertError::channels("reduce_channels", "1..=4 kept", keep));
    }
    trace!(width = src.width(), height = src.height(), keep, map = ?perm.map(), "reduce_channels");
    let mut dst = PixelBuffer::<T>::new(src.width(), src.height(), keep)?.with_bit_depth(src.bit_depth())?;
    let map = perm.map();
    for_each_row_mut(&mut dst, |y, row| {
        for (d, s) in row.chunks_exact_mut(keep).zip(src.row(y).chunks_exact(4)) {
            for (i, v) in d.iter_mut().enumerate() {
                *v = s[map[i]];
            }
        }
    });
    Ok(dst)
}

/// Drops the alpha lane of an RGBA buffer.
pub fn rgba_to_rgb<T: Sample>(src: &PixelBuffer<T>) -> ConvertResult<PixelBuffer<T>> {
    reduce_channels(src, &ChannelPermutation::IDENTITY, 3)
}

/// Extracts channel `channel` of any interleaved buffer as a one-channel buffer.
pub fn pick_channel<T: Sample>(src: &PixelBuffer<T>, channel: usize) -> ConvertResult<PixelBuffer<T>> {
    let channels = src.channels();
    if T::KIND == SampleKind::Packed1010102 {
        return Err(ConvertError::channels("pick_channel", "interleaved", channels));
    }
    if channel >= channels {
        return Err(ConvertError::ChannelIndex { channel, channels });
    }
    trace!(width = src.width(), height = src.height(), channel, "pick_channel");
    let mut dst = PixelBuffer::<T>::new(src.width(), src.height(), 1)?.with_bit_depth(src.bit_depth())?;
    for_each_row_mut(&mut dst, |y, row| {
        for (d, s) in row.iter_mut().zip(src.row(y).chunks_exact(channels)) {
            *d = s[channel];
        }
    });
    Ok(dst)
}

/// Adds an alpha lane with value `alpha` to an RGB buffer.
pub fn rgb_to_rgba<T: Sample>(src: &PixelBuffer<T>, alpha: T) -> ConvertResult<PixelBuffer<T>> {
    if T::KIND == SampleKind::Packed1010102 || src.channels() != 3 {
        return Err(ConvertError::channels("rgb_to_rgba", "3", src.channels()));
    }
    trace!(width = src.width(), height = src.height(), "rgb_to_rgba");
    let mut dst = PixelBuffer::<T>::new(src.width(), src.height(), 4)?.with_bit_depth(src.bit_depth())?;
    for_each_row_mut(&mut dst, |y, row| {
        for (d, s) in row.chunks_exact_mut(4).zip(src.row(y).chunks_exact(3)) {
            d[..3].copy_from_slice(s);
            d[3] = alpha;
        }
    });
    Ok(dst)
}
