//! Row-partitioned worker pool.
//!
//! Every row-parallel operation in pxl dispatches through [`RowPool`]:
//! the image's rows are split into `workers` near-equal contiguous ranges,
//! each range runs on its own pool thread, and the call returns once all
//! ranges are done.
//!
//! The process-wide pool holds `min(available_parallelism, 12)` threads and
//! is created on first use. Small images (fewer than 16 rows, or fewer than
//! 722 500 pixels) run inline on the caller's thread.
//!
//! # Example
//!
//! ```rust
//! use pxl_core::parallel::parallel_row_bands;
//!
//! let (width, height, stride) = (640, 480, 640);
//! let mut dst = vec![0u8; stride * height];
//! parallel_row_bands(&mut dst, stride, width, height, |first_row, band| {
//!     for (i, row) in band.chunks_mut(stride).enumerate() {
//!         row.fill(((first_row + i) % 256) as u8);
//!     }
//! });
//! assert_eq!(dst[stride * 300], (300 % 256) as u8);
//! ```

use crate::{Error, PixelBuffer, Result, Sample};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::ops::Range;
use std::sync::OnceLock;
use tracing::{debug, trace, warn};

/// Upper bound on pool threads.
pub const MAX_WORKERS: usize = 12;

/// Images with fewer pixels than this run inline.
pub const SMALL_WORKLOAD_PIXELS: usize = 850 * 850;

/// Images with fewer rows than this run inline.
pub const MIN_PARALLEL_ROWS: usize = 16;

/// Default worker count: `min(available_parallelism, 12)`, at least 1.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_WORKERS)
}

/// Splits `0..height` into at most `workers` contiguous ranges.
///
/// Ranges differ in length by at most one row; the first
/// `height % workers` ranges carry the extra row. Empty ranges are never
/// produced.
///
/// ```rust
/// use pxl_core::partition_rows;
///
/// assert_eq!(partition_rows(10, 3), vec![0..4, 4..7, 7..10]);
/// assert_eq!(partition_rows(2, 4), vec![0..1, 1..2]);
/// ```
pub fn partition_rows(height: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.clamp(1, height.max(1));
    let base = height / workers;
    let extra = height % workers;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let len = base + usize::from(i < extra);
        if len == 0 {
            break;
        }
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// A fixed-size pool of threads that processes image rows in disjoint ranges.
///
/// Use [`RowPool::global`] for the shared process-wide pool or
/// [`RowPool::with_workers`] for a call-scoped one.
pub struct RowPool {
    pool: Option<ThreadPool>,
    workers: usize,
    small_workload_pixels: usize,
    min_parallel_rows: usize,
}

impl RowPool {
    /// The process-wide pool, created on first use.
    ///
    /// If the threads cannot be spawned the pool degrades to inline execution.
    pub fn global() -> &'static RowPool {
        static GLOBAL: OnceLock<RowPool> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let workers = default_workers();
            match build_pool(workers) {
                Ok(pool) => {
                    debug!(workers, "Created row pool");
                    RowPool::from_parts(Some(pool), workers)
                }
                Err(err) => {
                    warn!(%err, "Row pool unavailable, running inline");
                    RowPool::from_parts(None, 1)
                }
            }
        })
    }

    /// Builds a call-scoped pool with `workers` threads (clamped to `1..=12`).
    pub fn with_workers(workers: usize) -> Result<Self> {
        let workers = workers.clamp(1, MAX_WORKERS);
        let pool = build_pool(workers)?;
        Ok(Self::from_parts(Some(pool), workers))
    }

    fn from_parts(pool: Option<ThreadPool>, workers: usize) -> Self {
        Self {
            pool,
            workers,
            small_workload_pixels: SMALL_WORKLOAD_PIXELS,
            min_parallel_rows: MIN_PARALLEL_ROWS,
        }
    }

    /// Overrides the inline-execution thresholds.
    pub fn with_thresholds(mut self, small_workload_pixels: usize, min_parallel_rows: usize) -> Self {
        self.small_workload_pixels = small_workload_pixels;
        self.min_parallel_rows = min_parallel_rows.max(1);
        self
    }

    /// Number of worker threads.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Whether an image of this size runs on the caller's thread.
    #[inline]
    pub fn runs_inline(&self, width: usize, height: usize) -> bool {
        self.pool.is_none()
            || self.workers < 2
            || height < self.min_parallel_rows
            || width.saturating_mul(height) < self.small_workload_pixels
    }

    /// Runs `f(start_row, end_row)` over disjoint ranges covering `0..height`.
    ///
    /// Blocks until every range has finished.
    pub fn for_rows<F>(&self, width: usize, height: usize, f: F)
    where
        F: Fn(usize, usize) + Sync,
    {
        if height == 0 {
            return;
        }
        match &self.pool {
            Some(pool) if !self.runs_inline(width, height) => {
                let ranges = partition_rows(height, self.workers);
                trace!(width, height, parts = ranges.len(), "for_rows");
                let f = &f;
                pool.scope(|s| {
                    for range in ranges {
                        s.spawn(move |_| f(range.start, range.end));
                    }
                });
            }
            _ => f(0, height),
        }
    }

    /// Splits `data` into disjoint row bands and runs `f(first_row, band)` on each.
    ///
    /// `stride` is in elements. Each band starts at a row boundary and
    /// holds whole rows (the last band ends wherever `data` ends, so a
    /// final row without padding is fine).
    pub fn for_row_bands<T, F>(&self, data: &mut [T], stride: usize, width: usize, height: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        if height == 0 || data.is_empty() {
            return;
        }
        let pool = match &self.pool {
            Some(pool) if !self.runs_inline(width, height) => pool,
            _ => {
                f(0, data);
                return;
            }
        };

        let ranges = partition_rows(height, self.workers);
        trace!(width, height, parts = ranges.len(), "for_row_bands");
        let last = ranges.len() - 1;
        let mut bands = Vec::with_capacity(ranges.len());
        let mut rest = data;
        for (i, range) in ranges.into_iter().enumerate() {
            let take = if i == last {
                rest.len()
            } else {
                (range.len() * stride).min(rest.len())
            };
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(take);
            bands.push((range.start, band));
            rest = tail;
        }

        let f = &f;
        pool.scope(|s| {
            for (first_row, band) in bands {
                s.spawn(move |_| f(first_row, band));
            }
        });
    }

    /// Runs `f(y, row)` on the used part of every row of `buf`.
    pub fn for_each_row_mut<T, F>(&self, buf: &mut PixelBuffer<T>, f: F)
    where
        T: Sample,
        F: Fn(usize, &mut [T]) + Sync,
    {
        let (width, height) = buf.dimensions();
        let stride = buf.stride_elements();
        let len = buf.row_elements();
        self.for_row_bands(buf.data_mut(), stride, width, height, |first_row, band| {
            for (i, row) in band.chunks_mut(stride).enumerate() {
                let y = first_row + i;
                // storage may extend past the last row
                if y >= height {
                    break;
                }
                f(y, &mut row[..len]);
            }
        });
    }
}

impl std::fmt::Debug for RowPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowPool")
            .field("workers", &self.workers)
            .field("threaded", &self.pool.is_some())
            .field("small_workload_pixels", &self.small_workload_pixels)
            .field("min_parallel_rows", &self.min_parallel_rows)
            .finish()
    }
}

fn build_pool(workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("pxl-rows-{i}"))
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))
}

/// Runs `f(start_row, end_row)` on the global pool.
pub fn parallel_for_rows<F>(width: usize, height: usize, f: F)
where
    F: Fn(usize, usize) + Sync,
{
    RowPool::global().for_rows(width, height, f);
}

/// Runs `f(first_row, band)` over disjoint row bands of `data` on the global pool.
pub fn parallel_row_bands<T, F>(data: &mut [T], stride: usize, width: usize, height: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    RowPool::global().for_row_bands(data, stride, width, height, f);
}

/// Runs `f(y, row)` on every row of `buf` on the global pool.
pub fn for_each_row_mut<T, F>(buf: &mut PixelBuffer<T>, f: F)
where
    T: Sample,
    F: Fn(usize, &mut [T]) + Sync,
{
    RowPool::global().for_each_row_mut(buf, f);
}
