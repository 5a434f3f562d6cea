use std::cell::UnsafeCell;
use std::ops::Range;

/// Images below this pixel count are filtered serially under [`ExecutionStrategy::Auto`].
const AUTO_PARALLEL_THRESHOLD: usize = 100_000;

/// Controls how a blur sweep is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Pick serial or parallel from the image size.
    ///
    /// Parallel for images of 100K pixels or more, serial otherwise.
    #[default]
    Auto,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of
    /// parallelization outweighs the benefits.
    Serial,

    /// Use the global rayon thread pool.
    Parallel,
}

impl ExecutionStrategy {
    /// Whether this strategy selects parallel execution for an image of
    /// `num_pixels` pixels.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_THRESHOLD,
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
        }
    }
}

/// Split `total` lines into contiguous ranges, one per worker.
///
/// Every line is covered by exactly one range and the ranges never overlap;
/// the final range absorbs the remainder when `total` does not divide evenly.
pub(crate) fn partition_lines(total: usize, workers: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return Vec::new();
    }
    let chunk = total.div_ceil(workers.max(1));
    (0..total)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(total))
        .collect()
}

/// A byte slice shared by workers that write pairwise-disjoint index sets.
///
/// Vertical sweeps write column-interleaved bytes, which safe `chunks_mut`
/// partitioning cannot express; each worker owns the byte offsets of its own
/// lines for the duration of one sweep.
pub(crate) struct SharedSlice<'a> {
    data: &'a [UnsafeCell<u8>],
}

// SAFETY: every index is written by at most one worker per sweep, and the
// slice is not read until the sweep's join.
unsafe impl Send for SharedSlice<'_> {}
unsafe impl Sync for SharedSlice<'_> {}

impl<'a> SharedSlice<'a> {
    /// Wrap a mutable slice for disjoint writes from multiple workers.
    pub(crate) fn new(slice: &'a mut [u8]) -> Self {
        // SAFETY: UnsafeCell<u8> has the same layout as u8.
        let data = unsafe { &*(slice as *mut [u8] as *const [UnsafeCell<u8>]) };
        Self { data }
    }

    /// Write one byte.
    ///
    /// # Safety
    ///
    /// No other worker may write `idx` during the same sweep.
    #[inline]
    pub(crate) unsafe fn write(&self, idx: usize, val: u8) {
        *self.data[idx].get() = val;
    }
}
