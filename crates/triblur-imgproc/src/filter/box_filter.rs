use std::ops::Range;

use rayon::prelude::*;
use triblur_image::{PixelBuffer, CHANNELS};

use crate::parallel::{partition_lines, SharedSlice};

/// Axis along which a 1-D box sweep runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SweepAxis {
    /// Sweep each row left to right.
    Horizontal,
    /// Sweep each column top to bottom.
    Vertical,
}

impl SweepAxis {
    /// Number of independent lines for this axis.
    fn line_count(self, buf: &PixelBuffer) -> usize {
        match self {
            SweepAxis::Horizontal => buf.height(),
            SweepAxis::Vertical => buf.width(),
        }
    }

    /// Number of pixels in one line.
    fn line_len(self, buf: &PixelBuffer) -> usize {
        match self {
            SweepAxis::Horizontal => buf.width(),
            SweepAxis::Vertical => buf.height(),
        }
    }

    /// Byte offset of pixel `i` of `line` in a buffer with the given stride.
    #[inline]
    fn offset(self, stride: usize, line: usize, i: usize) -> usize {
        match self {
            SweepAxis::Horizontal => line * stride + i * CHANNELS,
            SweepAxis::Vertical => i * stride + line * CHANNELS,
        }
    }
}

/// A contiguous range of lines processed by one worker during one sweep.
struct WorkUnit {
    axis: SweepAxis,
    lines: Range<usize>,
    radius: usize,
}

/// Box-average every line of `unit`, reading `src` and writing through `dst`.
///
/// Maintains one running sum per channel so each line costs O(len) additions
/// regardless of the radius. Out-of-range window samples replicate the
/// nearest line end. Each line is processed in three zones so the steady
/// state carries no boundary checks: the ramp-up keeps subtracting the
/// replicated first pixel, the ramp-down keeps adding the replicated last
/// pixel. The zone bounds degenerate to clamped ramps when the window is
/// wider than the line, which keeps radii >= len exact.
fn box_sweep(src: &PixelBuffer, dst: &SharedSlice<'_>, dst_stride: usize, unit: &WorkUnit) {
    let axis = unit.axis;
    let r = unit.radius;
    let len = axis.line_len(src);
    if len == 0 {
        return;
    }

    let src_data = src.as_slice();
    let src_stride = src.stride();
    let window = 2 * r + 1;
    let inv_window = 1.0 / window as f64;

    let ramp_end = (r + 1).min(len);
    let steady_end = len.saturating_sub(r).max(ramp_end);

    for line in unit.lines.clone() {
        let first_off = axis.offset(src_stride, line, 0);
        let last_off = axis.offset(src_stride, line, len - 1);

        let mut first = [0u64; CHANNELS];
        let mut last = [0u64; CHANNELS];
        for ch in 0..CHANNELS {
            first[ch] = src_data[first_off + ch] as u64;
            last[ch] = src_data[last_off + ch] as u64;
        }

        // Seed the window as if the first pixel extended r + 1 samples past
        // the line start; the first ramp step below completes the sum for
        // output 0. Samples past the line end collapse into one multiply so
        // seeding stays O(len) even for radii wider than the line.
        let mut sum = [0u64; CHANNELS];
        for ch in 0..CHANNELS {
            sum[ch] = first[ch] * (r as u64 + 1);
        }
        let in_bounds = r.min(len);
        for j in 0..in_bounds {
            let off = axis.offset(src_stride, line, j);
            for ch in 0..CHANNELS {
                sum[ch] += src_data[off + ch] as u64;
            }
        }
        for ch in 0..CHANNELS {
            sum[ch] += last[ch] * (r - in_bounds) as u64;
        }

        // Ramp-up: the leaving sample is always the replicated first pixel.
        for i in 0..ramp_end {
            let enter_off = axis.offset(src_stride, line, (i + r).min(len - 1));
            let out_off = axis.offset(dst_stride, line, i);
            for ch in 0..CHANNELS {
                sum[ch] += src_data[enter_off + ch] as u64;
                sum[ch] -= first[ch];
                let val = (sum[ch] as f64 * inv_window).round() as u8;
                // SAFETY: this worker owns every byte of its lines for the
                // duration of the sweep; units cover disjoint line ranges.
                unsafe { dst.write(out_off + ch, val) };
            }
        }

        // Steady state: both window edges stay inside the line.
        for i in ramp_end..steady_end {
            let enter_off = axis.offset(src_stride, line, i + r);
            let leave_off = axis.offset(src_stride, line, i - r - 1);
            let out_off = axis.offset(dst_stride, line, i);
            for ch in 0..CHANNELS {
                sum[ch] += src_data[enter_off + ch] as u64;
                sum[ch] -= src_data[leave_off + ch] as u64;
                let val = (sum[ch] as f64 * inv_window).round() as u8;
                // SAFETY: as above.
                unsafe { dst.write(out_off + ch, val) };
            }
        }

        // Ramp-down: the entering sample is always the replicated last pixel.
        for i in steady_end..len {
            let leave_off = axis.offset(src_stride, line, i.saturating_sub(r + 1));
            let out_off = axis.offset(dst_stride, line, i);
            for ch in 0..CHANNELS {
                sum[ch] += last[ch];
                sum[ch] -= src_data[leave_off + ch] as u64;
                let val = (sum[ch] as f64 * inv_window).round() as u8;
                // SAFETY: as above.
                unsafe { dst.write(out_off + ch, val) };
            }
        }
    }
}

/// Run one directional sweep, fanning the lines out across the rayon pool.
///
/// The lines are split into contiguous work units, one per worker; the call
/// returns once every unit has finished, so the destination holds the
/// complete sweep result. With `parallel` false the same units run in order
/// on the calling thread and the output is byte-identical.
pub(crate) fn box_sweep_dispatch(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    axis: SweepAxis,
    radius: usize,
    parallel: bool,
) {
    let total = axis.line_count(src);
    if total == 0 || axis.line_len(src) == 0 {
        return;
    }

    let dst_stride = dst.stride();
    let shared = SharedSlice::new(dst.as_slice_mut());

    let workers = if parallel {
        rayon::current_num_threads()
    } else {
        1
    };
    let units: Vec<WorkUnit> = partition_lines(total, workers)
        .into_iter()
        .map(|lines| WorkUnit {
            axis,
            lines,
            radius,
        })
        .collect();

    if parallel {
        units
            .par_iter()
            .for_each(|unit| box_sweep(src, &shared, dst_stride, unit));
    } else {
        units
            .iter()
            .for_each(|unit| box_sweep(src, &shared, dst_stride, unit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use triblur_image::{ImageError, ImageSize};

    /// O(n * r) reference: the exact mean of the clamped window per pixel.
    fn naive_sweep(src: &PixelBuffer, axis: SweepAxis, radius: usize) -> PixelBuffer {
        let mut dst = PixelBuffer::new(src.size());
        let len = axis.line_len(src) as isize;
        let r = radius as isize;
        let window = 2 * radius as u64 + 1;

        for line in 0..axis.line_count(src) {
            for i in 0..len {
                let mut sum = [0u64; CHANNELS];
                for j in i - r..=i + r {
                    let off = axis.offset(
                        src.stride(),
                        line,
                        j.clamp(0, len - 1) as usize,
                    );
                    for ch in 0..CHANNELS {
                        sum[ch] += src.as_slice()[off + ch] as u64;
                    }
                }
                let out_off = axis.offset(dst.stride(), line, i as usize);
                for ch in 0..CHANNELS {
                    dst.as_slice_mut()[out_off + ch] =
                        (sum[ch] as f64 / window as f64).round() as u8;
                }
            }
        }
        dst
    }

    fn random_buffer(size: ImageSize, seed: u8) -> PixelBuffer {
        let mut rng = StdRng::from_seed([seed; 32]);
        let data = (0..size.width * size.height * CHANNELS)
            .map(|_| rng.random_range(0..=255))
            .collect();
        PixelBuffer::from_vec(size, data).unwrap()
    }

    fn sweep(src: &PixelBuffer, axis: SweepAxis, radius: usize, parallel: bool) -> PixelBuffer {
        let mut dst = PixelBuffer::new(src.size());
        box_sweep_dispatch(src, &mut dst, axis, radius, parallel);
        dst
    }

    #[test]
    fn test_sweep_matches_naive_small_radii() {
        let src = random_buffer(
            ImageSize {
                width: 13,
                height: 7,
            },
            42,
        );
        for axis in [SweepAxis::Horizontal, SweepAxis::Vertical] {
            for radius in [0, 1, 2, 3] {
                let expected = naive_sweep(&src, axis, radius);
                let got = sweep(&src, axis, radius, false);
                assert_eq!(
                    got.as_slice(),
                    expected.as_slice(),
                    "axis {:?} radius {}",
                    axis,
                    radius
                );
            }
        }
    }

    #[test]
    fn test_sweep_matches_naive_saturated_window() {
        let src = random_buffer(
            ImageSize {
                width: 5,
                height: 4,
            },
            7,
        );
        for axis in [SweepAxis::Horizontal, SweepAxis::Vertical] {
            for radius in [4, 5, 9, 100] {
                let expected = naive_sweep(&src, axis, radius);
                let got = sweep(&src, axis, radius, false);
                assert_eq!(
                    got.as_slice(),
                    expected.as_slice(),
                    "axis {:?} radius {}",
                    axis,
                    radius
                );
            }
        }
    }

    #[test]
    fn test_sweep_radius_zero_is_identity() {
        let src = random_buffer(
            ImageSize {
                width: 9,
                height: 6,
            },
            3,
        );
        for axis in [SweepAxis::Horizontal, SweepAxis::Vertical] {
            let got = sweep(&src, axis, 0, false);
            assert_eq!(got.as_slice(), src.as_slice());
        }
    }

    #[test]
    fn test_sweep_parallel_matches_serial() {
        let src = random_buffer(
            ImageSize {
                width: 64,
                height: 48,
            },
            11,
        );
        for axis in [SweepAxis::Horizontal, SweepAxis::Vertical] {
            let serial = sweep(&src, axis, 5, false);
            let parallel = sweep(&src, axis, 5, true);
            assert_eq!(serial.as_slice(), parallel.as_slice());
        }
    }

    #[test]
    fn test_sweep_empty_buffer_is_noop() {
        for size in [
            ImageSize {
                width: 0,
                height: 4,
            },
            ImageSize {
                width: 4,
                height: 0,
            },
        ] {
            let src = PixelBuffer::new(size);
            let mut dst = PixelBuffer::new(size);
            box_sweep_dispatch(&src, &mut dst, SweepAxis::Horizontal, 3, false);
            box_sweep_dispatch(&src, &mut dst, SweepAxis::Vertical, 3, false);
            assert!(dst.as_slice().is_empty());
        }
    }

    #[test]
    fn test_sweep_padded_strides_match_tight() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 6,
            height: 5,
        };
        let tight = random_buffer(size, 9);

        // Same pixels behind a padded stride, padding filled with a marker
        // value that must never leak into any average.
        let stride = size.width * CHANNELS + 8;
        let mut padded = PixelBuffer::with_stride(size, stride, vec![0xEE; stride * size.height])?;
        padded.copy_from(&tight)?;

        for axis in [SweepAxis::Horizontal, SweepAxis::Vertical] {
            let from_tight = sweep(&tight, axis, 2, false);

            let mut from_padded =
                PixelBuffer::with_stride(size, stride, vec![0; stride * size.height])?;
            box_sweep_dispatch(&padded, &mut from_padded, axis, 2, false);

            for y in 0..size.height {
                for x in 0..size.width {
                    assert_eq!(from_tight.get_pixel(x, y), from_padded.get_pixel(x, y));
                }
            }
        }
        Ok(())
    }
}
