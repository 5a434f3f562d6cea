use triblur_image::{ImageError, PixelBuffer};

use super::box_filter::{box_sweep_dispatch, SweepAxis};
use super::kernels;
use crate::parallel::ExecutionStrategy;

/// Number of box passes used to approximate a gaussian.
const GAUSSIAN_PASSES: usize = 3;

fn check_same_size(src: &PixelBuffer, dst: &PixelBuffer) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    Ok(())
}

/// Blur an image using a box blur filter
///
/// Every destination pixel becomes the mean of the `(2r + 1) x (2r + 1)`
/// source neighborhood, computed as a horizontal then a vertical sliding
/// window sweep. Window samples beyond the image replicate the nearest edge
/// pixel.
///
/// # Arguments
///
/// * `src` - The source buffer.
/// * `dst` - The destination buffer, same size as `src` (strides may differ).
/// * `radius` - The box radius; 0 copies the source unchanged.
pub fn box_blur(src: &PixelBuffer, dst: &mut PixelBuffer, radius: usize) -> Result<(), ImageError> {
    box_blur_with_strategy(src, dst, radius, ExecutionStrategy::Auto)
}

/// Blur an image using a box blur filter with execution strategy control.
///
/// See [`box_blur`] for the filter semantics.
pub fn box_blur_with_strategy(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    radius: usize,
    strategy: ExecutionStrategy,
) -> Result<(), ImageError> {
    check_same_size(src, dst)?;
    if src.is_empty() {
        return Ok(());
    }

    let parallel = strategy.is_parallel(src.width() * src.height());
    let mut scratch = PixelBuffer::new(src.size());

    box_sweep_dispatch(src, &mut scratch, SweepAxis::Horizontal, radius, parallel);
    box_sweep_dispatch(&scratch, dst, SweepAxis::Vertical, radius, parallel);

    Ok(())
}

/// Blur an image using a gaussian blur filter
///
/// Approximates a gaussian of standard deviation `sigma` by three successive
/// box blur passes whose widths match the gaussian's variance. Each pass runs
/// a horizontal sweep into a scratch buffer and a vertical sweep back, so the
/// fully blurred result of one pass feeds the next; one scratch buffer is
/// allocated per call.
///
/// # Arguments
///
/// * `src` - The source buffer.
/// * `dst` - The destination buffer, same size as `src` (strides may differ).
/// * `sigma` - The standard deviation of the gaussian. Values <= 0 leave
///   `dst` a pixel-exact copy of `src`.
///
/// # Examples
///
/// ```
/// use triblur_image::{ImageSize, PixelBuffer};
/// use triblur_imgproc::filter::gaussian_blur;
///
/// let size = ImageSize { width: 8, height: 8 };
/// let src = PixelBuffer::from_size_val(size, 200);
/// let mut dst = PixelBuffer::new(size);
///
/// gaussian_blur(&src, &mut dst, 1.5)?;
///
/// // a uniform image is a fixed point of the blur
/// assert_eq!(dst.as_slice(), src.as_slice());
/// # Ok::<(), triblur_image::ImageError>(())
/// ```
pub fn gaussian_blur(src: &PixelBuffer, dst: &mut PixelBuffer, sigma: f32) -> Result<(), ImageError> {
    gaussian_blur_with_strategy(src, dst, sigma, ExecutionStrategy::Auto)
}

/// Blur an image using a gaussian blur filter with execution strategy control.
///
/// See [`gaussian_blur`] for the filter semantics. `ExecutionStrategy::Serial`
/// and `ExecutionStrategy::Parallel` produce byte-identical output.
pub fn gaussian_blur_with_strategy(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    sigma: f32,
    strategy: ExecutionStrategy,
) -> Result<(), ImageError> {
    check_same_size(src, dst)?;
    dst.copy_from(src)?;
    if src.is_empty() || sigma <= 0.0 {
        return Ok(());
    }

    let widths = kernels::boxes_for_gaussian(sigma, GAUSSIAN_PASSES);
    let parallel = strategy.is_parallel(src.width() * src.height());
    let mut scratch = PixelBuffer::new(src.size());

    for width in widths {
        debug_assert!(width % 2 == 1, "box widths must be odd, got {}", width);
        let radius = (width - 1) / 2;
        box_sweep_dispatch(&*dst, &mut scratch, SweepAxis::Horizontal, radius, parallel);
        box_sweep_dispatch(&scratch, dst, SweepAxis::Vertical, radius, parallel);
    }

    Ok(())
}
