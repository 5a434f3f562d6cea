use crate::error::ImageError;

/// Number of channels per pixel. The layout is interleaved RGBA.
pub const CHANNELS: usize = 4;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use triblur_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// An owned RGBA8 raster stored row-major with a configurable row stride.
///
/// The pixel at `(x, y)` lives at byte offset `y * stride + x * 4`, with its
/// four channels contiguous in RGBA order. The stride is measured in bytes
/// and may exceed `width * 4` to accommodate row padding; the padding bytes
/// are carried but never interpreted as pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    size: ImageSize,
    stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer with a tight stride (`width * 4`).
    ///
    /// # Examples
    ///
    /// ```
    /// use triblur_image::{ImageSize, PixelBuffer};
    ///
    /// let buf = PixelBuffer::new(ImageSize { width: 10, height: 20 });
    ///
    /// assert_eq!(buf.width(), 10);
    /// assert_eq!(buf.height(), 20);
    /// assert_eq!(buf.stride(), 40);
    /// ```
    pub fn new(size: ImageSize) -> Self {
        Self::from_size_val(size, 0)
    }

    /// Create a buffer with a tight stride and every channel set to `val`.
    pub fn from_size_val(size: ImageSize, val: u8) -> Self {
        let stride = size.width * CHANNELS;
        Self {
            size,
            stride,
            data: vec![val; stride * size.height],
        }
    }

    /// Create a buffer from interleaved RGBA data with a tight stride.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length does not equal
    /// `width * height * 4`.
    ///
    /// # Examples
    ///
    /// ```
    /// use triblur_image::{ImageSize, PixelBuffer};
    ///
    /// let buf = PixelBuffer::from_vec(
    ///     ImageSize { width: 2, height: 1 },
    ///     vec![255, 0, 0, 255, 0, 255, 0, 255],
    /// ).unwrap();
    ///
    /// assert_eq!(buf.get_pixel(1, 0), [0, 255, 0, 255]);
    /// ```
    pub fn from_vec(size: ImageSize, data: Vec<u8>) -> Result<Self, ImageError> {
        Self::with_stride(size, size.width * CHANNELS, data)
    }

    /// Create a buffer from raw data with an explicit row stride in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the stride cannot hold a full row of pixels or if
    /// the data length does not equal `stride * height`.
    pub fn with_stride(size: ImageSize, stride: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        if stride < size.width * CHANNELS {
            return Err(ImageError::InvalidStride(stride, size.width * CHANNELS));
        }
        if data.len() != stride * size.height {
            return Err(ImageError::InvalidDataLength(
                data.len(),
                stride * size.height,
            ));
        }
        Ok(Self { size, stride, data })
    }

    /// The size of the buffer in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The width of the buffer in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the buffer in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whether the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }

    /// Byte offset of the pixel at `(x, y)`.
    ///
    /// The offset points at the R channel; the remaining channels follow at
    /// the next three bytes. Valid for every `(x, y)` with `x < width` and
    /// `y < height`.
    #[inline]
    pub fn pix_offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * CHANNELS
    }

    /// The RGBA channels of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> [u8; CHANNELS] {
        assert!(x < self.size.width && y < self.size.height);
        let off = self.pix_offset(x, y);
        [
            self.data[off],
            self.data[off + 1],
            self.data[off + 2],
            self.data[off + 3],
        ]
    }

    /// Overwrite the RGBA channels of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; CHANNELS]) {
        assert!(x < self.size.width && y < self.size.height);
        let off = self.pix_offset(x, y);
        self.data[off..off + CHANNELS].copy_from_slice(&rgba);
    }

    /// The raw bytes of the buffer, row padding included.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The raw bytes of the buffer as mutable, row padding included.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return the raw bytes, row padding included.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Overwrite this buffer's pixels with those of `src`.
    ///
    /// The strides of the two buffers may differ; only pixel bytes are
    /// copied, padding is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the sizes do not match.
    pub fn copy_from(&mut self, src: &PixelBuffer) -> Result<(), ImageError> {
        if self.size != src.size {
            return Err(ImageError::InvalidImageSize(
                src.size.width,
                src.size.height,
                self.size.width,
                self.size.height,
            ));
        }

        if self.stride == src.stride {
            self.data.copy_from_slice(&src.data);
            return Ok(());
        }

        let row_bytes = self.size.width * CHANNELS;
        for y in 0..self.size.height {
            let src_off = src.pix_offset(0, y);
            let dst_off = self.pix_offset(0, y);
            self.data[dst_off..dst_off + row_bytes]
                .copy_from_slice(&src.data[src_off..src_off + row_bytes]);
        }
        Ok(())
    }
}
