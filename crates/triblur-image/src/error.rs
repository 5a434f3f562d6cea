/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when the row stride cannot hold a full row of pixels.
    #[error("Stride ({0}) is smaller than a row of pixels ({1})")]
    InvalidStride(usize, usize),

    /// Error when the source and destination sizes do not match.
    #[error("Source size ({0}x{1}) does not match destination size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),
}
