//! Error types for the fabric-pipeline crate.

/// Errors that can occur during color correction and watermark compositing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input bytes could not be decoded into a bitmap.
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// A bitmap could not be serialized to the output format.
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// No usable font for the text watermark: the supplied bytes were not a
    /// valid font and no known system font could be found.
    #[error("no usable font for text watermark")]
    FontUnavailable,
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
