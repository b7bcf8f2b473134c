use thiserror::Error;

/// Failures of grid label encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("missing image metadata for '{id}'")]
    MissingImageMetadata { id: String },
    #[error("invalid image size {width}x{height} for '{id}'")]
    InvalidImageSize {
        id: String,
        width: usize,
        height: usize,
    },
}
