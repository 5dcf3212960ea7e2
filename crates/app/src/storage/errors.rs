//! Storage errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported image type: {content_type}")]
    InvalidImageType { content_type: String },

    #[error("failed to write image")]
    Io(#[from] std::io::Error),
}
