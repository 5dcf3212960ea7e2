//! Image storage.
//!
//! Uploads go through the [`ImageStore`] seam so handlers never care where
//! bytes end up. The shipped backend writes to local disk and serves files
//! back under a static path.

pub mod errors;
mod local;

use async_trait::async_trait;
use mockall::automock;

pub use errors::StorageError;
pub use local::LocalDiskStore;

/// Accepted upload types, mapped to the extension written to disk.
const FILE_TYPE_MAP: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
];

/// Look up the on-disk extension for an upload's content type.
///
/// # Errors
///
/// Returns [`StorageError::InvalidImageType`] for anything that is not a
/// PNG or JPEG.
pub fn extension_for(content_type: &str) -> Result<&'static str, StorageError> {
    FILE_TYPE_MAP
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, extension)| *extension)
        .ok_or_else(|| StorageError::InvalidImageType {
            content_type: content_type.to_string(),
        })
}

#[automock]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an uploaded image and return its public URL.
    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError>;
}
