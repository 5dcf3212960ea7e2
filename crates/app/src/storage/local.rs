//! Local disk image store.

use std::path::PathBuf;

use async_trait::async_trait;
use jiff::Timestamp;

use crate::storage::{ImageStore, StorageError, extension_for};

/// Writes uploads into a directory served back under a static path.
#[derive(Debug, Clone)]
pub struct LocalDiskStore {
    upload_dir: PathBuf,
    public_base_url: String,
}

impl LocalDiskStore {
    #[must_use]
    pub fn new(upload_dir: PathBuf, public_base_url: String) -> Self {
        Self {
            upload_dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the stored name: sanitised stem, upload timestamp, mapped
    /// extension. The timestamp keeps repeated uploads of the same file from
    /// clobbering each other.
    fn stored_name(filename: &str, extension: &str, uploaded_at: Timestamp) -> String {
        let stem = filename
            .rsplit_once('.')
            .map_or(filename, |(stem, _)| stem)
            .replace(' ', "-");

        format!("{stem}-{}.{extension}", uploaded_at.as_millisecond())
    }
}

#[async_trait]
impl ImageStore for LocalDiskStore {
    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let extension = extension_for(content_type)?;
        let name = Self::stored_name(filename, extension, Timestamp::now());

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::write(self.upload_dir.join(&name), bytes).await?;

        Ok(format!("{}/{name}", self.public_base_url))
    }
}
