//! Uploads Config

use std::path::PathBuf;

use clap::Args;

use aroma_app::storage::LocalDiskStore;

/// Image upload settings.
#[derive(Debug, Args)]
pub struct UploadsConfig {
    /// Directory uploaded images are written to
    #[arg(long, env = "UPLOAD_DIR", default_value = "public/uploads")]
    pub upload_dir: PathBuf,

    /// Base URL uploaded images are served from
    #[arg(
        long,
        env = "UPLOAD_BASE_URL",
        default_value = "http://localhost:3000/public/uploads"
    )]
    pub upload_base_url: String,
}

impl UploadsConfig {
    #[must_use]
    pub fn to_store(&self) -> LocalDiskStore {
        LocalDiskStore::new(self.upload_dir.clone(), self.upload_base_url.clone())
    }
}
