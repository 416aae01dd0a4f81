use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

use crate::format::ImageFormat;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for uploaded album images.
///
/// Implementations pick the stored file name themselves; callers only ever
/// see the generated name that comes back from [`ImageStorage::store_image`].
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Persist `data` and return the generated file name (no directory part).
    async fn store_image(&self, format: ImageFormat, data: &[u8]) -> Result<String, StorageError>;
}

// ─── Local Filesystem Backend ──────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    base_path: PathBuf,
}

impl LocalImageStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn from_env() -> Self {
        let base = std::env::var("IMAGE_STORAGE_PATH")
            .unwrap_or_else(|_| "./public/images".to_string());
        Self::new(base)
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    pub fn full_path(&self, file_name: &str) -> PathBuf {
        self.base_path.join(file_name)
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store_image(&self, format: ImageFormat, data: &[u8]) -> Result<String, StorageError> {
        fs::create_dir_all(&self.base_path).await?;

        let file_name = generated_name(format);
        let path = self.full_path(&file_name);
        fs::write(&path, data).await?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "stored image");
        Ok(file_name)
    }
}

fn generated_name(format: ImageFormat) -> String {
    format!("{}.{}", Uuid::new_v4(), format.extension())
}
