//! Gallery persistence.
//!
//! Both backends honour the same contract:
//! - `create` validates, assigns a fresh id and persists the record atomically
//! - `list` returns every record oldest first
//! - `delete` removes exactly one record or reports `NotFound`
//! - ids are never reused, not even after the newest record is deleted

mod blob;
mod sqlite;

pub use blob::BlobGalleryStore;
pub use sqlite::SqliteGalleryStore;

use crate::error::PhotoGalleryError;
use crate::models::{NewPhotoRecord, PhotoGalleryConfig, PhotoRecord, StoreBackend};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Creates the underlying table or namespace if it is missing
    async fn ensure_schema(&self) -> Result<(), PhotoGalleryError>;

    async fn create(&self, record: NewPhotoRecord) -> Result<i64, PhotoGalleryError>;

    async fn list(&self) -> Result<Vec<PhotoRecord>, PhotoGalleryError>;

    async fn get(&self, id: i64) -> Result<PhotoRecord, PhotoGalleryError>;

    async fn delete(&self, id: i64) -> Result<(), PhotoGalleryError>;

    /// Releases the backend. Every later call fails with `Closed`.
    async fn close(&self) -> Result<(), PhotoGalleryError>;

    fn backend(&self) -> StoreBackend;
}

/// Opens the backend selected in the config and ensures its schema
pub async fn open_store(
    config: &PhotoGalleryConfig,
) -> Result<Arc<dyn GalleryStore>, PhotoGalleryError> {
    let path = config.store_file();
    log::info!(
        "Opening {} gallery store at {}",
        config.backend.as_str(),
        path.display()
    );

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let store: Arc<dyn GalleryStore> = match config.backend {
        StoreBackend::Sqlite => Arc::new(SqliteGalleryStore::open(&path)?),
        StoreBackend::Blob => Arc::new(BlobGalleryStore::new(&path)),
    };
    store.ensure_schema().await?;

    Ok(store)
}

fn not_found(id: i64) -> PhotoGalleryError {
    PhotoGalleryError::NotFound(format!("Photo {}", id))
}
