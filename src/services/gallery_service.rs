use crate::error::AppError;
use photo_gallery::{open_store, GalleryStore, PhotoGalleryConfig, PhotoRecord};
use std::sync::Arc;
use tokio::sync::OnceCell;

// Global gallery store, shared by the camera and gallery screens
static GALLERY: OnceCell<Arc<dyn GalleryStore>> = OnceCell::const_new();

/// Opens the gallery store once per process. Later calls return the store
/// opened first, whatever config they pass.
pub async fn open_gallery(config: &PhotoGalleryConfig) -> Result<Arc<dyn GalleryStore>, AppError> {
    let store = GALLERY
        .get_or_try_init(|| async { open_store(config).await })
        .await?;
    Ok(store.clone())
}

/// The store opened by `open_gallery`
pub fn gallery() -> Result<Arc<dyn GalleryStore>, AppError> {
    GALLERY
        .get()
        .cloned()
        .ok_or_else(|| AppError::Other("Gallery store is not open".to_string()))
}

/// Closes the shared store on shutdown. A no-op when it was never opened.
pub async fn close_gallery() -> Result<(), AppError> {
    if let Some(store) = GALLERY.get() {
        store.close().await?;
    }
    Ok(())
}

pub async fn list_photos() -> Result<Vec<PhotoRecord>, AppError> {
    Ok(gallery()?.list().await?)
}

pub async fn get_photo(id: i64) -> Result<PhotoRecord, AppError> {
    Ok(gallery()?.get(id).await?)
}

pub async fn delete_photo(id: i64) -> Result<(), AppError> {
    gallery()?.delete(id).await?;
    log::info!("Photo {} deleted", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_gallery::{NewPhotoRecord, StoreBackend};

    // The handle is process-wide, so the whole lifecycle lives in one test
    #[tokio::test]
    async fn test_gallery_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let config = PhotoGalleryConfig {
            storage_path: dir.path().to_string_lossy().into_owned(),
            backend: StoreBackend::Blob,
            ..Default::default()
        };

        let store = open_gallery(&config).await.unwrap();
        let again = open_gallery(&PhotoGalleryConfig::default()).await.unwrap();
        assert!(Arc::ptr_eq(&store, &again));
        assert_eq!(again.backend(), StoreBackend::Blob);

        let id = store.create(NewPhotoRecord::new("img1")).await.unwrap();
        assert_eq!(list_photos().await.unwrap().len(), 1);
        assert_eq!(get_photo(id).await.unwrap().photo_uri, "img1");

        delete_photo(id).await.unwrap();
        assert!(matches!(delete_photo(id).await, Err(AppError::NotFound(_))));

        close_gallery().await.unwrap();
        assert!(matches!(list_photos().await, Err(AppError::Gallery(_))));
    }
}
