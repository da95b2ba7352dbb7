use super::{not_found, GalleryStore};
use crate::error::PhotoGalleryError;
use crate::models::{NewPhotoRecord, PhotoRecord, StoreBackend};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

const GALLERY_KEY: &str = "gallery";
const NEXT_ID_KEY: &str = "next_id";

/// Gallery kept as one ordered JSON sequence under the `gallery` key of a
/// key-value file.
///
/// Every write reads, modifies and rewrites the whole file while holding the
/// writer lock, so concurrent creates and deletes cannot lose updates.
pub struct BlobGalleryStore {
    path: PathBuf,
    writer: Mutex<()>,
    closed: AtomicBool,
}

/// Entry as found on disk. Files written by older app versions have no `id`.
#[derive(Debug, Serialize, Deserialize)]
struct StoredPhoto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[serde(rename = "photoUri")]
    photo_uri: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<String>,
}

impl From<&PhotoRecord> for StoredPhoto {
    fn from(photo: &PhotoRecord) -> Self {
        Self {
            id: Some(photo.id),
            photo_uri: photo.photo_uri.clone(),
            latitude: photo.latitude,
            longitude: photo.longitude,
            address: photo.address.clone(),
        }
    }
}

/// In-memory form of the key-value file
#[derive(Debug, Default)]
struct GalleryDocument {
    photos: Vec<PhotoRecord>,
    next_id: i64,
    /// Keys written by someone else, preserved on save
    other: Map<String, Value>,
    /// Set when legacy entries were assigned ids while loading
    upgraded: bool,
}

impl GalleryDocument {
    fn empty() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn parse(mut map: Map<String, Value>) -> Result<Self, PhotoGalleryError> {
        let stored: Vec<StoredPhoto> = match map.remove(GALLERY_KEY) {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };
        let stored_next_id = map.remove(NEXT_ID_KEY).and_then(|v| v.as_i64());

        // Legacy entries get ids after the highest known one, in list order.
        // A file without any ids thus gets its positions (1-based) as ids.
        let mut last_id = stored.iter().filter_map(|p| p.id).max().unwrap_or(0);
        let mut upgraded = stored_next_id.is_none() && !stored.is_empty();
        let photos: Vec<PhotoRecord> = stored
            .into_iter()
            .map(|p| {
                let id = match p.id {
                    Some(id) => id,
                    None => {
                        upgraded = true;
                        last_id += 1;
                        last_id
                    }
                };
                PhotoRecord {
                    id,
                    photo_uri: p.photo_uri,
                    latitude: p.latitude,
                    longitude: p.longitude,
                    address: p.address,
                }
            })
            .collect();

        let next_id = stored_next_id.unwrap_or(1).max(last_id + 1);

        Ok(Self {
            photos,
            next_id,
            other: map,
            upgraded,
        })
    }

    fn to_json(&self) -> Result<Vec<u8>, PhotoGalleryError> {
        let mut map = self.other.clone();
        let stored: Vec<StoredPhoto> = self.photos.iter().map(StoredPhoto::from).collect();
        map.insert(GALLERY_KEY.to_string(), serde_json::to_value(stored)?);
        map.insert(NEXT_ID_KEY.to_string(), Value::from(self.next_id));
        Ok(serde_json::to_vec_pretty(&Value::Object(map))?)
    }
}

impl BlobGalleryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_open(&self) -> Result<(), PhotoGalleryError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(PhotoGalleryError::Closed)
        } else {
            Ok(())
        }
    }

    /// Reads the document; `None` when the file does not exist yet
    async fn load(&self) -> Result<Option<GalleryDocument>, PhotoGalleryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let map: Map<String, Value> = serde_json::from_slice(&bytes)?;
        GalleryDocument::parse(map).map(Some)
    }

    /// Replaces the file atomically: write a sibling temp file, sync, rename
    async fn save(&self, document: &GalleryDocument) -> Result<(), PhotoGalleryError> {
        let json = document.to_json()?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::File::open(&tmp).await?.sync_all().await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn load_or_empty(&self) -> Result<GalleryDocument, PhotoGalleryError> {
        Ok(self.load().await?.unwrap_or_else(GalleryDocument::empty))
    }
}

#[async_trait]
impl GalleryStore for BlobGalleryStore {
    async fn ensure_schema(&self) -> Result<(), PhotoGalleryError> {
        let _writer = self.writer.lock().await;
        self.check_open()?;

        match self.load().await? {
            None => {
                log::info!("Creating gallery blob at {}", self.path.display());
                self.save(&GalleryDocument::empty()).await?;
            }
            Some(document) if document.upgraded => {
                log::info!(
                    "Assigned stable ids to {} legacy gallery entries",
                    document.photos.len()
                );
                self.save(&document).await?;
            }
            Some(_) => {}
        }

        Ok(())
    }

    async fn create(&self, record: NewPhotoRecord) -> Result<i64, PhotoGalleryError> {
        record.validate()?;
        let _writer = self.writer.lock().await;
        self.check_open()?;

        let mut document = self.load_or_empty().await?;
        let id = document.next_id;
        document.next_id += 1;
        document.photos.push(record.with_id(id));
        self.save(&document).await?;

        log::debug!("Photo {} stored in blob ({} total)", id, document.photos.len());
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<PhotoRecord>, PhotoGalleryError> {
        let _writer = self.writer.lock().await;
        self.check_open()?;
        Ok(self.load_or_empty().await?.photos)
    }

    async fn get(&self, id: i64) -> Result<PhotoRecord, PhotoGalleryError> {
        self.list()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), PhotoGalleryError> {
        let _writer = self.writer.lock().await;
        self.check_open()?;

        let mut document = self.load_or_empty().await?;
        let before = document.photos.len();
        document.photos.retain(|p| p.id != id);
        if document.photos.len() == before {
            return Err(not_found(id));
        }
        self.save(&document).await?;

        log::debug!("Photo {} deleted from blob", id);
        Ok(())
    }

    async fn close(&self) -> Result<(), PhotoGalleryError> {
        // Wait for an in-flight write to finish before refusing new ones
        let _writer = self.writer.lock().await;
        if !self.closed.swap(true, Ordering::SeqCst) {
            log::info!("Blob gallery store closed");
        }
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Blob
    }
}
