use crate::error::PhotoGalleryError;
use serde::{Deserialize, Serialize};

/// A photo persisted in the gallery, with optional location metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoRecord {
    pub id: i64,
    #[serde(rename = "photoUri")]
    pub photo_uri: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

/// A photo that has not been assigned an id yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewPhotoRecord {
    #[serde(rename = "photoUri")]
    pub photo_uri: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

impl NewPhotoRecord {
    pub fn new(photo_uri: impl Into<String>) -> Self {
        Self {
            photo_uri: photo_uri.into(),
            ..Default::default()
        }
    }

    /// Checks the record invariants enforced by every store backend
    pub fn validate(&self) -> Result<(), PhotoGalleryError> {
        if self.photo_uri.trim().is_empty() {
            return Err(PhotoGalleryError::Validation(
                "photo uri must not be empty".to_string(),
            ));
        }

        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => {
                if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
                    return Err(PhotoGalleryError::Validation(format!(
                        "latitude out of range: {}",
                        lat
                    )));
                }
                if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                    return Err(PhotoGalleryError::Validation(format!(
                        "longitude out of range: {}",
                        lon
                    )));
                }
            }
            (None, None) => {
                if self.address.is_some() {
                    return Err(PhotoGalleryError::Validation(
                        "address requires coordinates".to_string(),
                    ));
                }
            }
            _ => {
                return Err(PhotoGalleryError::Validation(
                    "latitude and longitude must be set together".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Promotes the record to a persisted one with the given id
    pub fn with_id(self, id: i64) -> PhotoRecord {
        PhotoRecord {
            id,
            photo_uri: self.photo_uri,
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.address,
        }
    }
}

/// Storage technology behind the gallery
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Blob,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Blob => "blob",
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = PhotoGalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "blob" => Ok(StoreBackend::Blob),
            other => Err(PhotoGalleryError::Validation(format!(
                "unknown store backend: {}",
                other
            ))),
        }
    }
}

/// Configuration for photo gallery initialization
#[derive(Debug, Clone)]
pub struct PhotoGalleryConfig {
    /// Directory holding the gallery database or blob file
    pub storage_path: String,
    pub backend: StoreBackend,
    pub database_file: String,
    pub blob_file: String,
    /// JPEG quality for imported photos (1-100)
    pub jpeg_quality: u8,
}

impl PhotoGalleryConfig {
    pub fn store_file(&self) -> std::path::PathBuf {
        let file = match self.backend {
            StoreBackend::Sqlite => &self.database_file,
            StoreBackend::Blob => &self.blob_file,
        };
        std::path::Path::new(&self.storage_path).join(file)
    }
}

impl Default for PhotoGalleryConfig {
    fn default() -> Self {
        Self {
            storage_path: String::new(),
            backend: StoreBackend::Sqlite,
            database_file: "gallery.db".to_string(),
            blob_file: "gallery.json".to_string(),
            jpeg_quality: 90,
        }
    }
}
