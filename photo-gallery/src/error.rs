use crate::import::ImportError;

/// Error type for photo gallery operations
#[derive(Debug)]
pub enum PhotoGalleryError {
    DatabaseError(rusqlite::Error),
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
    ImageError(String),
    NotFound(String),
    Validation(String),
    /// The store was closed and can no longer be used
    Closed,
    Other(String),
}

impl std::fmt::Display for PhotoGalleryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoGalleryError::DatabaseError(e) => write!(f, "Database error: {}", e),
            PhotoGalleryError::IoError(e) => write!(f, "IO error: {}", e),
            PhotoGalleryError::SerializationError(e) => write!(f, "Serialization error: {}", e),
            PhotoGalleryError::ImageError(msg) => write!(f, "Image error: {}", msg),
            PhotoGalleryError::NotFound(msg) => write!(f, "Not found: {}", msg),
            PhotoGalleryError::Validation(msg) => write!(f, "Validation error: {}", msg),
            PhotoGalleryError::Closed => write!(f, "Gallery store is closed"),
            PhotoGalleryError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PhotoGalleryError {}

impl From<rusqlite::Error> for PhotoGalleryError {
    fn from(err: rusqlite::Error) -> Self {
        PhotoGalleryError::DatabaseError(err)
    }
}

impl From<std::io::Error> for PhotoGalleryError {
    fn from(err: std::io::Error) -> Self {
        PhotoGalleryError::IoError(err)
    }
}

impl From<serde_json::Error> for PhotoGalleryError {
    fn from(err: serde_json::Error) -> Self {
        PhotoGalleryError::SerializationError(err)
    }
}

impl From<ImportError> for PhotoGalleryError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::IoError(e) => PhotoGalleryError::IoError(e),
            other => PhotoGalleryError::ImageError(other.to_string()),
        }
    }
}
