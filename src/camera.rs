// Desktop stand-in for the device camera: the "shutter" imports an existing
// image file into the app's photo directory.

use async_trait::async_trait;
use photo_gallery::{import_photo, CameraDevice, ImportError, PlatformError};
use std::path::PathBuf;

pub struct ImportCamera {
    source: PathBuf,
    photo_dir: PathBuf,
    jpeg_quality: u8,
}

impl ImportCamera {
    pub fn new(source: PathBuf, photo_dir: PathBuf, jpeg_quality: u8) -> Self {
        Self {
            source,
            photo_dir,
            jpeg_quality,
        }
    }
}

fn import_error_to_platform_error(e: ImportError) -> PlatformError {
    match e {
        ImportError::PathError(msg) => PlatformError::Unavailable(msg),
        other => PlatformError::Other(other.to_string()),
    }
}

#[async_trait]
impl CameraDevice for ImportCamera {
    async fn capture(&self) -> Result<String, PlatformError> {
        let path = import_photo(&self.source, &self.photo_dir, self.jpeg_quality)
            .await
            .map_err(import_error_to_platform_error)?;

        // Store absolute paths so the gallery does not depend on the cwd
        let path = std::fs::canonicalize(&path).unwrap_or(path);
        Ok(path.to_string_lossy().into_owned())
    }
}
