use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Error type for photo import operations
#[derive(Debug)]
pub enum ImportError {
    ImageLoadError(String),
    ImageSaveError(String),
    IoError(std::io::Error),
    PathError(String),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::ImageLoadError(msg) => write!(f, "Image load error: {}", msg),
            ImportError::ImageSaveError(msg) => write!(f, "Image save error: {}", msg),
            ImportError::IoError(e) => write!(f, "IO error: {}", e),
            ImportError::PathError(msg) => write!(f, "Path error: {}", msg),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::IoError(err)
    }
}

fn encode_jpeg(img: &DynamicImage, target: &Path, quality: u8) -> Result<(), ImportError> {
    let file = std::fs::File::create(target)?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality.clamp(1, 100));

    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| ImportError::ImageSaveError(format!("Failed to write JPEG: {}", e)))
}

/// Copies an image into `photo_dir` as `<uuid>.jpg` and returns the new path.
///
/// The source must decode as an image; it is re-encoded as JPEG so the
/// gallery only ever holds one format. The source file is left untouched.
/// Uses spawn_blocking to avoid blocking the async runtime.
pub async fn import_photo(
    source: &Path,
    photo_dir: &Path,
    quality: u8,
) -> Result<PathBuf, ImportError> {
    let source = source.to_path_buf();
    let photo_dir = photo_dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        log::debug!("Importing photo from {}", source.display());

        if !source.is_file() {
            return Err(ImportError::PathError(format!(
                "Image not found: {}",
                source.display()
            )));
        }

        let img = image::open(&source)
            .map_err(|e| ImportError::ImageLoadError(format!("Failed to load image: {}", e)))?;

        std::fs::create_dir_all(&photo_dir)?;
        let target = photo_dir.join(format!("{}.jpg", uuid::Uuid::new_v4()));

        if let Err(e) = encode_jpeg(&img, &target, quality) {
            // Do not leave a truncated file behind
            let _ = std::fs::remove_file(&target);
            return Err(e);
        }

        log::debug!(
            "Imported {}x{} photo to {}",
            img.width(),
            img.height(),
            target.display()
        );
        Ok(target)
    })
    .await
    .map_err(|e| ImportError::PathError(format!("Task join error: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[tokio::test]
    async fn test_import_reencodes_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("shot.png");
        RgbaImage::from_pixel(8, 6, Rgba([200, 10, 10, 128]))
            .save(&source)
            .unwrap();

        let photo_dir = dir.path().join("photos");
        let imported = import_photo(&source, &photo_dir, 85).await.unwrap();

        assert_eq!(imported.parent(), Some(photo_dir.as_path()));
        assert_eq!(imported.extension().and_then(|e| e.to_str()), Some("jpg"));
        assert_eq!(image::image_dimensions(&imported).unwrap(), (8, 6));
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_import_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        std::fs::write(&source, "not an image").unwrap();

        let photo_dir = dir.path().join("photos");
        let result = import_photo(&source, &photo_dir, 85).await;

        assert!(matches!(result, Err(ImportError::ImageLoadError(_))));
        assert!(!photo_dir.exists());
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = import_photo(&dir.path().join("nope.jpg"), dir.path(), 85).await;
        assert!(matches!(result, Err(ImportError::PathError(_))));
    }
}
