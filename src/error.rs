use photo_gallery::{CaptureError, PhotoGalleryError};
use std::fmt;

/// Central error types for the camera app
#[derive(Debug)]
pub enum AppError {
    /// Gallery storage error
    Gallery(PhotoGalleryError),
    /// Photo capture error
    Capture(CaptureError),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Configuration file could not be read or parsed
    Config(String),
    /// Validation error (e.g. invalid inputs)
    Validation(String),
    /// Resource not found
    NotFound(String),
    /// Permission denied (e.g. camera)
    PermissionDenied(String),
    /// General error
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Gallery(e) => write!(f, "Gallery error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<PhotoGalleryError> for AppError {
    fn from(e: PhotoGalleryError) -> Self {
        match e {
            PhotoGalleryError::NotFound(msg) => AppError::NotFound(msg),
            PhotoGalleryError::Validation(msg) => AppError::Validation(msg),
            other => AppError::Gallery(other),
        }
    }
}

impl From<CaptureError> for AppError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::CameraUnavailable => AppError::PermissionDenied("camera".to_string()),
            other => AppError::Capture(other),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

/// User-friendly error messages for display
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Gallery(_) => "A storage error occurred. Please try again.".to_string(),
            AppError::Capture(CaptureError::Persistence(_)) => {
                "Error saving image to gallery. Please try again.".to_string()
            }
            AppError::Capture(e) => format!("Could not take the picture: {}", e),
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Config(msg) => format!("Invalid configuration: {}", msg),
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => format!("{} was not found.", msg),
            AppError::PermissionDenied(msg) => format!(
                "Permission for the {} not granted. Please change this in settings.",
                msg
            ),
            AppError::Other(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_through() {
        let err: AppError = PhotoGalleryError::NotFound("Photo 7".to_string()).into();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.user_message(), "Photo 7 was not found.");
    }

    #[test]
    fn test_camera_unavailable_is_permission_error() {
        let err: AppError = CaptureError::CameraUnavailable.into();
        assert_eq!(
            err.user_message(),
            "Permission for the camera not granted. Please change this in settings."
        );
    }
}
