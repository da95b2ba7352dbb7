use crate::error::AppError;
use crate::filesystem;
use photo_gallery::{Coordinates, GeocodedAddress, PhotoGalleryConfig, StoreBackend};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "geocam.toml";

/// Grants reported by the desktop permission provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PermissionSettings {
    pub camera: bool,
    pub media_library: bool,
    pub location: bool,
}

impl Default for PermissionSettings {
    fn default() -> Self {
        Self {
            camera: true,
            media_library: true,
            location: true,
        }
    }
}

/// Position reported by the desktop location provider.
/// Without coordinates the device has no fix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LocationSettings {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Reverse geocoding candidates, first one wins
    pub addresses: Vec<GeocodedAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub data_dir: Option<PathBuf>,
    pub photo_dir: Option<PathBuf>,
    pub jpeg_quality: u8,
    pub permissions: PermissionSettings,
    pub location: LocationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            data_dir: None,
            photo_dir: None,
            jpeg_quality: PhotoGalleryConfig::default().jpeg_quality,
            permissions: PermissionSettings::default(),
            location: LocationSettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from `path`, or from the app directory when no path
    /// is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (filesystem::get_app_data_dir().join(CONFIG_FILE), false),
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(AppError::Config(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let config = Self::from_toml(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(s: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(AppError::Config(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if self.location.latitude.is_some() != self.location.longitude.is_some() {
            return Err(AppError::Config(
                "location needs both latitude and longitude".to_string(),
            ));
        }
        if let (Some(latitude), Some(longitude)) = (self.location.latitude, self.location.longitude) {
            let position = Coordinates {
                latitude,
                longitude,
            };
            if !position.is_valid() {
                return Err(AppError::Config(format!(
                    "location {}, {} is out of range",
                    latitude, longitude
                )));
            }
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(filesystem::get_app_data_dir)
    }

    pub fn photo_dir(&self) -> PathBuf {
        self.photo_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("photos"))
    }

    pub fn gallery_config(&self) -> PhotoGalleryConfig {
        PhotoGalleryConfig {
            storage_path: self.data_dir().to_string_lossy().into_owned(),
            backend: self.backend,
            jpeg_quality: self.jpeg_quality,
            ..Default::default()
        }
    }
}
