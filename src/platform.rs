// Desktop implementations of the permission and location services.
// Both answer from the app configuration instead of OS prompts and GPS.

use crate::config::{LocationSettings, PermissionSettings};
use async_trait::async_trait;
use photo_gallery::{
    Capability, Coordinates, GeocodedAddress, LocationProvider, PermissionProvider,
    PermissionStatus, PlatformError,
};

pub struct ConfiguredPermissions {
    settings: PermissionSettings,
}

impl ConfiguredPermissions {
    pub fn new(settings: PermissionSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl PermissionProvider for ConfiguredPermissions {
    async fn request(&self, capability: Capability) -> Result<PermissionStatus, PlatformError> {
        let granted = match capability {
            Capability::Camera => self.settings.camera,
            Capability::MediaLibrary => self.settings.media_library,
            Capability::Location => self.settings.location,
        };

        Ok(if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }
}

pub struct ConfiguredLocation {
    settings: LocationSettings,
}

impl ConfiguredLocation {
    pub fn new(settings: LocationSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, PlatformError> {
        match (self.settings.latitude, self.settings.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(PlatformError::Unavailable(
                "no position configured".to_string(),
            )),
        }
    }

    async fn reverse_geocode(
        &self,
        _coordinates: Coordinates,
    ) -> Result<Vec<GeocodedAddress>, PlatformError> {
        Ok(self.settings.addresses.clone())
    }
}
