use crate::models::NewPhotoRecord;
use crate::permission::PermissionStatus;
use crate::platform::LocationProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Finite and inside latitude [-90, 90], longitude [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One reverse geocoding candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeocodedAddress {
    pub name: Option<String>,
    pub street: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl GeocodedAddress {
    /// Display form `name, street, region, country`; blank parts are skipped
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.name, &self.street, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Outcome of resolving the device location
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LocationFix {
    Resolved {
        coordinates: Coordinates,
        address: String,
    },
    /// Position known, reverse geocoding found nothing
    Partial { coordinates: Coordinates },
    #[default]
    Unavailable,
}

impl LocationFix {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LocationFix::Resolved { coordinates, .. } | LocationFix::Partial { coordinates } => {
                Some(*coordinates)
            }
            LocationFix::Unavailable => None,
        }
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            LocationFix::Resolved { address, .. } => Some(address),
            _ => None,
        }
    }

    /// Copies the location fields into a record, clearing whatever was there
    pub fn apply(&self, mut record: NewPhotoRecord) -> NewPhotoRecord {
        let coordinates = self.coordinates();
        record.latitude = coordinates.map(|c| c.latitude);
        record.longitude = coordinates.map(|c| c.longitude);
        record.address = self.address().map(str::to_string);
        record
    }
}

/// Resolves position and address for newly captured photos
pub struct LocationResolver {
    provider: Arc<dyn LocationProvider>,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self { provider }
    }

    /// Never fails: missing permission, no fix and geocoder errors all
    /// degrade to a fix with fewer fields.
    pub async fn resolve(&self, permission: PermissionStatus) -> LocationFix {
        if !permission.is_granted() {
            log::info!("Location permission not granted, photos will have no geotag");
            return LocationFix::Unavailable;
        }

        let coordinates = match self.provider.current_position().await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                log::warn!("No location fix available: {}", e);
                return LocationFix::Unavailable;
            }
        };

        if !coordinates.is_valid() {
            log::warn!(
                "Ignoring invalid position {}, {}",
                coordinates.latitude,
                coordinates.longitude
            );
            return LocationFix::Unavailable;
        }

        log::debug!(
            "Current position: {}, {}",
            coordinates.latitude,
            coordinates.longitude
        );

        let candidates = match self.provider.reverse_geocode(coordinates).await {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("Reverse geocoding failed: {}", e);
                return LocationFix::Partial { coordinates };
            }
        };

        // The provider's first candidate wins
        match candidates.first().and_then(GeocodedAddress::display) {
            Some(address) => LocationFix::Resolved {
                coordinates,
                address,
            },
            None => {
                log::debug!("Reverse geocoding returned no usable address");
                LocationFix::Partial { coordinates }
            }
        }
    }
}
