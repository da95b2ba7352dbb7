// Platform services consumed by the capture pipeline.
//
// The application crate implements these for each target (camera intent on
// Android, file import on desktop). Everything in this crate only talks to
// the traits.

use crate::location::{Coordinates, GeocodedAddress};
use crate::permission::{Capability, PermissionStatus};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformError {
    PermissionDenied(String),
    Unavailable(String),
    Cancelled(String),
    Other(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            PlatformError::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
            PlatformError::Cancelled(msg) => write!(f, "Cancelled: {}", msg),
            PlatformError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PlatformError {}

/// Prompts the user for a single capability
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn request(&self, capability: Capability) -> Result<PermissionStatus, PlatformError>;
}

/// Source of the device position and reverse geocoding
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, PlatformError>;

    /// Candidates in the provider's order; an empty list means no match
    async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
    ) -> Result<Vec<GeocodedAddress>, PlatformError>;
}

/// Takes a picture and returns a reference (uri or path) to the stored image
#[async_trait]
pub trait CameraDevice: Send + Sync {
    async fn capture(&self) -> Result<String, PlatformError>;
}
