use crate::platform::PermissionProvider;
use std::sync::Arc;

/// Capabilities the capture flow asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Camera,
    MediaLibrary,
    Location,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Camera => "camera",
            Capability::MediaLibrary => "media_library",
            Capability::Location => "location",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Not answered yet
    #[default]
    Pending,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Result of one permission round. `Default` is the all-pending state shown
/// while the prompts are still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub camera: PermissionStatus,
    pub media_library: PermissionStatus,
    pub location: PermissionStatus,
}

impl Permissions {
    pub fn all_granted() -> Self {
        Self {
            camera: PermissionStatus::Granted,
            media_library: PermissionStatus::Granted,
            location: PermissionStatus::Granted,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.camera == PermissionStatus::Pending
            || self.media_library == PermissionStatus::Pending
            || self.location == PermissionStatus::Pending
    }

    pub fn status(&self, capability: Capability) -> PermissionStatus {
        match capability {
            Capability::Camera => self.camera,
            Capability::MediaLibrary => self.media_library,
            Capability::Location => self.location,
        }
    }
}

/// Requests every capability the capture screen needs
pub struct PermissionGate {
    provider: Arc<dyn PermissionProvider>,
}

impl PermissionGate {
    pub fn new(provider: Arc<dyn PermissionProvider>) -> Self {
        Self { provider }
    }

    /// Asks for camera, media library and location, in that order.
    ///
    /// Each request is independent: a denial or a platform failure for one
    /// capability does not stop the others. Platform failures count as denied.
    pub async fn acquire(&self) -> Permissions {
        Permissions {
            camera: self.request(Capability::Camera).await,
            media_library: self.request(Capability::MediaLibrary).await,
            location: self.request(Capability::Location).await,
        }
    }

    async fn request(&self, capability: Capability) -> PermissionStatus {
        match self.provider.request(capability).await {
            Ok(status) => {
                log::debug!("Permission {}: {:?}", capability.as_str(), status);
                if status == PermissionStatus::Denied {
                    log::warn!("Permission for {} not granted", capability.as_str());
                }
                status
            }
            Err(e) => {
                log::warn!(
                    "Permission request for {} failed: {}",
                    capability.as_str(),
                    e
                );
                PermissionStatus::Denied
            }
        }
    }
}
