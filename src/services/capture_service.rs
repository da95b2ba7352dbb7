use crate::camera::ImportCamera;
use crate::config::AppConfig;
use crate::platform::{ConfiguredLocation, ConfiguredPermissions};
use photo_gallery::{CaptureSession, GalleryStore, LocationResolver, PermissionGate};
use std::path::Path;
use std::sync::Arc;

/// Starts a capture session wired to the desktop platform services.
///
/// Permissions and location are resolved here, before the first shot.
pub async fn start_session(
    config: &AppConfig,
    source: &Path,
    store: Arc<dyn GalleryStore>,
) -> CaptureSession {
    let gate = PermissionGate::new(Arc::new(ConfiguredPermissions::new(
        config.permissions.clone(),
    )));
    let resolver = LocationResolver::new(Arc::new(ConfiguredLocation::new(
        config.location.clone(),
    )));
    let camera = Arc::new(ImportCamera::new(
        source.to_path_buf(),
        config.photo_dir(),
        config.jpeg_quality,
    ));

    CaptureSession::start(&gate, &resolver, camera, store).await
}
