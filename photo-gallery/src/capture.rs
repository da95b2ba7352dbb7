use crate::error::PhotoGalleryError;
use crate::location::{LocationFix, LocationResolver};
use crate::models::NewPhotoRecord;
use crate::permission::{PermissionGate, Permissions};
use crate::platform::{CameraDevice, PlatformError};
use crate::store::GalleryStore;
use std::sync::Arc;

#[derive(Debug)]
pub enum CaptureError {
    /// Camera permission was not granted
    CameraUnavailable,
    /// A photo is already waiting to be saved or discarded
    PhotoPending,
    /// Commit without a pending photo
    NothingPending,
    Capture(PlatformError),
    /// Saving failed; the photo is still pending
    Persistence(PhotoGalleryError),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::CameraUnavailable => {
                write!(f, "Permission for the camera not granted")
            }
            CaptureError::PhotoPending => write!(f, "A photo is already pending"),
            CaptureError::NothingPending => write!(f, "No photo to save"),
            CaptureError::Capture(e) => write!(f, "Capture failed: {}", e),
            CaptureError::Persistence(e) => write!(f, "Saving photo failed: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {}

/// A captured photo that is not in the gallery yet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPhoto {
    pub record: NewPhotoRecord,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing,
    Pending(PendingPhoto),
    Committing(PendingPhoto),
}

/// One visit to the camera screen.
///
/// Permissions and location are resolved once when the session starts and
/// reused for every shot. At most one photo is pending at a time.
pub struct CaptureSession {
    camera: Arc<dyn CameraDevice>,
    store: Arc<dyn GalleryStore>,
    permissions: Permissions,
    location: LocationFix,
    state: CaptureState,
}

impl CaptureSession {
    /// Runs the permission prompts, then location resolution, and returns an
    /// idle session. Both steps degrade instead of failing.
    pub async fn start(
        gate: &PermissionGate,
        resolver: &LocationResolver,
        camera: Arc<dyn CameraDevice>,
        store: Arc<dyn GalleryStore>,
    ) -> Self {
        let permissions = gate.acquire().await;
        let location = resolver.resolve(permissions.location).await;
        log::info!("Capture session started, location: {:?}", location);

        Self::with_context(camera, store, permissions, location)
    }

    /// Builds a session from already resolved permissions and location
    pub fn with_context(
        camera: Arc<dyn CameraDevice>,
        store: Arc<dyn GalleryStore>,
        permissions: Permissions,
        location: LocationFix,
    ) -> Self {
        Self {
            camera,
            store,
            permissions,
            location,
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    pub fn location(&self) -> &LocationFix {
        &self.location
    }

    pub fn pending(&self) -> Option<&PendingPhoto> {
        match &self.state {
            CaptureState::Pending(photo) | CaptureState::Committing(photo) => Some(photo),
            _ => None,
        }
    }

    pub fn can_capture(&self) -> bool {
        self.permissions.camera.is_granted()
    }

    /// Takes a picture and holds it as pending
    pub async fn capture(&mut self) -> Result<PendingPhoto, CaptureError> {
        if !self.can_capture() {
            return Err(CaptureError::CameraUnavailable);
        }
        if !matches!(self.state, CaptureState::Idle) {
            return Err(CaptureError::PhotoPending);
        }

        self.state = CaptureState::Capturing;
        let uri = match self.camera.capture().await {
            Ok(uri) if !uri.trim().is_empty() => uri,
            Ok(_) => {
                self.state = CaptureState::Idle;
                return Err(CaptureError::Capture(PlatformError::Other(
                    "camera returned no image".to_string(),
                )));
            }
            Err(e) => {
                log::error!("Capture failed: {}", e);
                self.state = CaptureState::Idle;
                return Err(CaptureError::Capture(e));
            }
        };

        log::debug!("Captured photo: {}", uri);
        let photo = PendingPhoto {
            record: self.location.apply(NewPhotoRecord::new(uri)),
        };
        self.state = CaptureState::Pending(photo.clone());
        Ok(photo)
    }

    /// Saves the pending photo and returns its gallery id.
    ///
    /// On failure the photo stays pending so the caller can retry or discard.
    pub async fn commit(&mut self) -> Result<i64, CaptureError> {
        let photo = match std::mem::take(&mut self.state) {
            CaptureState::Pending(photo) => photo,
            other => {
                self.state = other;
                return Err(CaptureError::NothingPending);
            }
        };

        self.state = CaptureState::Committing(photo.clone());
        match self.store.create(photo.record.clone()).await {
            Ok(id) => {
                log::info!("Photo saved to gallery with id {}", id);
                self.state = CaptureState::Idle;
                Ok(id)
            }
            Err(e) => {
                log::error!("Error saving image to gallery: {}", e);
                self.state = CaptureState::Pending(photo);
                Err(CaptureError::Persistence(e))
            }
        }
    }

    /// Drops the pending photo without saving; returns it if there was one
    pub fn discard(&mut self) -> Option<PendingPhoto> {
        match std::mem::take(&mut self.state) {
            CaptureState::Pending(photo) | CaptureState::Committing(photo) => {
                log::debug!("Discarded photo: {}", photo.record.photo_uri);
                Some(photo)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Coordinates, GeocodedAddress};
    use crate::models::{PhotoRecord, StoreBackend};
    use crate::permission::{Capability, PermissionStatus};
    use crate::platform::{LocationProvider, PermissionProvider};
    use crate::store::SqliteGalleryStore;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeCamera {
        shots: Mutex<VecDeque<Result<String, PlatformError>>>,
    }

    impl FakeCamera {
        fn new(shots: Vec<Result<String, PlatformError>>) -> Arc<Self> {
            Arc::new(Self {
                shots: Mutex::new(shots.into()),
            })
        }
    }

    #[async_trait]
    impl CameraDevice for FakeCamera {
        async fn capture(&self) -> Result<String, PlatformError> {
            self.shots
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PlatformError::Other("out of shots".into())))
        }
    }

    struct FixedPermissions {
        camera: PermissionStatus,
        location: PermissionStatus,
    }

    #[async_trait]
    impl PermissionProvider for FixedPermissions {
        async fn request(
            &self,
            capability: Capability,
        ) -> Result<PermissionStatus, PlatformError> {
            Ok(match capability {
                Capability::Camera => self.camera,
                Capability::MediaLibrary => PermissionStatus::Granted,
                Capability::Location => self.location,
            })
        }
    }

    struct FixedLocation {
        candidates: Vec<GeocodedAddress>,
    }

    #[async_trait]
    impl LocationProvider for FixedLocation {
        async fn current_position(&self) -> Result<Coordinates, PlatformError> {
            Ok(Coordinates {
                latitude: 37.0,
                longitude: -122.0,
            })
        }

        async fn reverse_geocode(
            &self,
            _coordinates: Coordinates,
        ) -> Result<Vec<GeocodedAddress>, PlatformError> {
            Ok(self.candidates.clone())
        }
    }

    /// Store whose writes fail until `healthy` is set
    struct FlakyStore {
        inner: SqliteGalleryStore,
        healthy: AtomicBool,
        creates: AtomicUsize,
    }

    #[async_trait]
    impl GalleryStore for FlakyStore {
        async fn ensure_schema(&self) -> Result<(), PhotoGalleryError> {
            self.inner.ensure_schema().await
        }

        async fn create(&self, record: NewPhotoRecord) -> Result<i64, PhotoGalleryError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if self.healthy.load(Ordering::SeqCst) {
                self.inner.create(record).await
            } else {
                Err(PhotoGalleryError::Other("disk full".into()))
            }
        }

        async fn list(&self) -> Result<Vec<PhotoRecord>, PhotoGalleryError> {
            self.inner.list().await
        }

        async fn get(&self, id: i64) -> Result<PhotoRecord, PhotoGalleryError> {
            self.inner.get(id).await
        }

        async fn delete(&self, id: i64) -> Result<(), PhotoGalleryError> {
            self.inner.delete(id).await
        }

        async fn close(&self) -> Result<(), PhotoGalleryError> {
            self.inner.close().await
        }

        fn backend(&self) -> StoreBackend {
            StoreBackend::Sqlite
        }
    }

    async fn memory_store() -> Arc<SqliteGalleryStore> {
        let store = SqliteGalleryStore::open_in_memory().unwrap();
        store.ensure_schema().await.unwrap();
        Arc::new(store)
    }

    fn park() -> GeocodedAddress {
        GeocodedAddress {
            name: Some("Park".into()),
            street: Some("Main St".into()),
            region: Some("CA".into()),
            country: Some("USA".into()),
        }
    }

    async fn start_session(
        camera: Arc<FakeCamera>,
        store: Arc<dyn GalleryStore>,
        location_permission: PermissionStatus,
        candidates: Vec<GeocodedAddress>,
    ) -> CaptureSession {
        let gate = PermissionGate::new(Arc::new(FixedPermissions {
            camera: PermissionStatus::Granted,
            location: location_permission,
        }));
        let resolver = LocationResolver::new(Arc::new(FixedLocation { candidates }));
        CaptureSession::start(&gate, &resolver, camera, store).await
    }

    #[tokio::test]
    async fn test_capture_and_commit_geotagged() {
        let store = memory_store().await;
        let camera = FakeCamera::new(vec![Ok("img1".into())]);
        let mut session =
            start_session(camera, store.clone(), PermissionStatus::Granted, vec![park()]).await;

        let pending = session.capture().await.unwrap();
        assert_eq!(pending.record.address.as_deref(), Some("Park, Main St, CA, USA"));

        let id = session.commit().await.unwrap();
        assert_eq!(id, 1);
        assert_eq!(session.state(), &CaptureState::Idle);

        let photos = store.list().await.unwrap();
        assert_eq!(
            photos,
            vec![PhotoRecord {
                id: 1,
                photo_uri: "img1".into(),
                latitude: Some(37.0),
                longitude: Some(-122.0),
                address: Some("Park, Main St, CA, USA".into()),
            }]
        );
    }

    #[tokio::test]
    async fn test_location_denied_commits_without_geotag() {
        let store = memory_store().await;
        let camera = FakeCamera::new(vec![Ok("img1".into())]);
        let mut session =
            start_session(camera, store.clone(), PermissionStatus::Denied, vec![park()]).await;

        session.capture().await.unwrap();
        session.commit().await.unwrap();

        let photo = &store.list().await.unwrap()[0];
        assert_eq!(photo.latitude, None);
        assert_eq!(photo.longitude, None);
        assert_eq!(photo.address, None);
    }

    #[tokio::test]
    async fn test_no_geocode_result_keeps_coordinates() {
        let store = memory_store().await;
        let camera = FakeCamera::new(vec![Ok("img1".into())]);
        let mut session =
            start_session(camera, store.clone(), PermissionStatus::Granted, vec![]).await;

        session.capture().await.unwrap();
        session.commit().await.unwrap();

        let photo = &store.list().await.unwrap()[0];
        assert_eq!(photo.latitude, Some(37.0));
        assert_eq!(photo.longitude, Some(-122.0));
        assert_eq!(photo.address, None);
    }

    #[tokio::test]
    async fn test_camera_denied_blocks_capture() {
        let gate = PermissionGate::new(Arc::new(FixedPermissions {
            camera: PermissionStatus::Denied,
            location: PermissionStatus::Granted,
        }));
        let resolver = LocationResolver::new(Arc::new(FixedLocation { candidates: vec![] }));
        let camera = FakeCamera::new(vec![Ok("img1".into())]);
        let mut session =
            CaptureSession::start(&gate, &resolver, camera, memory_store().await).await;

        assert!(!session.can_capture());
        assert!(matches!(
            session.capture().await,
            Err(CaptureError::CameraUnavailable)
        ));
        assert_eq!(session.state(), &CaptureState::Idle);
    }

    #[tokio::test]
    async fn test_camera_error_stays_idle() {
        let store = memory_store().await;
        let camera = FakeCamera::new(vec![
            Err(PlatformError::Other("shutter jammed".into())),
            Ok(String::new()),
        ]);
        let mut session =
            start_session(camera, store.clone(), PermissionStatus::Granted, vec![]).await;

        assert!(matches!(
            session.capture().await,
            Err(CaptureError::Capture(_))
        ));
        assert_eq!(session.state(), &CaptureState::Idle);

        // Empty image reference
        assert!(matches!(
            session.capture().await,
            Err(CaptureError::Capture(_))
        ));
        assert!(session.pending().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_capture_rejected_while_pending() {
        let camera = FakeCamera::new(vec![Ok("img1".into()), Ok("img2".into())]);
        let mut session =
            start_session(camera, memory_store().await, PermissionStatus::Denied, vec![]).await;

        session.capture().await.unwrap();
        assert!(matches!(
            session.capture().await,
            Err(CaptureError::PhotoPending)
        ));
        assert_eq!(
            session.pending().map(|p| p.record.photo_uri.as_str()),
            Some("img1")
        );

        let dropped = session.discard().unwrap();
        assert_eq!(dropped.record.photo_uri, "img1");
        let pending = session.capture().await.unwrap();
        assert_eq!(pending.record.photo_uri, "img2");
    }

    #[tokio::test]
    async fn test_discard_skips_persistence() {
        let store = memory_store().await;
        let camera = FakeCamera::new(vec![Ok("img1".into())]);
        let mut session =
            start_session(camera, store.clone(), PermissionStatus::Granted, vec![]).await;

        session.capture().await.unwrap();
        assert!(session.discard().is_some());
        assert!(session.discard().is_none());
        assert_eq!(session.state(), &CaptureState::Idle);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_without_photo() {
        let camera = FakeCamera::new(vec![]);
        let mut session =
            start_session(camera, memory_store().await, PermissionStatus::Granted, vec![]).await;
        assert!(matches!(
            session.commit().await,
            Err(CaptureError::NothingPending)
        ));
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_photo_pending() {
        let store = Arc::new(FlakyStore {
            inner: SqliteGalleryStore::open_in_memory().unwrap(),
            healthy: AtomicBool::new(false),
            creates: AtomicUsize::new(0),
        });
        store.ensure_schema().await.unwrap();
        let camera = FakeCamera::new(vec![Ok("img1".into())]);
        let mut session =
            start_session(camera, store.clone(), PermissionStatus::Granted, vec![park()]).await;

        session.capture().await.unwrap();
        assert!(matches!(
            session.commit().await,
            Err(CaptureError::Persistence(_))
        ));
        assert!(matches!(session.state(), CaptureState::Pending(_)));

        store.healthy.store(true, Ordering::SeqCst);
        assert_eq!(session.commit().await.unwrap(), 1);
        assert_eq!(store.creates.load(Ordering::SeqCst), 2);
        assert_eq!(store.list().await.unwrap()[0].photo_uri, "img1");
    }
}
