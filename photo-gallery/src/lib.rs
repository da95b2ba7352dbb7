//! # Photo Gallery
//!
//! Geotagged photo capture and a persistent local gallery.
//!
//! This crate provides the cross-platform core of the camera app:
//! - Permission acquisition for camera, media library and location
//! - Location resolution with reverse geocoding and graceful degradation
//! - A capture session that holds one pending photo until it is committed
//! - Gallery storage behind one [`GalleryStore`] trait, backed either by
//!   SQLite or by a single key-value JSON blob
//!
//! ## Platform Separation
//!
//! Camera, location and permission prompts are platform services. They are
//! consumed through the [`CameraDevice`], [`LocationProvider`] and
//! [`PermissionProvider`] traits; implementations live in the application crate.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_gallery::{CaptureSession, LocationResolver, PermissionGate, SqliteGalleryStore};
//!
//! let store = Arc::new(SqliteGalleryStore::open(Path::new("gallery.db"))?);
//! let mut session = CaptureSession::start(
//!     &PermissionGate::new(permissions),
//!     &LocationResolver::new(locator),
//!     camera,
//!     store.clone(),
//! )
//! .await;
//!
//! session.capture().await?;
//! let id = session.commit().await?;
//! ```

pub mod capture;
pub mod error;
pub mod import;
pub mod location;
pub mod models;
pub mod permission;
pub mod platform;
pub mod schema;
pub mod store;

pub use capture::{CaptureError, CaptureSession, CaptureState, PendingPhoto};
pub use error::PhotoGalleryError;
pub use import::{import_photo, ImportError};
pub use location::{Coordinates, GeocodedAddress, LocationFix, LocationResolver};
pub use models::{NewPhotoRecord, PhotoGalleryConfig, PhotoRecord, StoreBackend};
pub use permission::{Capability, PermissionGate, PermissionStatus, Permissions};
pub use platform::{CameraDevice, LocationProvider, PermissionProvider, PlatformError};
pub use schema::ensure_photo_schema;
pub use store::{open_store, BlobGalleryStore, GalleryStore, SqliteGalleryStore};
