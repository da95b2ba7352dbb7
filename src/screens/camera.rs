use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::capture_service;
use photo_gallery::{CaptureError, CaptureSession, GalleryStore, PendingPhoto, PhotoGalleryError};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const SAVE_ATTEMPTS: u32 = 3;
const SAVE_RETRY_DELAY: Duration = Duration::from_millis(250);

fn field<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Preview of a photo that has not been saved yet
pub fn render_pending<W: Write>(photo: &PendingPhoto, out: &mut W) -> std::io::Result<()> {
    let record = &photo.record;
    writeln!(out, "Photo: {}", record.photo_uri)?;
    writeln!(out, "Latitude: {}", field(record.latitude))?;
    writeln!(out, "Longitude: {}", field(record.longitude))?;
    writeln!(out, "Address: {}", field(record.address.as_deref()))?;
    Ok(())
}

/// A rejected record fails the same way on every attempt
fn is_retryable(error: &CaptureError) -> bool {
    matches!(error, CaptureError::Persistence(e) if !matches!(e, PhotoGalleryError::Validation(_)))
}

/// Saves the pending photo, retrying a few times. The photo stays pending
/// in the session if every attempt fails.
async fn save_with_retry(session: &mut CaptureSession) -> Result<i64, CaptureError> {
    let mut attempt = 1;
    loop {
        match session.commit().await {
            Ok(id) => return Ok(id),
            Err(e) if is_retryable(&e) && attempt < SAVE_ATTEMPTS => {
                log::warn!("Save attempt {} failed: {}", attempt, e);
                attempt += 1;
                tokio::time::sleep(SAVE_RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Camera screen: take one picture from `image`, show it with its location,
/// then save it to the gallery or discard it.
///
/// Returns the gallery id of the saved photo, `None` when discarded.
pub async fn run<W: Write>(
    config: &AppConfig,
    store: Arc<dyn GalleryStore>,
    image: &Path,
    discard: bool,
    out: &mut W,
) -> Result<Option<i64>, AppError> {
    writeln!(out, "Requesting permissions...")?;
    let mut session = capture_service::start_session(config, image, store).await;

    if !session.can_capture() {
        return Err(CaptureError::CameraUnavailable.into());
    }

    let photo = session.capture().await?;
    render_pending(&photo, out)?;

    if discard {
        // The imported file has no gallery record pointing at it
        if let Some(dropped) = session.discard() {
            if let Err(e) = tokio::fs::remove_file(&dropped.record.photo_uri).await {
                log::warn!(
                    "Could not remove discarded photo {}: {}",
                    dropped.record.photo_uri,
                    e
                );
            }
        }
        writeln!(out, "Photo discarded.")?;
        return Ok(None);
    }

    match save_with_retry(&mut session).await {
        Ok(id) => {
            writeln!(out, "Saved to gallery as #{}", id)?;
            Ok(Some(id))
        }
        Err(e) => {
            // The image file itself is already in the photo directory
            writeln!(
                out,
                "Photo kept at {}; it was not added to the gallery.",
                photo.record.photo_uri
            )?;
            Err(e.into())
        }
    }
}
