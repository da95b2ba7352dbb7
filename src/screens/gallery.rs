use crate::error::AppError;
use crate::services::gallery_service;
use photo_gallery::PhotoRecord;
use std::io::{BufRead, Write};

fn field<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Gallery list, oldest photo first
pub fn render_gallery<W: Write>(photos: &[PhotoRecord], out: &mut W) -> std::io::Result<()> {
    if photos.is_empty() {
        writeln!(out, "No images in the gallery.")?;
        return Ok(());
    }

    for photo in photos {
        writeln!(out, "#{}  {}", photo.id, photo.photo_uri)?;
        writeln!(out, "    Latitude: {}", field(photo.latitude))?;
        writeln!(out, "    Longitude: {}", field(photo.longitude))?;
        writeln!(out, "    Address: {}", field(photo.address.as_deref()))?;
    }
    Ok(())
}

/// Full view of a single photo
pub fn render_photo<W: Write>(photo: &PhotoRecord, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Photo #{}", photo.id)?;
    writeln!(out, "File: {}", photo.photo_uri)?;
    writeln!(out, "Latitude: {}", field(photo.latitude))?;
    writeln!(out, "Longitude: {}", field(photo.longitude))?;
    writeln!(out, "Address: {}", field(photo.address.as_deref()))?;
    Ok(())
}

/// Asks before deleting. Anything but an explicit yes cancels.
pub fn confirm_delete<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> std::io::Result<bool> {
    writeln!(out, "Delete Image")?;
    write!(out, "Are you sure you want to delete this image? [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

pub async fn list<W: Write>(out: &mut W) -> Result<(), AppError> {
    let photos = gallery_service::list_photos().await?;
    render_gallery(&photos, out)?;
    Ok(())
}

pub async fn show<W: Write>(id: i64, out: &mut W) -> Result<(), AppError> {
    let photo = gallery_service::get_photo(id).await?;
    render_photo(&photo, out)?;
    Ok(())
}

/// Deletes a photo after confirmation (skipped with `assume_yes`).
/// Returns whether the photo was deleted.
pub async fn delete<R: BufRead, W: Write>(
    id: i64,
    assume_yes: bool,
    input: &mut R,
    out: &mut W,
) -> Result<bool, AppError> {
    // Fail before prompting when the id is unknown
    let photo = gallery_service::get_photo(id).await?;

    if !assume_yes {
        render_photo(&photo, out)?;
        if !confirm_delete(input, out)? {
            writeln!(out, "Cancelled.")?;
            return Ok(false);
        }
    }

    gallery_service::delete_photo(id).await?;
    writeln!(out, "Deleted photo #{}", id)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, uri: &str) -> PhotoRecord {
        PhotoRecord {
            id,
            photo_uri: uri.to_string(),
            latitude: None,
            longitude: None,
            address: None,
        }
    }

    #[test]
    fn test_render_empty_gallery() {
        let mut out = Vec::new();
        render_gallery(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No images in the gallery.\n");
    }

    #[test]
    fn test_render_gallery_in_order() {
        let mut second = record(2, "img2");
        second.latitude = Some(37.0);
        second.longitude = Some(-122.0);
        second.address = Some("Park, Main St, CA, USA".to_string());

        let mut out = Vec::new();
        render_gallery(&[record(1, "img1"), second], &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        let first_pos = output.find("#1  img1").unwrap();
        let second_pos = output.find("#2  img2").unwrap();
        assert!(first_pos < second_pos);
        assert!(output.contains("    Latitude: 37\n"));
        assert!(output.contains("    Address: Park, Main St, CA, USA\n"));
        assert!(output.contains("    Address: -\n"));
    }

    #[test]
    fn test_confirm_delete_answers() {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false)] {
            let mut input = answer.as_bytes();
            let mut out = Vec::new();
            assert_eq!(confirm_delete(&mut input, &mut out).unwrap(), expected);
        }
    }
}
