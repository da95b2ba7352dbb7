use super::{not_found, GalleryStore};
use crate::error::PhotoGalleryError;
use crate::models::{NewPhotoRecord, PhotoRecord, StoreBackend};
use crate::schema::ensure_photo_schema;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tokio::sync::Mutex;

/// Gallery stored in the `photos` table of a SQLite database
pub struct SqliteGalleryStore {
    conn: Mutex<Option<Connection>>,
}

impl SqliteGalleryStore {
    pub fn open(path: &Path) -> Result<Self, PhotoGalleryError> {
        let conn = Connection::open(path)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, PhotoGalleryError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }
}

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<PhotoRecord> {
    Ok(PhotoRecord {
        id: row.get(0)?,
        photo_uri: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        address: row.get(4)?,
    })
}

fn insert_photo(conn: &Connection, record: &NewPhotoRecord) -> Result<i64, PhotoGalleryError> {
    conn.execute(
        "INSERT INTO photos (photoUri, latitude, longitude, address) VALUES (?1, ?2, ?3, ?4)",
        params![
            &record.photo_uri,
            record.latitude,
            record.longitude,
            &record.address,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

// Tables created before the schema was versioned allow a NULL photoUri;
// such rows have no image and are left out.
fn list_photos(conn: &Connection) -> Result<Vec<PhotoRecord>, PhotoGalleryError> {
    let mut stmt = conn.prepare(
        "SELECT id, photoUri, latitude, longitude, address
         FROM photos
         WHERE photoUri IS NOT NULL
         ORDER BY id",
    )?;

    let rows = stmt.query_map([], photo_from_row)?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn get_photo(conn: &Connection, id: i64) -> Result<PhotoRecord, PhotoGalleryError> {
    conn.query_row(
        "SELECT id, photoUri, latitude, longitude, address
         FROM photos
         WHERE id = ?1 AND photoUri IS NOT NULL",
        params![id],
        photo_from_row,
    )
    .optional()?
    .ok_or_else(|| not_found(id))
}

#[async_trait]
impl GalleryStore for SqliteGalleryStore {
    async fn ensure_schema(&self) -> Result<(), PhotoGalleryError> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(PhotoGalleryError::Closed)?;
        ensure_photo_schema(conn)?;
        Ok(())
    }

    async fn create(&self, record: NewPhotoRecord) -> Result<i64, PhotoGalleryError> {
        record.validate()?;

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(PhotoGalleryError::Closed)?;
        let id = insert_photo(conn, &record)?;

        log::debug!("Photo {} stored: {}", id, record.photo_uri);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<PhotoRecord>, PhotoGalleryError> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(PhotoGalleryError::Closed)?;
        list_photos(conn)
    }

    async fn get(&self, id: i64) -> Result<PhotoRecord, PhotoGalleryError> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(PhotoGalleryError::Closed)?;
        get_photo(conn, id)
    }

    async fn delete(&self, id: i64) -> Result<(), PhotoGalleryError> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(PhotoGalleryError::Closed)?;

        let rows = conn.execute("DELETE FROM photos WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(not_found(id));
        }

        log::debug!("Photo {} deleted", id);
        Ok(())
    }

    async fn close(&self) -> Result<(), PhotoGalleryError> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| PhotoGalleryError::DatabaseError(e))?;
            log::info!("SQLite gallery store closed");
        }
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Sqlite
    }
}
