use rusqlite::{Connection, Result};

/// Initialize the gallery database schema. Safe to call on every open.
pub fn ensure_photo_schema(conn: &Connection) -> Result<()> {
    // Schema version table for photo gallery
    conn.execute(
        "CREATE TABLE IF NOT EXISTS photo_schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // Check current photo schema version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM photo_schema_version",
            [],
            |row| row.get(0),
        )?;

    if current_version < 1 {
        create_photo_schema_v1(conn)?;
        conn.execute("INSERT INTO photo_schema_version (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Create photo gallery schema version 1
fn create_photo_schema_v1(conn: &Connection) -> Result<()> {
    // AUTOINCREMENT keeps ids of deleted rows from being handed out again
    conn.execute(
        "CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            photoUri TEXT NOT NULL,
            latitude REAL,
            longitude REAL,
            address TEXT
        )",
        [],
    )?;

    Ok(())
}
