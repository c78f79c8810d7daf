//! File index queries.
//!
//! Candidate selection for metadata refreshes, lookups by uid and by online
//! media id, creation of online media files, and check bookkeeping.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use twitchmedia_common::{Error, FileId, Result};

use super::parse_timestamp;
use crate::models::{File, NewFile};

const FILE_COLUMNS: &str = "uid, folder, name, identifier, extension, mime_type, online_media_id,
                            missing, last_checked_at, created_at";

/// Parse a file from a database row selected with [`FILE_COLUMNS`].
fn parse_file_row(row: &rusqlite::Row) -> rusqlite::Result<File> {
    Ok(File {
        uid: FileId::from(row.get::<_, i64>(0)?),
        folder: row.get(1)?,
        name: row.get(2)?,
        identifier: row.get(3)?,
        extension: row.get(4)?,
        mime_type: row.get(5)?,
        online_media_id: row.get(6)?,
        missing: row.get::<_, i32>(7)? != 0,
        last_checked_at: row
            .get::<_, Option<String>>(8)?
            .map(|s| parse_timestamp(&s)),
        created_at: parse_timestamp(&row.get::<_, String>(9)?),
    })
}

/// Get up to `limit` non-missing files with the given extension.
///
/// Files never checked come first, then the least recently checked; ties are
/// broken by uid so the order is stable.
pub fn get_videos_by_file_extension(
    conn: &Connection,
    extension: &str,
    limit: usize,
) -> Result<Vec<File>> {
    let sql = format!(
        "SELECT {FILE_COLUMNS}
         FROM files
         WHERE extension = ?1 AND missing = 0
         ORDER BY last_checked_at IS NOT NULL, last_checked_at ASC, uid ASC
         LIMIT ?2"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let files = stmt
        .query_map(params![extension, limit as i64], parse_file_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(files)
}

/// Get a file by uid.
pub fn get_file(conn: &Connection, uid: FileId) -> Result<Option<File>> {
    let sql = format!("SELECT {FILE_COLUMNS} FROM files WHERE uid = ?");
    match conn.query_row(&sql, [uid.get()], parse_file_row) {
        Ok(file) => Ok(Some(file)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Find a file in `folder` carrying the given online media id and extension.
pub fn find_by_online_media_id(
    conn: &Connection,
    folder: &str,
    extension: &str,
    online_media_id: &str,
) -> Result<Option<File>> {
    let sql = format!(
        "SELECT {FILE_COLUMNS} FROM files
         WHERE folder = ?1 AND extension = ?2 AND online_media_id = ?3
         ORDER BY uid ASC
         LIMIT 1"
    );
    match conn.query_row(
        &sql,
        params![folder, extension, online_media_id],
        parse_file_row,
    ) {
        Ok(file) => Ok(Some(file)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Create a new online media file record.
pub fn create_file(conn: &Connection, new: &NewFile<'_>) -> Result<File> {
    let now = Utc::now();
    let identifier = join_identifier(new.folder, new.name);

    conn.execute(
        "INSERT INTO files (folder, name, identifier, extension, mime_type, online_media_id,
                            missing, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
        params![
            new.folder,
            new.name,
            identifier,
            new.extension,
            new.mime_type,
            new.online_media_id,
            now.to_rfc3339(),
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(File {
        uid: FileId::from(conn.last_insert_rowid()),
        folder: new.folder.to_string(),
        name: new.name.to_string(),
        identifier,
        extension: new.extension.to_string(),
        mime_type: new.mime_type.to_string(),
        online_media_id: new.online_media_id.to_string(),
        missing: false,
        last_checked_at: None,
        created_at: now,
    })
}

/// Record that a file was looked at by a metadata refresh.
pub fn mark_checked(conn: &Connection, uid: FileId, at: DateTime<Utc>) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE files SET last_checked_at = ?1 WHERE uid = ?2",
            params![at.to_rfc3339(), uid.get()],
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if changed == 0 {
        return Err(Error::not_found(format!("file {}", uid)));
    }
    Ok(())
}

/// Flag a file as missing (or present again).
pub fn set_missing(conn: &Connection, uid: FileId, missing: bool) -> Result<()> {
    conn.execute(
        "UPDATE files SET missing = ?1 WHERE uid = ?2",
        params![missing as i32, uid.get()],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

fn join_identifier(folder: &str, name: &str) -> String {
    format!("{}/{}", folder.trim_end_matches('/'), name)
}
