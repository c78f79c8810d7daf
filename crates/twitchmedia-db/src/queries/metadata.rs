//! File metadata queries.

use chrono::Utc;
use rusqlite::{named_params, Connection};
use twitchmedia_common::{Error, FileId, Result};

use super::parse_timestamp;
use crate::models::{FileMetadata, MetadataUpdate};

/// Get the stored metadata for a file, if any row exists.
pub fn get_metadata(conn: &Connection, file_uid: FileId) -> Result<Option<FileMetadata>> {
    let result = conn.query_row(
        "SELECT file_uid, title, width, height, author, twitch_thumbnail, updated_at
         FROM file_metadata WHERE file_uid = ?",
        [file_uid.get()],
        |row| {
            Ok(FileMetadata {
                file_uid: Some(FileId::from(row.get::<_, i64>(0)?)),
                title: row.get(1)?,
                width: row.get(2)?,
                height: row.get(3)?,
                author: row.get(4)?,
                twitch_thumbnail: row.get(5)?,
                updated_at: Some(parse_timestamp(&row.get::<_, String>(6)?)),
            })
        },
    );

    match result {
        Ok(meta) => Ok(Some(meta)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Apply a partial metadata update, creating the row when absent.
///
/// Only fields that are `Some` overwrite stored values. An empty update is a
/// no-op and does not touch `updated_at`.
pub fn update_metadata(conn: &Connection, file_uid: FileId, update: &MetadataUpdate) -> Result<()> {
    if update.is_empty() {
        return Ok(());
    }

    conn.execute(
        "INSERT INTO file_metadata (file_uid, title, width, height, author, twitch_thumbnail,
                                    updated_at)
         VALUES (:uid, :title, :width, :height, :author, :thumb, :now)
         ON CONFLICT(file_uid) DO UPDATE SET
             title = COALESCE(:title, title),
             width = COALESCE(:width, width),
             height = COALESCE(:height, height),
             author = COALESCE(:author, author),
             twitch_thumbnail = COALESCE(:thumb, twitch_thumbnail),
             updated_at = :now",
        named_params! {
            ":uid": file_uid.get(),
            ":title": update.title,
            ":width": update.width,
            ":height": update.height,
            ":author": update.author,
            ":thumb": update.twitch_thumbnail,
            ":now": Utc::now().to_rfc3339(),
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(ref err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::not_found(format!("file {}", file_uid))
        }
        other => Error::database(other.to_string()),
    })?;

    Ok(())
}
