//! Processed file queries.
//!
//! Derived files (preview renditions and the like) are tracked per original
//! file so they can be invalidated after a metadata refresh.

use chrono::Utc;
use rusqlite::{params, Connection};
use twitchmedia_common::{Error, FileId, ProcessedFileId, Result};

use super::parse_timestamp;
use crate::models::ProcessedFile;

/// Record a derived file for `original`.
pub fn insert_processed_file(
    conn: &Connection,
    original: FileId,
    task_type: &str,
    path: &str,
) -> Result<ProcessedFile> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO processed_files (original_file_uid, task_type, path, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![original.get(), task_type, path, now.to_rfc3339()],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(ProcessedFile {
        id: ProcessedFileId::from(conn.last_insert_rowid()),
        original_file_uid: original,
        task_type: task_type.to_string(),
        path: path.to_string(),
        created_at: now,
    })
}

/// List all derived files of `original`, oldest first.
pub fn find_all_by_original_file(
    conn: &Connection,
    original: FileId,
) -> Result<Vec<ProcessedFile>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, original_file_uid, task_type, path, created_at
             FROM processed_files WHERE original_file_uid = ? ORDER BY id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map([original.get()], |row| {
            Ok(ProcessedFile {
                id: ProcessedFileId::from(row.get::<_, i64>(0)?),
                original_file_uid: FileId::from(row.get::<_, i64>(1)?),
                task_type: row.get(2)?,
                path: row.get(3)?,
                created_at: parse_timestamp(&row.get::<_, String>(4)?),
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows)
}

/// Delete a single derived file record.
pub fn delete_processed_file(conn: &Connection, id: ProcessedFileId) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM processed_files WHERE id = ?", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewFile;
    use crate::pool::{get_conn, init_memory_pool};
    use crate::queries::files::create_file;

    fn setup_file(conn: &Connection, id: &str) -> FileId {
        create_file(
            conn,
            &NewFile {
                folder: "/",
                name: "v.twitch",
                extension: "twitch",
                mime_type: "video/twitch",
                online_media_id: id,
            },
        )
        .unwrap()
        .uid
    }

    #[test]
    fn test_insert_and_list() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let a = setup_file(&conn, "1");
        let b = setup_file(&conn, "2");

        insert_processed_file(&conn, a, "Image.CropScaleMask", "/tmp/a1.jpg").unwrap();
        insert_processed_file(&conn, a, "Image.Preview", "/tmp/a2.jpg").unwrap();
        insert_processed_file(&conn, b, "Image.Preview", "/tmp/b.jpg").unwrap();

        let list = find_all_by_original_file(&conn, a).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].path, "/tmp/a1.jpg");
        assert_eq!(list[1].task_type, "Image.Preview");
    }

    #[test]
    fn test_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let a = setup_file(&conn, "1");

        let pf = insert_processed_file(&conn, a, "Image.Preview", "/tmp/a.jpg").unwrap();
        assert!(delete_processed_file(&conn, pf.id).unwrap());
        assert!(!delete_processed_file(&conn, pf.id).unwrap());
        assert!(find_all_by_original_file(&conn, a).unwrap().is_empty());
    }

    #[test]
    fn test_cascade_on_file_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let a = setup_file(&conn, "1");
        insert_processed_file(&conn, a, "Image.Preview", "/tmp/a.jpg").unwrap();

        conn.execute("DELETE FROM files WHERE uid = ?", [a.get()])
            .unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM processed_files", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
