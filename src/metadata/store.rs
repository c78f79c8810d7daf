//! Storage seams used by the sync pipeline, and their SQLite implementation.
//!
//! The pipeline only talks to these traits; [`DbStore`] backs all three with
//! the `twitchmedia_db` connection pool.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use twitchmedia_common::FileId;
use twitchmedia_db::models::{File, FileMetadata, MetadataUpdate, NewFile, ProcessedFile};
use twitchmedia_db::pool::{get_conn, DbPool};
use twitchmedia_db::queries::{files, metadata, processed_files};

/// The index of online media files.
pub trait FileIndex: Send + Sync {
    /// Up to `limit` non-missing files with `extension`, least recently checked first.
    fn candidates(&self, extension: &str, limit: usize) -> Result<Vec<File>>;

    fn get_file(&self, uid: FileId) -> Result<Option<File>>;

    fn find_by_online_media_id(
        &self,
        folder: &str,
        extension: &str,
        online_media_id: &str,
    ) -> Result<Option<File>>;

    fn create_file(&self, new: &NewFile<'_>) -> Result<File>;

    /// Stamp the file as checked now.
    fn mark_checked(&self, uid: FileId) -> Result<()>;
}

/// Per-file metadata storage.
pub trait MetadataStore: Send + Sync {
    fn get_metadata(&self, uid: FileId) -> Result<Option<FileMetadata>>;

    /// Write the `Some` fields of `update`, leaving the rest untouched.
    fn update(&self, uid: FileId, update: &MetadataUpdate) -> Result<()>;
}

/// Derived (processed) files generated from an original file.
pub trait DerivedFileStore: Send + Sync {
    /// Delete every derived file of `uid`, records and files on disk.
    ///
    /// Returns the number of records removed.
    fn delete_all_for(&self, uid: FileId) -> Result<usize>;

    fn list_for(&self, uid: FileId) -> Result<Vec<ProcessedFile>>;

    /// Record a derived file written at `path`.
    fn record(&self, uid: FileId, task_type: &str, path: &Path) -> Result<ProcessedFile>;
}

/// SQLite-backed implementation of all store traits.
#[derive(Clone)]
pub struct DbStore {
    pool: DbPool,
}

impl DbStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl FileIndex for DbStore {
    fn candidates(&self, extension: &str, limit: usize) -> Result<Vec<File>> {
        let conn = get_conn(&self.pool)?;
        files::get_videos_by_file_extension(&conn, extension, limit)
            .context("Failed to load candidate files")
    }

    fn get_file(&self, uid: FileId) -> Result<Option<File>> {
        let conn = get_conn(&self.pool)?;
        files::get_file(&conn, uid).with_context(|| format!("Failed to load file {uid}"))
    }

    fn find_by_online_media_id(
        &self,
        folder: &str,
        extension: &str,
        online_media_id: &str,
    ) -> Result<Option<File>> {
        let conn = get_conn(&self.pool)?;
        files::find_by_online_media_id(&conn, folder, extension, online_media_id)
            .context("Failed to look up file by online media id")
    }

    fn create_file(&self, new: &NewFile<'_>) -> Result<File> {
        let conn = get_conn(&self.pool)?;
        files::create_file(&conn, new).context("Failed to create file record")
    }

    fn mark_checked(&self, uid: FileId) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        files::mark_checked(&conn, uid, Utc::now())
            .with_context(|| format!("Failed to mark file {uid} as checked"))
    }
}

impl MetadataStore for DbStore {
    fn get_metadata(&self, uid: FileId) -> Result<Option<FileMetadata>> {
        let conn = get_conn(&self.pool)?;
        metadata::get_metadata(&conn, uid)
            .with_context(|| format!("Failed to load metadata for file {uid}"))
    }

    fn update(&self, uid: FileId, update: &MetadataUpdate) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        metadata::update_metadata(&conn, uid, update)
            .with_context(|| format!("Failed to update metadata for file {uid}"))
    }
}

impl DerivedFileStore for DbStore {
    fn delete_all_for(&self, uid: FileId) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        let derived = processed_files::find_all_by_original_file(&conn, uid)
            .with_context(|| format!("Failed to list processed files of {uid}"))?;

        let mut deleted = 0;
        for processed in derived {
            match std::fs::remove_file(&processed.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to delete processed file {}", processed.path)
                    })
                }
            }
            if processed_files::delete_processed_file(&conn, processed.id)? {
                deleted += 1;
            }
        }

        if deleted > 0 {
            tracing::debug!(file = %uid, deleted, "Deleted processed files");
        }
        Ok(deleted)
    }

    fn list_for(&self, uid: FileId) -> Result<Vec<ProcessedFile>> {
        let conn = get_conn(&self.pool)?;
        processed_files::find_all_by_original_file(&conn, uid)
            .with_context(|| format!("Failed to list processed files of {uid}"))
    }

    fn record(&self, uid: FileId, task_type: &str, path: &Path) -> Result<ProcessedFile> {
        let conn = get_conn(&self.pool)?;
        processed_files::insert_processed_file(&conn, uid, task_type, &path.to_string_lossy())
            .with_context(|| format!("Failed to record processed file for {uid}"))
    }
}
