//! Rust models matching the database schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use twitchmedia_common::{FileId, ProcessedFileId};

/// An online media file record.
///
/// The file has no binary content; `online_media_id` holds the provider's
/// opaque id (for Twitch, the numeric video id).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct File {
    pub uid: FileId,
    pub folder: String,
    pub name: String,
    pub identifier: String,
    pub extension: String,
    pub mime_type: String,
    pub online_media_id: String,
    pub missing: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFile<'a> {
    pub folder: &'a str,
    pub name: &'a str,
    pub extension: &'a str,
    pub mime_type: &'a str,
    pub online_media_id: &'a str,
}

/// Stored metadata for a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileMetadata {
    pub file_uid: Option<FileId>,
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub author: Option<String>,
    pub twitch_thumbnail: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A partial metadata update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataUpdate {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub author: Option<String>,
    pub twitch_thumbnail: Option<String>,
}

impl MetadataUpdate {
    /// True when the update would not change any column.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.author.is_none()
            && self.twitch_thumbnail.is_none()
    }
}

/// A processed (derived) file generated from an original, such as a resized
/// preview image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessedFile {
    pub id: ProcessedFileId,
    pub original_file_uid: FileId,
    pub task_type: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}
