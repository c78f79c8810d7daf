//! Turning a pasted Twitch URL into an online media file.

use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};
use twitchmedia_common::paths::mime_type_for_extension;
use twitchmedia_common::{TWITCH_EXTENSION, TWITCH_MIME_TYPE};
use twitchmedia_db::models::{File, NewFile};

use super::resolver::resolve_video_id;
use super::store::FileIndex;
use super::sync::MetadataSyncJob;

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._\- ]+").expect("valid regex"));

const MAX_NAME_LEN: usize = 200;

/// Creates online media files from video URLs.
pub struct MediaImporter {
    files: Arc<dyn FileIndex>,
    sync: Arc<MetadataSyncJob>,
}

impl MediaImporter {
    pub fn new(files: Arc<dyn FileIndex>, sync: Arc<MetadataSyncJob>) -> Self {
        Self { files, sync }
    }

    /// Import `url` into `folder`.
    ///
    /// Returns `Ok(None)` when the URL is not a Twitch video URL. An existing
    /// file for the same video in `folder` is returned as is.
    pub async fn import_url(&self, url: &str, folder: &str) -> Result<Option<File>> {
        let Some(video_id) = resolve_video_id(url).filter(|id| id != "0") else {
            debug!(url, "Not a Twitch video URL");
            return Ok(None);
        };

        if let Some(existing) = self
            .files
            .find_by_online_media_id(folder, TWITCH_EXTENSION, &video_id)
            .context("Failed to look up existing online media file")?
        {
            debug!(file = %existing.uid, video_id = %video_id, "Reusing existing file");
            return Ok(Some(existing));
        }

        let record = self.sync.provider().fetch(&video_id).await;
        let title = record.as_ref().and_then(|r| r.title.as_deref());
        let name = format!("{}.{}", file_stem(title, &video_id), TWITCH_EXTENSION);
        let mime_type = mime_type_for_extension(TWITCH_EXTENSION)
            .unwrap_or_else(|| TWITCH_MIME_TYPE.to_string());

        let file = self
            .files
            .create_file(&NewFile {
                folder,
                name: &name,
                extension: TWITCH_EXTENSION,
                mime_type: &mime_type,
                online_media_id: &video_id,
            })
            .with_context(|| format!("Failed to create online media file {name}"))?;

        info!(file = %file.uid, video_id = %video_id, name = %file.name, "Imported Twitch video");

        self.sync.sync_with_record(&file, record).await;
        Ok(Some(file))
    }
}

/// File name stem from the video title, falling back to the video id.
fn file_stem(title: Option<&str>, video_id: &str) -> String {
    let cleaned = title
        .map(|t| UNSAFE_NAME_CHARS.replace_all(t, "_"))
        .map(|t| t.trim().trim_matches('.').to_string())
        .unwrap_or_default();

    if cleaned.is_empty() {
        return video_id.to_string();
    }
    cleaned.chars().take(MAX_NAME_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_uses_sanitized_title() {
        assert_eq!(file_stem(Some("Speedrun: 100%/any"), "1"), "Speedrun_ 100_any");
        assert_eq!(file_stem(Some("  "), "42"), "42");
        assert_eq!(file_stem(Some("..."), "42"), "42");
        assert_eq!(file_stem(None, "42"), "42");
    }

    #[test]
    fn stem_is_bounded() {
        let long = "a".repeat(500);
        assert_eq!(file_stem(Some(&long), "1").len(), MAX_NAME_LEN);
    }
}
