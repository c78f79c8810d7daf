//! Metadata synchronization for online media files.
//!
//! [`MetadataSyncJob`] refreshes stored metadata and preview images from the
//! provider, either for a batch of least-recently-checked files or for one
//! file on demand. Failures are isolated per file: a file that cannot be
//! refreshed is logged and reported, and the batch moves on.

use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use twitchmedia_common::{FileId, TWITCH_EXTENSION};
use twitchmedia_db::models::File;

use super::normalizer::MetadataNormalizer;
use super::provider::{OEmbedProvider, ProviderRecord};
use super::store::{FileIndex, MetadataStore};
use crate::images::PreviewImageCache;

/// Outcome of syncing a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Metadata was written.
    Updated,
    /// The provider had no data; stored metadata was left untouched.
    Skipped,
    /// The file could not be processed.
    Failed,
}

/// Result of syncing a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResult {
    pub file_uid: FileId,
    pub status: SyncStatus,
    /// Title stored after the sync, if any.
    pub title: Option<String>,
    /// Preview artifact written by the sync.
    pub preview: Option<PathBuf>,
    pub message: Option<String>,
}

impl SyncResult {
    fn updated(file_uid: FileId, title: Option<String>, preview: Option<PathBuf>) -> Self {
        Self {
            file_uid,
            status: SyncStatus::Updated,
            title,
            preview,
            message: None,
        }
    }

    fn skipped(file_uid: FileId, title: Option<String>) -> Self {
        Self {
            file_uid,
            status: SyncStatus::Skipped,
            title,
            preview: None,
            message: Some("no metadata available".to_string()),
        }
    }

    fn failed(file_uid: FileId, message: impl Into<String>) -> Self {
        Self {
            file_uid,
            status: SyncStatus::Failed,
            title: None,
            preview: None,
            message: Some(message.into()),
        }
    }

    /// True when metadata was written.
    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Updated
    }
}

/// Refreshes online media metadata and previews.
pub struct MetadataSyncJob {
    files: Arc<dyn FileIndex>,
    metadata: Arc<dyn MetadataStore>,
    provider: Arc<dyn OEmbedProvider>,
    normalizer: MetadataNormalizer,
    previews: Arc<PreviewImageCache>,
    extension: String,
    concurrency: usize,
}

impl MetadataSyncJob {
    pub fn new(
        files: Arc<dyn FileIndex>,
        metadata: Arc<dyn MetadataStore>,
        provider: Arc<dyn OEmbedProvider>,
        normalizer: MetadataNormalizer,
        previews: Arc<PreviewImageCache>,
    ) -> Self {
        Self {
            files,
            metadata,
            provider,
            normalizer,
            previews,
            extension: TWITCH_EXTENSION.to_string(),
            concurrency: 1,
        }
    }

    /// Number of provider requests in flight during a batch (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn provider(&self) -> &Arc<dyn OEmbedProvider> {
        &self.provider
    }

    /// Sync up to `limit` candidate files.
    ///
    /// Provider requests may overlap up to the configured concurrency, but
    /// results are applied one file at a time in candidate order.
    pub async fn run(&self, limit: usize) -> Vec<SyncResult> {
        let candidates = match self.files.candidates(&self.extension, limit) {
            Ok(files) => files,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Failed to load candidate files");
                return Vec::new();
            }
        };

        info!(
            count = candidates.len(),
            limit,
            concurrency = self.concurrency,
            "Syncing online media metadata"
        );

        let mut fetched = stream::iter(candidates.into_iter().take(limit))
            .map(|file| async move {
                let record = self.fetch_for(&file).await;
                (file, record)
            })
            .buffered(self.concurrency);

        let mut results = Vec::new();
        while let Some((file, record)) = fetched.next().await {
            results.push(self.apply(&file, record).await);
        }

        let updated = results.iter().filter(|r| r.is_success()).count();
        info!(processed = results.len(), updated, "Metadata sync finished");
        results
    }

    /// Sync a single file by uid.
    pub async fn sync_file(&self, uid: FileId) -> SyncResult {
        let file = match self.files.get_file(uid) {
            Ok(Some(file)) => file,
            Ok(None) => return SyncResult::failed(uid, format!("file {uid} not found")),
            Err(e) => {
                warn!(file = %uid, error = %format!("{e:#}"), "Failed to load file");
                return SyncResult::failed(uid, e.to_string());
            }
        };

        if !file.extension.eq_ignore_ascii_case(&self.extension) {
            return SyncResult::failed(uid, format!("file {uid} is not a {} file", self.extension));
        }

        let record = self.fetch_for(&file).await;
        self.apply(&file, record).await
    }

    /// Apply an already fetched record to `file`.
    pub(crate) async fn sync_with_record(
        &self,
        file: &File,
        record: Option<ProviderRecord>,
    ) -> SyncResult {
        self.apply(file, record).await
    }

    async fn fetch_for(&self, file: &File) -> Option<ProviderRecord> {
        let video_id = file.online_media_id.trim();
        if video_id.is_empty() {
            return None;
        }
        self.provider.fetch(video_id).await
    }

    async fn apply(&self, file: &File, record: Option<ProviderRecord>) -> SyncResult {
        let uid = file.uid;

        if let Err(e) = self.files.mark_checked(uid) {
            warn!(file = %uid, error = %format!("{e:#}"), "Failed to stamp file as checked");
        }

        let video_id = file.online_media_id.trim();
        if video_id.is_empty() {
            warn!(file = %uid, "File has no online media id");
            return SyncResult::failed(uid, "missing online media id");
        }

        let existing_title = match self.metadata.get_metadata(uid) {
            Ok(meta) => meta.and_then(|m| m.title),
            Err(e) => {
                warn!(file = %uid, error = %format!("{e:#}"), "Failed to load metadata");
                return SyncResult::failed(uid, e.to_string());
            }
        };

        let Some(canonical) = self
            .normalizer
            .normalize(record.as_ref(), existing_title.as_deref())
        else {
            debug!(file = %uid, video_id = %video_id, "No metadata from provider, skipping");
            return SyncResult::skipped(uid, existing_title);
        };

        if let Err(e) = self.metadata.update(uid, &canonical.to_update()) {
            warn!(file = %uid, error = %format!("{e:#}"), "Failed to persist metadata");
            return SyncResult::failed(uid, e.to_string());
        }

        let preview = match self
            .previews
            .refresh(uid, video_id, &canonical.thumbnail_url, &file.extension)
            .await
        {
            Ok(path) => path,
            Err(e) => {
                warn!(file = %uid, error = %format!("{e:#}"), "Failed to refresh preview image");
                None
            }
        };

        let title = canonical.title.or(existing_title);
        info!(
            "{}(UID: {}) was processed",
            title.as_deref().unwrap_or(video_id),
            uid
        );
        SyncResult::updated(uid, title, preview)
    }
}
