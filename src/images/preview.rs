//! Cached preview images for online media files.
//!
//! One artifact per video id lives at `<temp_dir>/<ext>_<md5(video_id)>.jpg`.
//! Refreshing an artifact first invalidates every processed derivative of the
//! owning file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use md5::{Digest, Md5};
use tracing::{debug, info};
use twitchmedia_common::FileId;

use crate::metadata::store::DerivedFileStore;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads and caches preview images.
pub struct PreviewImageCache {
    temp_dir: PathBuf,
    client: reqwest::Client,
    derived: Arc<dyn DerivedFileStore>,
}

impl PreviewImageCache {
    /// Create a cache rooted at `temp_dir` with the default download timeout.
    pub fn new(temp_dir: PathBuf, derived: Arc<dyn DerivedFileStore>) -> Result<Self> {
        Self::with_timeout(temp_dir, derived, DOWNLOAD_TIMEOUT)
    }

    pub fn with_timeout(
        temp_dir: PathBuf,
        derived: Arc<dyn DerivedFileStore>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            temp_dir,
            client,
            derived,
        })
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Deterministic artifact path for a video id.
    pub fn cache_path(&self, extension: &str, video_id: &str) -> PathBuf {
        self.temp_dir
            .join(format!("{}_{}.jpg", extension, md5_hex(video_id)))
    }

    /// Replace the cached preview of a file after a metadata refresh.
    ///
    /// Processed derivatives of `file_id` are deleted before anything else,
    /// then any existing artifact is removed. With an empty `thumbnail_url`
    /// no new artifact is written and `Ok(None)` is returned.
    pub async fn refresh(
        &self,
        file_id: FileId,
        video_id: &str,
        thumbnail_url: &str,
        extension: &str,
    ) -> Result<Option<PathBuf>> {
        self.derived
            .delete_all_for(file_id)
            .with_context(|| format!("Failed to invalidate processed files of {file_id}"))?;

        let path = self.cache_path(extension, video_id);
        remove_if_exists(&path)?;

        if thumbnail_url.is_empty() {
            debug!(file = %file_id, "No thumbnail URL, preview left empty");
            return Ok(None);
        }

        self.download_to(thumbnail_url, &path).await?;
        info!(file = %file_id, path = %path.display(), "Refreshed preview image");
        Ok(Some(path))
    }

    /// Return the cached preview, downloading it if it is not on disk yet.
    ///
    /// Unlike [`refresh`](Self::refresh) this never touches derivatives.
    pub async fn preview_image(
        &self,
        video_id: &str,
        thumbnail_url: &str,
        extension: &str,
    ) -> Result<Option<PathBuf>> {
        let path = self.cache_path(extension, video_id);
        if path.exists() {
            return Ok(Some(path));
        }
        if thumbnail_url.is_empty() {
            return Ok(None);
        }

        self.download_to(thumbnail_url, &path).await?;
        Ok(Some(path))
    }

    async fn download_to(&self, url: &str, path: &Path) -> Result<()> {
        let data = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download image from {}", url))?
            .error_for_status()
            .with_context(|| format!("HTTP error downloading image from {}", url))?
            .bytes()
            .await
            .with_context(|| format!("Failed to read image bytes from {}", url))?;

        image::guess_format(&data)
            .with_context(|| format!("Downloaded data from {} is not an image", url))?;

        write_artifact(path, &data)
    }
}

/// Lowercase hex md5 of a string.
pub fn md5_hex(value: &str) -> String {
    hex::encode(Md5::digest(value.as_bytes()))
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to remove cached preview: {}", path.display()))
        }
    }
}

fn write_artifact(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
    }

    std::fs::write(path, data)
        .with_context(|| format!("Failed to write preview image: {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use twitchmedia_db::models::ProcessedFile;

    /// Records calls; never owns any derivatives.
    #[derive(Default)]
    struct RecordingDerived {
        deletes: Mutex<Vec<FileId>>,
    }

    impl DerivedFileStore for RecordingDerived {
        fn delete_all_for(&self, uid: FileId) -> Result<usize> {
            self.deletes.lock().push(uid);
            Ok(0)
        }

        fn list_for(&self, _uid: FileId) -> Result<Vec<ProcessedFile>> {
            Ok(Vec::new())
        }

        fn record(&self, _uid: FileId, _task: &str, _path: &Path) -> Result<ProcessedFile> {
            anyhow::bail!("not supported")
        }
    }

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex("123456"), "e10adc3949ba59abbe56e057f20f883e");
    }

    #[test]
    fn test_cache_path_is_stable() {
        let derived = Arc::new(RecordingDerived::default());
        let cache = PreviewImageCache::new(PathBuf::from("/tmp/online_media"), derived).unwrap();

        let a = cache.cache_path("twitch", "123456");
        let b = cache.cache_path("twitch", "123456");
        assert_eq!(a, b);
        assert_eq!(
            a,
            PathBuf::from("/tmp/online_media/twitch_e10adc3949ba59abbe56e057f20f883e.jpg")
        );
    }

    #[tokio::test]
    async fn test_refresh_with_empty_url_invalidates_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let derived = Arc::new(RecordingDerived::default());
        let cache = PreviewImageCache::new(dir.path().to_path_buf(), derived.clone()).unwrap();

        let stale = cache.cache_path("twitch", "42");
        std::fs::write(&stale, b"old").unwrap();

        let result = cache.refresh(FileId::from(7), "42", "", "twitch").await.unwrap();
        assert_eq!(result, None);
        assert!(!stale.exists());
        assert_eq!(*derived.deletes.lock(), vec![FileId::from(7)]);
    }

    #[tokio::test]
    async fn test_refresh_download_failure_still_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        let derived = Arc::new(RecordingDerived::default());
        let cache = PreviewImageCache::with_timeout(
            dir.path().to_path_buf(),
            derived.clone(),
            Duration::from_secs(2),
        )
        .unwrap();

        let result = cache
            .refresh(FileId::from(1), "1", "http://127.0.0.1:1/thumb.jpg", "twitch")
            .await;
        assert!(result.is_err());
        assert_eq!(derived.deletes.lock().len(), 1);
        assert!(!cache.cache_path("twitch", "1").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_artifact_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("a.jpg");
        write_artifact(&path, b"data").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
