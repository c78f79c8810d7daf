//! Scaled renditions of cached preview images.
//!
//! A rendition is a processed derivative of an online media file: it is
//! recorded in the derived-file store so that a metadata refresh can
//! invalidate it.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::ImageFormat;
use twitchmedia_common::FileId;

use crate::metadata::store::DerivedFileStore;

/// Task type recorded for preview renditions.
pub const PREVIEW_TASK: &str = "Image.Preview";

/// Generates and tracks scaled preview renditions.
pub struct RenditionService {
    output_dir: PathBuf,
    derived: Arc<dyn DerivedFileStore>,
}

impl RenditionService {
    /// Renditions are written under `output_dir`.
    pub fn new(output_dir: PathBuf, derived: Arc<dyn DerivedFileStore>) -> Self {
        Self {
            output_dir,
            derived,
        }
    }

    /// Path of the rendition of `source` scaled to `max_width`.
    pub fn rendition_path(&self, source: &Path, max_width: u32) -> PathBuf {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("preview");
        self.output_dir.join(format!("{}_{}w.jpg", stem, max_width))
    }

    /// Return a JPEG rendition of `source` no wider than `max_width`.
    ///
    /// An existing rendition recorded for `file_id` is reused; otherwise one is
    /// generated and recorded. Images narrower than `max_width` are re-encoded
    /// at their original size.
    pub fn rendition(&self, file_id: FileId, source: &Path, max_width: u32) -> Result<PathBuf> {
        let target = self.rendition_path(source, max_width);
        let target_str = target.to_string_lossy();

        let known = self
            .derived
            .list_for(file_id)?
            .into_iter()
            .any(|p| p.task_type == PREVIEW_TASK && p.path == target_str);
        if known && target.exists() {
            return Ok(target);
        }

        let data = std::fs::read(source)
            .with_context(|| format!("Failed to read preview image: {}", source.display()))?;
        let img = image::load_from_memory(&data).context("Failed to decode preview image")?;

        let scaled = if img.width() > max_width {
            img.resize(max_width, u32::MAX, FilterType::Lanczos3)
        } else {
            img
        };

        let mut buf = Cursor::new(Vec::new());
        scaled
            .to_rgb8()
            .write_to(&mut buf, ImageFormat::Jpeg)
            .context("Failed to encode rendition as JPEG")?;

        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create rendition directory: {}",
                self.output_dir.display()
            )
        })?;
        std::fs::write(&target, buf.into_inner())
            .with_context(|| format!("Failed to write rendition: {}", target.display()))?;

        if !known {
            self.derived.record(file_id, PREVIEW_TASK, &target)?;
        }
        tracing::debug!(file = %file_id, path = %target.display(), "Generated preview rendition");

        Ok(target)
    }
}
