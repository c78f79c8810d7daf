//! Mapping of provider records onto the metadata fields stored per file.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use twitchmedia_db::models::MetadataUpdate;

use super::provider::ProviderRecord;
use crate::config::TwitchConfig;

/// Width stored when none is configured.
pub const DEFAULT_WIDTH: u32 = 800;
/// Height stored when none is configured.
pub const DEFAULT_HEIGHT: u32 = 450;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\{(width|height)\}").expect("valid placeholder regex"));

/// Metadata ready to be persisted for one video file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMetadata {
    pub width: u32,
    pub height: u32,
    /// `None` when the stored title must be left alone.
    pub title: Option<String>,
    pub thumbnail_url: String,
    pub author: Option<String>,
}

impl CanonicalMetadata {
    /// The partial update that writes these values.
    pub fn to_update(&self) -> MetadataUpdate {
        MetadataUpdate {
            title: self.title.clone(),
            width: Some(self.width),
            height: Some(self.height),
            author: self.author.clone(),
            twitch_thumbnail: Some(self.thumbnail_url.clone()),
        }
    }
}

/// Turns provider records into [`CanonicalMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataNormalizer {
    width: u32,
    height: u32,
}

impl Default for MetadataNormalizer {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl MetadataNormalizer {
    /// Missing or zero dimensions fall back to 800x450.
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width: width.filter(|w| *w > 0).unwrap_or(DEFAULT_WIDTH),
            height: height.filter(|h| *h > 0).unwrap_or(DEFAULT_HEIGHT),
        }
    }

    pub fn from_config(config: &TwitchConfig) -> Self {
        Self::new(Some(config.width), Some(config.height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Normalize a provider record.
    ///
    /// Returns `None` when there is no record, meaning nothing should be
    /// written. The record's title is only used when `existing_title` is
    /// absent or blank, so a manually set title survives a refresh.
    pub fn normalize(
        &self,
        record: Option<&ProviderRecord>,
        existing_title: Option<&str>,
    ) -> Option<CanonicalMetadata> {
        let record = record?;

        let keep_existing = existing_title.is_some_and(|t| !t.trim().is_empty());
        let title = if keep_existing {
            None
        } else {
            record.title.clone().filter(|t| !t.is_empty())
        };

        let thumbnail_url = record
            .thumbnail_url
            .as_deref()
            .map(|url| self.substitute_placeholders(url))
            .unwrap_or_default();

        let author = record
            .field_str("user_name")
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Some(CanonicalMetadata {
            width: self.width,
            height: self.height,
            title,
            thumbnail_url,
            author,
        })
    }

    /// Replace `%{width}` and `%{height}` in one pass.
    fn substitute_placeholders(&self, url: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(url, |caps: &Captures| match &caps[1] {
                "width" => self.width.to_string(),
                _ => self.height.to_string(),
            })
            .into_owned()
    }
}
