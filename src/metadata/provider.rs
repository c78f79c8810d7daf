//! Trait definition and types for oEmbed-style metadata providers.
//!
//! This module defines the [`OEmbedProvider`] trait that online media helpers
//! implement, along with the raw record a provider returns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Provider record
// ---------------------------------------------------------------------------

/// A raw record returned by a provider for a single video.
///
/// Only the fields the pipeline reads are lifted out; the full object is kept
/// in `raw_fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Video title, if present.
    pub title: Option<String>,
    /// Thumbnail URL, possibly containing `%{width}` / `%{height}` placeholders.
    pub thumbnail_url: Option<String>,
    /// Every field of the upstream object.
    pub raw_fields: Map<String, Value>,
}

impl ProviderRecord {
    /// Build a record from an upstream JSON object.
    pub fn from_object(raw_fields: Map<String, Value>) -> Self {
        let string_field = |key: &str| {
            raw_fields
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            title: string_field("title"),
            thumbnail_url: string_field("thumbnail_url"),
            raw_fields,
        }
    }

    /// A string field of the raw object.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.raw_fields.get(key).and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that online media metadata providers implement.
///
/// Providers degrade every failure to `None`: a missing record means "no data
/// this time", never an error that could abort a batch.
#[async_trait]
pub trait OEmbedProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"twitch"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider has credentials to make requests.
    fn is_available(&self) -> bool;

    /// URL queried for `video_id`.
    fn oembed_url(&self, video_id: &str) -> String;

    /// Fetch the record for `video_id`, or `None` when none is available.
    async fn fetch(&self, video_id: &str) -> Option<ProviderRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_lifts_known_fields() {
        let Value::Object(obj) = json!({
            "title": "Speedrun",
            "thumbnail_url": "https://static-cdn.jtvnw.net/x-%{width}x%{height}.jpg",
            "user_name": "runner",
            "view_count": 12
        }) else {
            unreachable!()
        };

        let record = ProviderRecord::from_object(obj);
        assert_eq!(record.title.as_deref(), Some("Speedrun"));
        assert!(record.thumbnail_url.unwrap().contains("%{width}"));
        assert_eq!(record.raw_fields["view_count"], 12);
    }

    #[test]
    fn record_ignores_non_string_fields() {
        let Value::Object(obj) = json!({ "title": 5, "user_name": null }) else {
            unreachable!()
        };

        let record = ProviderRecord::from_object(obj);
        assert_eq!(record.title, None);
        assert_eq!(record.field_str("user_name"), None);
    }
}
