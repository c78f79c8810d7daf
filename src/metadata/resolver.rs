//! Video id extraction from Twitch watch URLs.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static VIDEO_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)twitch\.tv/videos/([0-9]*)").expect("valid video url regex"));

/// A Twitch video id together with the URL it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    pub source_url: String,
    pub video_id: String,
}

impl VideoReference {
    /// Build a reference from a watch URL, or `None` if the URL carries no id.
    pub fn from_url(url: &str) -> Option<Self> {
        resolve_video_id(url).map(|video_id| Self {
            source_url: url.to_string(),
            video_id,
        })
    }

    /// Canonical public watch URL for this video.
    pub fn public_url(&self) -> String {
        public_url(&self.video_id)
    }
}

/// Extract the numeric video id from a `twitch.tv/videos/<digits>` URL.
///
/// Matching is case-insensitive. A URL without the pattern, or with the
/// pattern but no digits after it, yields `None`.
///
/// # Examples
///
/// ```
/// use twitchmedia::metadata::resolve_video_id;
///
/// assert_eq!(resolve_video_id("https://www.twitch.tv/videos/123456").as_deref(), Some("123456"));
/// assert_eq!(resolve_video_id("https://www.twitch.tv/"), None);
/// ```
pub fn resolve_video_id(url: &str) -> Option<String> {
    VIDEO_URL_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Public watch URL for a video id.
pub fn public_url(video_id: &str) -> String {
    format!("https://twitch.tv/videos/{}", urlencoding::encode(video_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_standard_urls() {
        for (url, id) in [
            ("https://www.twitch.tv/videos/123456", "123456"),
            ("https://twitch.tv/videos/42", "42"),
            ("http://m.twitch.tv/videos/987?t=1h2m", "987"),
            ("HTTPS://WWW.TWITCH.TV/VIDEOS/555", "555"),
            ("www.twitch.tv/videos/1/", "1"),
        ] {
            assert_eq!(resolve_video_id(url).as_deref(), Some(id), "url: {url}");
        }
    }

    #[test]
    fn rejects_non_video_urls() {
        for url in [
            "https://www.twitch.tv/",
            "https://google.com",
            "",
            "https://www.twitch.tv/videos/",
            "https://www.twitch.tv/videos/abc",
            "https://www.twitch.tv/somechannel",
        ] {
            assert_eq!(resolve_video_id(url), None, "url: {url}");
        }
    }

    #[test]
    fn reference_from_url() {
        let reference = VideoReference::from_url("https://www.twitch.tv/videos/77").unwrap();
        assert_eq!(reference.video_id, "77");
        assert_eq!(reference.source_url, "https://www.twitch.tv/videos/77");
        assert_eq!(reference.public_url(), "https://twitch.tv/videos/77");
        assert!(VideoReference::from_url("https://google.com").is_none());
    }

    #[test]
    fn public_url_encodes_id() {
        assert_eq!(public_url("a b/c"), "https://twitch.tv/videos/a%20b%2Fc");
    }
}
