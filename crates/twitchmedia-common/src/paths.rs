//! Extension utilities for recognizing online media files.
//!
//! Online media files carry no binary content; the file index recognizes them
//! by extension and maps that extension to a synthetic `video/<ext>` MIME type.

use crate::types::TWITCH_EXTENSION;

/// Extensions handled as online media.
const ONLINE_MEDIA_EXTENSIONS: &[&str] = &[TWITCH_EXTENSION];

/// MIME type registered for an online media extension, if any.
///
/// # Examples
///
/// ```
/// use twitchmedia_common::paths::mime_type_for_extension;
///
/// assert_eq!(mime_type_for_extension("twitch").as_deref(), Some("video/twitch"));
/// assert_eq!(mime_type_for_extension("jpg"), None);
/// ```
pub fn mime_type_for_extension(ext: &str) -> Option<String> {
    let ext = ext.to_lowercase();
    ONLINE_MEDIA_EXTENSIONS
        .contains(&ext.as_str())
        .then(|| format!("video/{}", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_case_insensitive() {
        assert_eq!(
            mime_type_for_extension("Twitch").as_deref(),
            Some("video/twitch")
        );
    }
}
