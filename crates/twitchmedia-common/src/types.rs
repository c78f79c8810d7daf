//! Core type definitions shared by the pipeline and the storage layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// File extension used for Twitch online media files.
pub const TWITCH_EXTENSION: &str = "twitch";

/// MIME type registered for Twitch online media files.
pub const TWITCH_MIME_TYPE: &str = "video/twitch";

/// How a Twitch video is embedded in a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// A plain `<iframe>` pointing at the Twitch player.
    #[default]
    Iframe,
    /// A container `<div>` plus an inline script driving the Twitch JS player.
    Script,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iframe => write!(f, "iframe"),
            Self::Script => write!(f, "script"),
        }
    }
}

impl std::str::FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iframe" => Ok(Self::Iframe),
            "script" | "javascript" | "js" => Ok(Self::Script),
            _ => Err(format!("Unknown display mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mode_default_is_iframe() {
        assert_eq!(DisplayMode::default(), DisplayMode::Iframe);
    }

    #[test]
    fn test_display_mode_parse() {
        assert_eq!("IFRAME".parse::<DisplayMode>().unwrap(), DisplayMode::Iframe);
        assert_eq!("js".parse::<DisplayMode>().unwrap(), DisplayMode::Script);
        assert!("flash".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn test_display_mode_serde() {
        let json = serde_json::to_string(&DisplayMode::Script).unwrap();
        assert_eq!(json, "\"script\"");
        let mode: DisplayMode = serde_json::from_str("\"iframe\"").unwrap();
        assert_eq!(mode, DisplayMode::Iframe);
    }
}
