//! Twitch embed renderer.
//!
//! Produces either a player `<iframe>` or a container `<div>` driven by the
//! Twitch JS player. With privacy enabled the fragment is defused by a text
//! substitution so consent tooling can activate it later. Every fragment is
//! passed through the [`OutputHooks`] before it is returned.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use twitchmedia_common::{DisplayMode, TWITCH_EXTENSION, TWITCH_MIME_TYPE};
use twitchmedia_db::models::File;
use uuid::Uuid;

use super::assets::PageAssets;
use super::escape_html;
use super::hooks::OutputHooks;
use super::registry::{FileRenderer, HelperRegistry};
use crate::config::Config;

/// Twitch player script required by the script display mode.
pub const PLAYER_SCRIPT_URL: &str = "https://player.twitch.tv/js/embed/v1.js";

const DEFAULT_START_TIME: &str = "0h0m0s";

/// Site-level embed settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedConfiguration {
    pub display_mode: DisplayMode,
    pub privacy_enabled: bool,
    /// Passed to the player as `parent`.
    pub host_domain: String,
}

impl EmbedConfiguration {
    pub fn from_config(config: &Config) -> Self {
        Self {
            display_mode: config.twitch.display,
            privacy_enabled: config.twitch.privacy,
            host_domain: config.site.host_domain.clone(),
        }
    }
}

/// Per-call player options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub autoplay: bool,
    pub muted: bool,
    /// Start offset such as `1h2m3s`.
    #[serde(rename = "time")]
    pub start_time: Option<String>,
}

impl RenderOptions {
    fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref().filter(|t| !t.is_empty())
    }
}

/// Renders Twitch videos as embeds.
pub struct TwitchRenderer {
    config: EmbedConfiguration,
    helpers: Arc<HelperRegistry>,
    hooks: Arc<OutputHooks>,
}

impl TwitchRenderer {
    pub fn new(
        config: EmbedConfiguration,
        helpers: Arc<HelperRegistry>,
        hooks: Arc<OutputHooks>,
    ) -> Self {
        Self {
            config,
            helpers,
            hooks,
        }
    }

    pub fn config(&self) -> &EmbedConfiguration {
        &self.config
    }

    /// Render the embed fragment for `video_id`.
    ///
    /// In script mode the player script is added to `assets`.
    pub fn render(
        &self,
        video_id: &str,
        width: u32,
        height: u32,
        options: &RenderOptions,
        assets: &PageAssets,
    ) -> String {
        let output = match self.config.display_mode {
            DisplayMode::Iframe => {
                let output = self.render_iframe(video_id, width, height, options);
                if self.config.privacy_enabled {
                    output.replacen(" src=\"", " data-name=\"script-twitch\" data-src=\"", 1)
                } else {
                    output
                }
            }
            DisplayMode::Script => {
                let output = self.render_script(video_id, width, height, options, assets);
                if self.config.privacy_enabled {
                    output.replacen("text/javascript", "text/plain", 1)
                } else {
                    output
                }
            }
        };

        self.hooks.apply(output)
    }

    fn render_iframe(
        &self,
        video_id: &str,
        width: u32,
        height: u32,
        options: &RenderOptions,
    ) -> String {
        let mut params = vec![
            format!("autoplay={}", options.autoplay),
            format!("muted={}", options.muted),
        ];
        if let Some(time) = options.start_time() {
            params.push(format!("time={}", escape_html(time)));
        }

        format!(
            "<iframe src=\"https://player.twitch.tv/?video={}&parent={}&{}\" frameborder=\"0\" \
             allowfullscreen=\"true\" scrolling=\"no\" height=\"{}\" width=\"{}\"></iframe>",
            urlencoding::encode(video_id),
            urlencoding::encode(&self.config.host_domain),
            params.join("&"),
            height,
            width,
        )
    }

    fn render_script(
        &self,
        video_id: &str,
        width: u32,
        height: u32,
        options: &RenderOptions,
        assets: &PageAssets,
    ) -> String {
        assets.add_js_file(PLAYER_SCRIPT_URL);

        let container = format!("twitch-embed{}", Uuid::new_v4().simple());
        let time = options
            .start_time()
            .map(|t| escape_html(t).replace('\\', "\\\\"))
            .unwrap_or_else(|| DEFAULT_START_TIME.to_string());

        format!(
            "<div id=\"{container}\"></div>\n\
             <script type=\"text/javascript\">\n\
             \x20 var options = {{\n\
             \x20   width: {width},\n\
             \x20   height: {height},\n\
             \x20   video: \"{video}\",\n\
             \x20   autoplay: {autoplay},\n\
             \x20   muted: {muted},\n\
             \x20   time: \"{time}\"\n\
             \x20 }};\n\
             \x20 new Twitch.Player(\"{container}\", options);\n\
             </script>",
            video = urlencoding::encode(video_id),
            autoplay = options.autoplay,
            muted = options.muted,
        )
    }
}

impl FileRenderer for TwitchRenderer {
    fn priority(&self) -> i32 {
        1
    }

    fn can_render(&self, file: &File) -> bool {
        (file.mime_type == TWITCH_MIME_TYPE || file.extension == TWITCH_EXTENSION)
            && self.helpers.helper_for(file).is_some()
    }

    fn render(
        &self,
        file: &File,
        width: u32,
        height: u32,
        options: &RenderOptions,
        assets: &PageAssets,
    ) -> anyhow::Result<String> {
        let video_id = file.online_media_id.trim();
        if video_id.is_empty() {
            anyhow::bail!("File {} has no online media id", file.uid);
        }
        Ok(TwitchRenderer::render(
            self, video_id, width, height, options, assets,
        ))
    }
}
