//! Embed rendering for online media files.
//!
//! # Module layout
//!
//! - [`renderer`] -- The Twitch iframe / script renderer.
//! - [`registry`] -- Renderer selection by priority and helper lookup.
//! - [`hooks`] -- Output interceptors applied after rendering.
//! - [`assets`] -- Page-level collector for external player scripts.

pub mod assets;
pub mod hooks;
pub mod registry;
pub mod renderer;

pub use assets::PageAssets;
pub use hooks::OutputHooks;
pub use registry::{FileRenderer, HelperRegistry, RendererRegistry};
pub use renderer::{EmbedConfiguration, RenderOptions, TwitchRenderer, PLAYER_SCRIPT_URL};

/// Escape `& < > " '` for use in HTML text and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#039;&amp;&#039;&lt;/a&gt;"
        );
        assert_eq!(escape_html("1h2m3s"), "1h2m3s");
    }
}
