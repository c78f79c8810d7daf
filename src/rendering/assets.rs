//! Page-level script collector.

use parking_lot::Mutex;

/// Collects external scripts a page must load, each at most once.
#[derive(Debug, Default)]
pub struct PageAssets {
    js_files: Mutex<Vec<String>>,
}

impl PageAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a script URL. Returns `false` if it was already present.
    pub fn add_js_file(&self, url: &str) -> bool {
        let mut files = self.js_files.lock();
        if files.iter().any(|f| f == url) {
            return false;
        }
        files.push(url.to_string());
        true
    }

    pub fn js_files(&self) -> Vec<String> {
        self.js_files.lock().clone()
    }

    /// `<script src>` tags for every collected file, in insertion order.
    pub fn script_tags(&self) -> String {
        self.js_files
            .lock()
            .iter()
            .map(|url| format!("<script src=\"{}\"></script>\n", super::escape_html(url)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_each_file_once() {
        let assets = PageAssets::new();
        assert!(assets.add_js_file("https://player.twitch.tv/js/embed/v1.js"));
        assert!(!assets.add_js_file("https://player.twitch.tv/js/embed/v1.js"));
        assert!(assets.add_js_file("/local.js"));
        assert_eq!(assets.js_files().len(), 2);
    }

    #[test]
    fn renders_script_tags() {
        let assets = PageAssets::new();
        assert_eq!(assets.script_tags(), "");

        assets.add_js_file("/a.js?x=1&y=2");
        assert_eq!(
            assets.script_tags(),
            "<script src=\"/a.js?x=1&amp;y=2\"></script>\n"
        );
    }
}
