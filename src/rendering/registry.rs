//! Renderer and online media helper registries.
//!
//! The host asks the [`RendererRegistry`] for the best renderer of a file;
//! renderers consult the [`HelperRegistry`] to check that a helper handles the
//! file's extension.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use twitchmedia_db::models::File;

use super::assets::PageAssets;
use super::renderer::RenderOptions;
use crate::metadata::OEmbedProvider;

/// A component able to render some files as HTML.
pub trait FileRenderer: Send + Sync {
    /// Higher values win when several renderers accept a file.
    fn priority(&self) -> i32;

    fn can_render(&self, file: &File) -> bool;

    fn render(
        &self,
        file: &File,
        width: u32,
        height: u32,
        options: &RenderOptions,
        assets: &PageAssets,
    ) -> anyhow::Result<String>;
}

/// Online media helpers keyed by file extension.
#[derive(Default)]
pub struct HelperRegistry {
    helpers: RwLock<HashMap<String, Arc<dyn OEmbedProvider>>>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, extension: &str, helper: Arc<dyn OEmbedProvider>) {
        self.helpers
            .write()
            .insert(extension.to_lowercase(), helper);
    }

    pub fn get(&self, extension: &str) -> Option<Arc<dyn OEmbedProvider>> {
        self.helpers.read().get(&extension.to_lowercase()).cloned()
    }

    /// Helper responsible for `file`, by its extension.
    pub fn helper_for(&self, file: &File) -> Option<Arc<dyn OEmbedProvider>> {
        self.get(&file.extension)
    }

    pub fn has_helper(&self, extension: &str) -> bool {
        self.helpers
            .read()
            .contains_key(&extension.to_lowercase())
    }

    pub fn extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.helpers.read().keys().cloned().collect();
        exts.sort();
        exts
    }
}

/// File renderers ordered by descending priority.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: Vec<Arc<dyn FileRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a renderer. Renderers of equal priority keep registration order.
    pub fn register(&mut self, renderer: Arc<dyn FileRenderer>) {
        self.renderers.push(renderer);
        self.renderers
            .sort_by_key(|r| std::cmp::Reverse(r.priority()));
    }

    /// The highest-priority renderer that accepts `file`.
    pub fn renderer_for(&self, file: &File) -> Option<Arc<dyn FileRenderer>> {
        self.renderers
            .iter()
            .find(|r| r.can_render(file))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use twitchmedia_common::FileId;

    struct Fixed {
        priority: i32,
        accepts: &'static str,
        output: &'static str,
    }

    impl FileRenderer for Fixed {
        fn priority(&self) -> i32 {
            self.priority
        }

        fn can_render(&self, file: &File) -> bool {
            file.extension == self.accepts
        }

        fn render(
            &self,
            _file: &File,
            _width: u32,
            _height: u32,
            _options: &RenderOptions,
            _assets: &PageAssets,
        ) -> anyhow::Result<String> {
            Ok(self.output.to_string())
        }
    }

    fn file(ext: &str) -> File {
        File {
            uid: FileId::from(1),
            folder: "/".into(),
            name: format!("a.{ext}"),
            identifier: format!("/a.{ext}"),
            extension: ext.into(),
            mime_type: format!("video/{ext}"),
            online_media_id: "1".into(),
            missing: false,
            last_checked_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn picks_highest_priority_match() {
        let mut registry = RendererRegistry::new();
        registry.register(Arc::new(Fixed {
            priority: 1,
            accepts: "twitch",
            output: "generic",
        }));
        registry.register(Arc::new(Fixed {
            priority: 50,
            accepts: "twitch",
            output: "specific",
        }));
        registry.register(Arc::new(Fixed {
            priority: 100,
            accepts: "youtube",
            output: "other",
        }));

        let assets = PageAssets::new();
        let renderer = registry.renderer_for(&file("twitch")).unwrap();
        let out = renderer
            .render(&file("twitch"), 1, 1, &RenderOptions::default(), &assets)
            .unwrap();
        assert_eq!(out, "specific");
        assert!(registry.renderer_for(&file("mp4")).is_none());
        assert_eq!(registry.len(), 3);
    }
}
