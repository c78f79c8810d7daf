//! Service wiring shared by the CLI and the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use twitchmedia_common::{FileId, TWITCH_EXTENSION};
use twitchmedia_db::models::File;
use twitchmedia_db::pool::DbPool;

use crate::config::Config;
use crate::images::{PreviewImageCache, RenditionService};
use crate::metadata::providers::TwitchProvider;
use crate::metadata::{
    DbStore, FileIndex, MediaImporter, MetadataNormalizer, MetadataStore, MetadataSyncJob,
    OEmbedProvider,
};
use crate::rendering::{
    EmbedConfiguration, HelperRegistry, OutputHooks, PageAssets, RenderOptions, RendererRegistry,
    TwitchRenderer,
};

/// Directory under the temp dir that holds scaled previews.
const RENDITION_DIR: &str = "processed";

/// A rendered embed together with the scripts the page must load.
#[derive(Debug)]
pub struct RenderedEmbed {
    pub html: String,
    pub assets: PageAssets,
}

/// Every long-lived service, built once from the configuration.
#[derive(Clone)]
pub struct App {
    pub config: Arc<Config>,
    pub store: Arc<DbStore>,
    pub provider: Arc<dyn OEmbedProvider>,
    pub helpers: Arc<HelperRegistry>,
    pub hooks: Arc<OutputHooks>,
    pub renderers: Arc<RendererRegistry>,
    pub previews: Arc<PreviewImageCache>,
    pub renditions: Arc<RenditionService>,
    pub sync: Arc<MetadataSyncJob>,
    pub importer: Arc<MediaImporter>,
}

impl App {
    pub fn new(config: Config, pool: DbPool) -> Result<Self> {
        let provider = TwitchProvider::from_config(&config.twitch, &config.sync)
            .context("Failed to create Twitch provider")?;
        Self::with_provider(config, pool, Arc::new(provider))
    }

    /// Build the services around an explicit provider.
    pub fn with_provider(
        config: Config,
        pool: DbPool,
        provider: Arc<dyn OEmbedProvider>,
    ) -> Result<Self> {
        let store = Arc::new(DbStore::new(pool));
        let temp_dir = config.storage.temp_dir_path();

        let previews = Arc::new(
            PreviewImageCache::new(temp_dir.clone(), store.clone())
                .context("Failed to create preview image cache")?,
        );
        let renditions = Arc::new(RenditionService::new(
            temp_dir.join(RENDITION_DIR),
            store.clone(),
        ));

        let helpers = Arc::new(HelperRegistry::new());
        helpers.register(TWITCH_EXTENSION, provider.clone());

        let hooks = Arc::new(OutputHooks::new());
        let mut renderers = RendererRegistry::new();
        renderers.register(Arc::new(TwitchRenderer::new(
            EmbedConfiguration::from_config(&config),
            helpers.clone(),
            hooks.clone(),
        )));

        let sync = Arc::new(
            MetadataSyncJob::new(
                store.clone(),
                store.clone(),
                provider.clone(),
                MetadataNormalizer::from_config(&config.twitch),
                previews.clone(),
            )
            .with_concurrency(config.sync.concurrency),
        );
        let importer = Arc::new(MediaImporter::new(store.clone(), sync.clone()));

        if !provider.is_available() {
            tracing::warn!("Twitch credentials are not configured, metadata sync will fetch nothing");
        }

        Ok(Self {
            config: Arc::new(config),
            store,
            provider,
            helpers,
            hooks,
            renderers: Arc::new(renderers),
            previews,
            renditions,
            sync,
            importer,
        })
    }

    pub fn file(&self, uid: FileId) -> Result<Option<File>> {
        self.store.get_file(uid)
    }

    /// Render the embed of file `uid`.
    ///
    /// Missing dimensions fall back to the stored metadata, then to the
    /// configured defaults. Returns `Ok(None)` when the file does not exist.
    pub fn render_embed(
        &self,
        uid: FileId,
        width: Option<u32>,
        height: Option<u32>,
        options: &RenderOptions,
    ) -> Result<Option<RenderedEmbed>> {
        let Some(file) = self.store.get_file(uid)? else {
            return Ok(None);
        };

        let renderer = self
            .renderers
            .renderer_for(&file)
            .with_context(|| format!("No renderer for file {} ({})", uid, file.mime_type))?;

        let stored = self.store.get_metadata(uid)?.unwrap_or_default();
        let width = width
            .filter(|w| *w > 0)
            .or(stored.width)
            .unwrap_or(self.config.twitch.width);
        let height = height
            .filter(|h| *h > 0)
            .or(stored.height)
            .unwrap_or(self.config.twitch.height);

        let assets = PageAssets::new();
        let html = renderer.render(&file, width, height, options, &assets)?;
        Ok(Some(RenderedEmbed { html, assets }))
    }

    /// Path of a JPEG preview of file `uid`, scaled to `max_width` when given.
    ///
    /// The cached artifact is downloaded on demand from the stored thumbnail
    /// URL. Returns `Ok(None)` when the file does not exist or has no preview.
    pub async fn preview(&self, uid: FileId, max_width: Option<u32>) -> Result<Option<PathBuf>> {
        let Some(file) = self.store.get_file(uid)? else {
            return Ok(None);
        };

        let thumbnail = self
            .store
            .get_metadata(uid)?
            .and_then(|m| m.twitch_thumbnail)
            .unwrap_or_default();

        let Some(source) = self
            .previews
            .preview_image(file.online_media_id.trim(), &thumbnail, &file.extension)
            .await?
        else {
            return Ok(None);
        };

        let Some(max_width) = max_width.filter(|w| *w > 0) else {
            return Ok(Some(source));
        };

        let renditions = self.renditions.clone();
        let path = tokio::task::spawn_blocking(move || {
            renditions.rendition(uid, &source, max_width)
        })
        .await
        .context("Rendition task panicked")??;
        Ok(Some(path))
    }
}
