//! Twitch Helix metadata provider.
//!
//! Implements [`OEmbedProvider`] against the Helix `videos` endpoint.
//!
//! Features:
//! - Token-bucket rate limiting via [`governor`] (Helix allows 800 points a
//!   minute per app token).
//! - Per-request timeout from configuration.
//! - Every failure degrades to `None` and is logged.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{SyncConfig, TwitchConfig};
use crate::metadata::provider::{OEmbedProvider, ProviderRecord};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 800;

// ---------------------------------------------------------------------------
// Helix response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct HelixVideosResponse {
    #[serde(default)]
    data: Vec<Map<String, Value>>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

type DirectRateLimiter = governor::RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Twitch Helix provider.
///
/// # Examples
///
/// ```no_run
/// use twitchmedia::metadata::providers::TwitchProvider;
///
/// let provider = TwitchProvider::new("token".into(), "client-id".into()).unwrap();
/// ```
pub struct TwitchProvider {
    client: reqwest::Client,
    token: String,
    client_id: String,
    base_url: String,
    rate_limiter: DirectRateLimiter,
}

impl TwitchProvider {
    /// Create a provider with default timeout and rate limit.
    pub fn new(token: String, client_id: String) -> anyhow::Result<Self> {
        Self::with_limits(token, client_id, REQUEST_TIMEOUT, DEFAULT_REQUESTS_PER_MINUTE)
    }

    /// Create a provider from the `[twitch]` and `[sync]` configuration sections.
    pub fn from_config(twitch: &TwitchConfig, sync: &SyncConfig) -> anyhow::Result<Self> {
        Ok(Self::with_limits(
            twitch.token.clone(),
            twitch.client_id.clone(),
            Duration::from_secs(sync.request_timeout_secs),
            sync.requests_per_minute,
        )?
        .with_base_url(&twitch.api_base_url))
    }

    fn with_limits(
        token: String,
        client_id: String,
        timeout: Duration,
        requests_per_minute: u32,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        let per_minute = NonZeroU32::new(requests_per_minute)
            .context("requests_per_minute must be at least 1")?;
        let rate_limiter = RateLimiter::direct(Quota::per_minute(per_minute));

        Ok(Self {
            client,
            token,
            client_id,
            base_url: HELIX_BASE_URL.to_string(),
            rate_limiter,
        })
    }

    /// Point the provider at a different Helix base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn request(&self, url: &str) -> anyhow::Result<Option<ProviderRecord>> {
        self.rate_limiter.until_ready().await;

        debug!(url = %url, "Requesting Twitch video metadata");
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Client-Id", &self.client_id)
            .send()
            .await
            .with_context(|| format!("Twitch request failed: {url}"))?;

        let status = resp.status();
        if status != StatusCode::OK {
            anyhow::bail!("Twitch returned HTTP {status} for {url}");
        }

        let body: HelixVideosResponse = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse Twitch response from {url}"))?;

        Ok(body
            .data
            .into_iter()
            .next()
            .filter(|obj| !obj.is_empty())
            .map(ProviderRecord::from_object))
    }
}

#[async_trait]
impl OEmbedProvider for TwitchProvider {
    fn name(&self) -> &'static str {
        "twitch"
    }

    fn is_available(&self) -> bool {
        !self.token.is_empty() && !self.client_id.is_empty()
    }

    fn oembed_url(&self, video_id: &str) -> String {
        format!("{}/videos?id={}", self.base_url, urlencoding::encode(video_id))
    }

    async fn fetch(&self, video_id: &str) -> Option<ProviderRecord> {
        let url = self.oembed_url(video_id);
        match self.request(&url).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                debug!(video_id = %video_id, "Twitch returned no video data");
                None
            }
            Err(e) => {
                warn!(video_id = %video_id, error = %format!("{e:#}"), "Twitch metadata fetch failed");
                None
            }
        }
    }
}
