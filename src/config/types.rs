use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use twitchmedia_common::DisplayMode;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub twitch: TwitchConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Twitch extension settings: API credentials and embed defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TwitchConfig {
    /// App access token sent as `Authorization: Bearer <token>`
    #[serde(default)]
    pub token: String,

    /// Application client id sent as `Client-Id`
    #[serde(default)]
    pub client_id: String,

    /// Width stored for every synced video and used in thumbnail placeholders
    #[serde(default = "default_width")]
    pub width: u32,

    /// Height stored for every synced video and used in thumbnail placeholders
    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default)]
    pub display: DisplayMode,

    /// Defer player loading until the visitor consents
    #[serde(default)]
    pub privacy: bool,

    /// Helix API base URL (without trailing slash)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    450
}

fn default_api_base_url() -> String {
    "https://api.twitch.tv/helix".to_string()
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            client_id: String::new(),
            width: default_width(),
            height: default_height(),
            display: DisplayMode::default(),
            privacy: false,
            api_base_url: default_api_base_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Host name passed to the player as `parent`
    #[serde(default)]
    pub host_domain: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_database")]
    pub database: String,

    /// Directory holding cached preview images
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
}

fn default_database() -> String {
    "twitchmedia.db".to_string()
}

fn default_temp_dir() -> String {
    "typo3temp/assets/online_media".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            temp_dir: default_temp_dir(),
        }
    }
}

impl StorageConfig {
    /// Database path with `~` expanded.
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.database).as_ref())
    }

    /// Preview cache directory with `~` expanded.
    pub fn temp_dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.temp_dir).as_ref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Files checked per `update-metadata` run when `--limit` is not given
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Helix requests in flight at once during a batch
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Timeout for every outbound HTTP call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Client-side cap on Helix requests per minute
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

fn default_limit() -> usize {
    10
}

fn default_concurrency() -> usize {
    1
}

fn default_request_timeout() -> u64 {
    30
}

fn default_requests_per_minute() -> u32 {
    800
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Require an API key on `/api` and `/ajax` routes
    #[serde(default)]
    pub enabled: bool,

    /// API key for programmatic access (used with Authorization: Bearer header)
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth: AuthConfig::default(),
        }
    }
}
