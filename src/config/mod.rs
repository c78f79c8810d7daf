mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./twitchmedia.toml",
        "~/.config/twitchmedia/config.toml",
        "/etc/twitchmedia/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.twitch.width == 0 || config.twitch.height == 0 {
        anyhow::bail!(
            "Twitch width and height must be positive (got {}x{})",
            config.twitch.width,
            config.twitch.height
        );
    }

    if config.sync.concurrency == 0 {
        anyhow::bail!("Sync concurrency must be at least 1");
    }

    if config.sync.requests_per_minute == 0 {
        anyhow::bail!("Sync requests_per_minute must be at least 1");
    }

    if config.sync.request_timeout_secs == 0 {
        anyhow::bail!("Sync request_timeout_secs must be at least 1");
    }

    let auth = &config.server.auth;
    if auth.enabled && auth.api_key.as_deref().unwrap_or("").is_empty() {
        anyhow::bail!("Server auth is enabled but no api_key is configured");
    }

    if config.twitch.token.is_empty() || config.twitch.client_id.is_empty() {
        tracing::warn!("Twitch token or client_id is not configured; metadata sync will be skipped");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use twitchmedia_common::DisplayMode;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.twitch.width, 800);
        assert_eq!(config.twitch.height, 450);
        assert_eq!(config.twitch.display, DisplayMode::Iframe);
        assert!(!config.twitch.privacy);
        assert_eq!(config.sync.limit, 10);
        assert_eq!(config.sync.concurrency, 1);
        assert_eq!(config.sync.request_timeout_secs, 30);
        assert_eq!(config.storage.temp_dir, "typo3temp/assets/online_media");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            [twitch]
            token = "tok"
            client_id = "cid"
            width = 640
            height = 360
            display = "script"
            privacy = true

            [site]
            host_domain = "example.org"

            [sync]
            limit = 25
            concurrency = 4

            [server]
            port = 9000

            [server.auth]
            enabled = true
            api_key = "secret"
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.twitch.token, "tok");
        assert_eq!(config.twitch.width, 640);
        assert_eq!(config.twitch.display, DisplayMode::Script);
        assert!(config.twitch.privacy);
        assert_eq!(config.site.host_domain, "example.org");
        assert_eq!(config.sync.limit, 25);
        assert_eq!(config.sync.concurrency, 4);
        assert_eq!(config.sync.request_timeout_secs, 30);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.auth.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let file = write_config("[twitch]\nwidth = 0\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_auth_without_key() {
        let file = write_config("[server.auth]\nenabled = true\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn test_rejects_unknown_display_mode() {
        let file = write_config("[twitch]\ndisplay = \"flash\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_custom_path_is_error() {
        let result = load_config_or_default(Some(Path::new("/nonexistent/twitchmedia.toml")));
        assert!(result.is_err());
    }
}
