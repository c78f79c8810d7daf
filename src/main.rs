mod cli;

use twitchmedia::{
    app::App,
    config::{self, Config},
    metadata::SyncStatus,
    rendering::RenderOptions,
    server::{self, auth},
};
use twitchmedia_common::FileId;
use twitchmedia_db::pool::{init_pool, DbPool};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn open_database(config: &Config) -> Result<DbPool> {
    let db_path = config.storage.database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
    }

    let db_path_str = db_path.to_string_lossy();
    tracing::info!("Initializing database at {}", db_path_str);
    Ok(init_pool(&db_path_str)?)
}

fn build_app(config_path: Option<&Path>) -> Result<App> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_database(&config)?;
    App::new(config, pool)
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting twitchmedia server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let pool = open_database(&config)?;
    let app = App::new(config, pool)?;

    server::start_server(app).await
}

async fn update_metadata(limit: Option<usize>, config_path: Option<&Path>) -> Result<()> {
    let app = build_app(config_path)?;
    let limit = limit.unwrap_or(app.config.sync.limit);

    let results = app.sync.run(limit).await;
    let updated = results.iter().filter(|r| r.is_success()).count();
    let skipped = results
        .iter()
        .filter(|r| r.status == SyncStatus::Skipped)
        .count();
    let failed = results.len() - updated - skipped;

    for result in &results {
        if let Some(title) = result.title.as_deref().filter(|_| result.is_success()) {
            println!("{}(UID: {}) was processed", title, result.file_uid);
        }
    }
    println!(
        "Processed {} files: {} updated, {} skipped, {} failed",
        results.len(),
        updated,
        skipped,
        failed
    );

    Ok(())
}

async fn sync_file(uid: i64, config_path: Option<&Path>) -> Result<()> {
    let app = build_app(config_path)?;
    let result = app.sync.sync_file(FileId::from(uid)).await;

    match result.status {
        SyncStatus::Updated => {
            println!(
                "{}(UID: {}) was processed",
                result.title.as_deref().unwrap_or(""),
                result.file_uid
            );
            if let Some(ref preview) = result.preview {
                println!("Preview: {}", preview.display());
            }
            Ok(())
        }
        SyncStatus::Skipped => {
            println!("No metadata available for file {}", result.file_uid);
            Ok(())
        }
        SyncStatus::Failed => anyhow::bail!(
            "Failed to sync file {}: {}",
            result.file_uid,
            result.message.as_deref().unwrap_or("unknown error")
        ),
    }
}

async fn import_url(url: &str, folder: &str, config_path: Option<&Path>) -> Result<()> {
    let app = build_app(config_path)?;

    match app.importer.import_url(url, folder).await? {
        Some(file) => {
            println!("Imported {} (UID: {})", file.identifier, file.uid);
            Ok(())
        }
        None => anyhow::bail!("Not a Twitch video URL: {}", url),
    }
}

fn render_file(
    uid: i64,
    width: Option<u32>,
    height: Option<u32>,
    options: RenderOptions,
    config_path: Option<&Path>,
) -> Result<()> {
    let app = build_app(config_path)?;

    let Some(embed) = app.render_embed(FileId::from(uid), width, height, &options)? else {
        anyhow::bail!("File {} not found", uid);
    };

    print!("{}", embed.assets.script_tags());
    println!("{}", embed.html);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "twitchmedia=trace,twitchmedia_db=debug,twitchmedia_common=debug,tower_http=debug"
                .to_string()
        } else {
            "twitchmedia=info,twitchmedia_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::UpdateMetadata { limit } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(update_metadata(limit, config_path))
        }
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, config_path))
        }
        Commands::Sync { uid } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(sync_file(uid, config_path))
        }
        Commands::Import { url, folder } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(import_url(&url, &folder, config_path))
        }
        Commands::Render {
            uid,
            width,
            height,
            autoplay,
            muted,
            time,
        } => render_file(
            uid,
            width,
            height,
            RenderOptions {
                autoplay,
                muted,
                start_time: time,
            },
            config_path,
        ),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("twitchmedia {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::GenerateApiKey => generate_api_key(),
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            print_summary(&config);
        }
    }

    Ok(())
}

fn print_summary(config: &Config) {
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Auth enabled: {}", config.server.auth.enabled);
    println!(
        "  Twitch credentials: {}",
        if config.twitch.token.is_empty() || config.twitch.client_id.is_empty() {
            "missing"
        } else {
            "configured"
        }
    );
    println!(
        "  Display: {:?} ({}x{}), privacy: {}",
        config.twitch.display, config.twitch.width, config.twitch.height, config.twitch.privacy
    );
    println!("  Database: {}", config.storage.database_path().display());
    println!("  Sync limit: {}", config.sync.limit);
}

fn generate_api_key() -> Result<()> {
    let key = auth::generate_api_key();
    println!("{}", key);
    Ok(())
}
