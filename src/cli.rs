use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "twitchmedia")]
#[command(author, version, about = "Twitch online media metadata sync and embed rendering")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh metadata and preview images of Twitch files
    UpdateMetadata {
        /// Maximum number of files to process (defaults to `sync.limit`)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Start the HTTP server
    Start {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Refresh a single file
    Sync {
        /// File uid
        uid: i64,
    },

    /// Create an online media file from a Twitch video URL
    Import {
        /// Video URL such as https://www.twitch.tv/videos/123456
        url: String,

        /// Target folder
        #[arg(long, default_value = "/")]
        folder: String,
    },

    /// Print the embed HTML of a file
    Render {
        /// File uid
        uid: i64,

        /// Player width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Player height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Start playing immediately
        #[arg(long)]
        autoplay: bool,

        /// Start muted
        #[arg(long)]
        muted: bool,

        /// Start offset such as 1h2m3s
        #[arg(long)]
        time: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,

    /// Generate a random API key for programmatic access
    GenerateApiKey,
}
