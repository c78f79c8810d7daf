//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a wiremock server
//! standing in for the Twitch Helix API and the thumbnail CDN, and a full
//! [`AppContext`]. The [`TestHarness::with_server`] constructor starts Axum on
//! a random port for HTTP-level testing.

#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;

use image::{ImageFormat, RgbImage};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use twitchmedia::app::App;
use twitchmedia::config::Config;
use twitchmedia::metadata::FileIndex;
use twitchmedia::server::{create_router, AppContext};
use twitchmedia_db::models::{File, NewFile};
use twitchmedia_db::pool::{init_memory_pool, DbPool};

pub const TOKEN: &str = "test-token";
pub const CLIENT_ID: &str = "test-client";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a mock Helix server.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub helix: MockServer,
    pub temp: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Create a new harness from `config`, pointed at the mock Helix server
    /// and a fresh temp directory.
    pub async fn with_config(mut config: Config) -> Self {
        let helix = MockServer::start().await;
        let temp = tempfile::tempdir().expect("failed to create temp dir");

        config.twitch.token = TOKEN.to_string();
        config.twitch.client_id = CLIENT_ID.to_string();
        config.twitch.api_base_url = helix.uri();
        config.storage.temp_dir = temp.path().to_string_lossy().into_owned();

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let app = App::new(config, db.clone()).expect("failed to build app");

        Self {
            ctx: AppContext::new(app),
            db,
            helix,
            temp,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config).await;
        let router = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        (harness, addr)
    }

    pub fn app(&self) -> &App {
        &self.ctx.app
    }

    /// Insert a `.twitch` file for `video_id` into the root folder.
    pub fn insert_twitch_file(&self, video_id: &str) -> File {
        let name = format!("{video_id}.twitch");
        self.ctx
            .app
            .store
            .create_file(&NewFile {
                folder: "/",
                name: &name,
                extension: "twitch",
                mime_type: "video/twitch",
                online_media_id: video_id,
            })
            .expect("failed to insert file")
    }

    /// Thumbnail URL template served by the mock server.
    pub fn thumbnail_template(&self, video_id: &str) -> String {
        format!("{}/thumbs/{video_id}-%{{width}}x%{{height}}.jpg", self.helix.uri())
    }

    /// Serve a Helix video record for `video_id`.
    pub async fn mount_video(&self, video_id: &str, title: &str) {
        let body = json!({
            "data": [{
                "id": video_id,
                "title": title,
                "user_name": "streamer",
                "thumbnail_url": self.thumbnail_template(video_id),
            }],
            "pagination": {}
        });
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", video_id))
            .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
            .and(header("Client-Id", CLIENT_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.helix)
            .await;
    }

    /// Serve a Helix response with no data for `video_id`.
    pub async fn mount_missing_video(&self, video_id: &str) {
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", video_id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&self.helix)
            .await;
    }

    /// Serve the thumbnail of `video_id` rendered at `width`x`height`.
    pub async fn mount_thumbnail(&self, video_id: &str, width: u32, height: u32) {
        Mock::given(method("GET"))
            .and(path(format!("/thumbs/{video_id}-{width}x{height}.jpg")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(jpeg_bytes(width, height))
                    .insert_header("content-type", "image/jpeg"),
            )
            .mount(&self.helix)
            .await;
    }
}

/// A solid-colour JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([100, 65, 165]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg)
        .expect("failed to encode jpeg");
    buf.into_inner()
}
