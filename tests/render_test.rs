//! Embed rendering through the wired renderer registry.

mod common;

use common::TestHarness;
use twitchmedia::config::Config;
use twitchmedia::metadata::FileIndex;
use twitchmedia::rendering::RenderOptions;
use twitchmedia_common::{DisplayMode, FileId};
use twitchmedia_db::models::NewFile;

#[tokio::test]
async fn registered_hooks_rewrite_output() {
    let h = TestHarness::new().await;
    let file = h.insert_twitch_file("31337");

    h.app()
        .hooks
        .register(|html| format!("<div class=\"video\">{html}</div>"));
    h.app().hooks.register(|html| html.replace("frameborder=\"0\" ", ""));

    let embed = h
        .app()
        .render_embed(file.uid, Some(100), Some(100), &RenderOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(
        embed.html,
        "<div class=\"video\"><iframe src=\"https://player.twitch.tv/?video=31337&parent=&autoplay=false&muted=false\" \
         allowfullscreen=\"true\" scrolling=\"no\" height=\"100\" width=\"100\"></iframe></div>"
    );
    assert!(embed.assets.js_files().is_empty());
}

#[tokio::test]
async fn privacy_iframe_is_deferred() {
    let mut config = Config::default();
    config.twitch.privacy = true;
    config.site.host_domain = "www.example.org".into();
    let h = TestHarness::with_config(config).await;
    let file = h.insert_twitch_file("1");

    let embed = h
        .app()
        .render_embed(file.uid, None, None, &RenderOptions::default())
        .unwrap()
        .unwrap();
    assert!(embed.html.starts_with(
        "<iframe data-name=\"script-twitch\" data-src=\"https://player.twitch.tv/?video=1&parent=www.example.org&"
    ));
    assert!(embed.html.contains("height=\"450\" width=\"800\""));
}

#[tokio::test]
async fn script_mode_collects_player_script() {
    let mut config = Config::default();
    config.twitch.display = DisplayMode::Script;
    let h = TestHarness::with_config(config).await;
    let file = h.insert_twitch_file("2");

    let options = RenderOptions {
        autoplay: true,
        muted: true,
        start_time: Some("0h1m0s".into()),
    };
    let embed = h
        .app()
        .render_embed(file.uid, Some(640), Some(360), &options)
        .unwrap()
        .unwrap();

    assert_eq!(
        embed.assets.js_files(),
        vec!["https://player.twitch.tv/js/embed/v1.js".to_string()]
    );
    assert!(embed.html.contains("<script type=\"text/javascript\">"));
    assert!(embed.html.contains("width: 640,"));
    assert!(embed.html.contains("video: \"2\","));
    assert!(embed.html.contains("autoplay: true,"));
    assert!(embed.html.contains("time: \"0h1m0s\""));
}

#[tokio::test]
async fn non_twitch_files_have_no_renderer() {
    let h = TestHarness::new().await;
    let file = h
        .app()
        .store
        .create_file(&NewFile {
            folder: "/",
            name: "clip.youtube",
            extension: "youtube",
            mime_type: "video/youtube",
            online_media_id: "dQw4w9WgXcQ",
        })
        .unwrap();

    assert!(h.app().renderers.renderer_for(&file).is_none());
    let err = h
        .app()
        .render_embed(file.uid, None, None, &RenderOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("No renderer"));
}

#[tokio::test]
async fn renderer_requires_registered_helper() {
    let h = TestHarness::new().await;
    let file = h
        .app()
        .store
        .create_file(&NewFile {
            folder: "/",
            name: "renamed.bin",
            extension: "bin",
            mime_type: "video/twitch",
            online_media_id: "9",
        })
        .unwrap();

    // No helper is registered for `bin`, so the renderer declines.
    assert!(h.app().renderers.renderer_for(&file).is_none());

    let twitch = h.insert_twitch_file("9");
    assert!(h.app().renderers.renderer_for(&twitch).is_some());
}

#[tokio::test]
async fn unknown_file_renders_nothing() {
    let h = TestHarness::new().await;
    let result = h
        .app()
        .render_embed(FileId::from(404), None, None, &RenderOptions::default())
        .unwrap();
    assert!(result.is_none());
}
