//! File routes: embed preview and preview images.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use twitchmedia_common::FileId;
use utoipa::IntoParams;

use super::AppContext;
use crate::rendering::RenderOptions;

/// Content security policy for pages showing Twitch embeds.
pub const EMBED_CSP: &str = "frame-src 'self' *.twitch.tv; img-src 'self' *.jtvnw.net";

/// Create file routes.
pub fn file_routes() -> Router<AppContext> {
    Router::new()
        .route("/files/:uid/embed", get(get_embed))
        .route("/files/:uid/preview", get(get_preview))
}

/// Embed query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmbedQuery {
    /// Player width in pixels
    pub width: Option<u32>,
    /// Player height in pixels
    pub height: Option<u32>,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub muted: bool,
    /// Start offset such as `1h2m3s`
    pub time: Option<String>,
}

/// Preview query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// Maximum width of the returned image
    pub width: Option<u32>,
}

/// Render the embed fragment of a Twitch file as an HTML page.
#[utoipa::path(
    get,
    path = "/api/files/{uid}/embed",
    tag = "files",
    params(
        ("uid" = i64, Path, description = "File uid"),
        EmbedQuery
    ),
    responses(
        (status = 200, description = "Embed HTML", content_type = "text/html"),
        (status = 404, description = "File not found"),
        (status = 422, description = "File cannot be rendered")
    )
)]
pub async fn get_embed(
    State(ctx): State<AppContext>,
    Path(uid): Path<i64>,
    Query(query): Query<EmbedQuery>,
) -> impl IntoResponse {
    let options = RenderOptions {
        autoplay: query.autoplay,
        muted: query.muted,
        start_time: query.time,
    };

    let embed = match ctx
        .app
        .render_embed(FileId::from(uid), query.width, query.height, &options)
    {
        Ok(Some(embed)) => embed,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "File not found"})),
            )
                .into_response()
        }
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"error": format!("{e:#}")})),
            )
                .into_response()
        }
    };

    let page = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{}</head>\n<body>\n{}\n</body>\n</html>\n",
        embed.assets.script_tags(),
        embed.html
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CONTENT_SECURITY_POLICY, EMBED_CSP),
        ],
        page,
    )
        .into_response()
}

/// Return the preview image of a Twitch file.
#[utoipa::path(
    get,
    path = "/api/files/{uid}/preview",
    tag = "files",
    params(
        ("uid" = i64, Path, description = "File uid"),
        PreviewQuery
    ),
    responses(
        (status = 200, description = "JPEG preview", content_type = "image/jpeg"),
        (status = 404, description = "File or preview not found")
    )
)]
pub async fn get_preview(
    State(ctx): State<AppContext>,
    Path(uid): Path<i64>,
    Query(query): Query<PreviewQuery>,
) -> impl IntoResponse {
    let path = match ctx.app.preview(FileId::from(uid), query.width).await {
        Ok(Some(path)) => path,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "Preview not found"})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(file = uid, error = %format!("{e:#}"), "Failed to build preview");
            return (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(_) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "Preview file not found on disk"})),
            )
                .into_response()
        }
    };

    (
        StatusCode::OK,
        [
            (header::CACHE_CONTROL, "public, max-age=3600"),
            (header::CONTENT_TYPE, "image/jpeg"),
        ],
        Body::from(data),
    )
        .into_response()
}
