//! Backend ajax route behind the file list "update metadata" action.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use twitchmedia_common::FileId;
use utoipa::ToSchema;

use super::AppContext;
use crate::metadata::SyncStatus;

/// Create ajax routes.
pub fn ajax_routes() -> Router<AppContext> {
    Router::new().route("/twitch/update", post(update_file))
}

/// Request to refresh one file.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequest {
    /// File uid
    #[schema(value_type = i64)]
    pub uid: FileId,
}

/// Result of a single-file refresh.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateResponse {
    /// Whether metadata was written
    pub success: bool,
    /// File uid
    #[schema(value_type = i64)]
    pub uid: FileId,
    /// Title stored after the refresh
    pub title: Option<String>,
}

/// Refresh the metadata and preview of one file.
#[utoipa::path(
    post,
    path = "/ajax/twitch/update",
    tag = "ajax",
    request_body = UpdateRequest,
    responses(
        (status = 200, description = "Refresh attempted", body = UpdateResponse),
        (status = 404, description = "File not found")
    )
)]
pub async fn update_file(
    State(ctx): State<AppContext>,
    Json(request): Json<UpdateRequest>,
) -> impl IntoResponse {
    match ctx.app.file(request.uid) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "success": false,
                    "uid": request.uid,
                    "error": "File not found"
                })),
            )
                .into_response()
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"success": false, "error": e.to_string()})),
            )
                .into_response()
        }
    }

    let result = ctx.app.sync.sync_file(request.uid).await;
    if result.status == SyncStatus::Failed {
        tracing::warn!(
            file = %request.uid,
            message = result.message.as_deref().unwrap_or(""),
            "Metadata update failed"
        );
    }

    Json(UpdateResponse {
        success: result.is_success(),
        uid: result.file_uid,
        title: result.title,
    })
    .into_response()
}
