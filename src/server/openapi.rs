//! OpenAPI documentation and Swagger UI integration.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::AppContext;

/// OpenAPI documentation for the Twitch media service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Twitch Media API",
        version = "0.1.0",
        description = "Twitch online media metadata sync and embed rendering",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "/", description = "Default server")
    ),
    paths(
        super::routes_admin::update_file,
        super::routes_files::get_embed,
        super::routes_files::get_preview,
    ),
    components(
        schemas(
            super::routes_admin::UpdateRequest,
            super::routes_admin::UpdateResponse,
        )
    ),
    tags(
        (name = "ajax", description = "Backend actions"),
        (name = "files", description = "Online media files")
    )
)]
pub struct ApiDoc;

/// Create OpenAPI documentation routes.
/// - `/docs` - Swagger UI
/// - `/openapi.json` - Raw OpenAPI JSON spec (served by SwaggerUi)
pub fn openapi_routes() -> Router<AppContext> {
    Router::new().merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}
