use axum::Json;
use models::{Character, CharacterInput};
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBody {
    /// Always `Marvel character not found` for unknown ids
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::characters::list_characters,
        crate::routes::characters::create_character,
        crate::routes::characters::get_character,
        crate::routes::characters::update_character,
        crate::routes::characters::delete_character,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            Character,
            CharacterInput,
        )
    ),
    tags(
        (name = "health"),
        (name = "characters")
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document.
pub async fn schema() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
