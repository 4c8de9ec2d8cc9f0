use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::CharacterRepository;

use crate::openapi;

pub mod characters;

/// Shared handler state: the character registry behind its trait seam.
#[derive(Clone)]
pub struct AppState {
    pub characters: Arc<dyn CharacterRepository>,
}

impl AppState {
    pub fn new(characters: Arc<dyn CharacterRepository>) -> Self {
        Self { characters }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: character CRUD plus health and schema
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route(
            "/",
            get(characters::list_characters).post(characters::create_character),
        )
        .route(
            "/:id/",
            get(characters::get_character)
                .put(characters::update_character)
                .delete(characters::delete_character),
        )
        .route("/health", get(health))
        .route("/schema/", get(openapi::schema))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
