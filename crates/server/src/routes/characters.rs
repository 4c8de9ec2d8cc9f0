use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use models::{Character, CharacterInput};
use serde_json::Value;
use tracing::debug;

use crate::errors::ApiError;
use crate::routes::AppState;

/// A non-integer id can never match a stored character.
fn character_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "unparseable character id");
            Err(ApiError::NotFound)
        }
    }
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(v)| v).map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// 列出所有角色（按 id 升序）
#[utoipa::path(
    get, path = "/", tag = "characters",
    responses((status = 200, description = "All characters ordered by id", body = [Character]))
)]
pub async fn list_characters(State(state): State<AppState>) -> Json<Vec<Character>> {
    Json(state.characters.list().await)
}

/// 创建角色，id 由服务端分配
#[utoipa::path(
    post, path = "/", tag = "characters",
    request_body = CharacterInput,
    responses(
        (status = 201, description = "Created", body = Character),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create_character(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    let input = CharacterInput::from_json(&json_body(body)?).map_err(ApiError::Validation)?;
    let created = state.characters.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 获取指定角色
#[utoipa::path(
    get, path = "/{id}/", tag = "characters",
    params(("id" = i64, Path, description = "Character id")),
    responses(
        (status = 200, description = "OK", body = Character),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get_character(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Character>, ApiError> {
    let id = character_id(id)?;
    Ok(Json(state.characters.get(id).await?))
}

/// 整体替换指定角色；路径中的 id 优先于请求体
#[utoipa::path(
    put, path = "/{id}/", tag = "characters",
    params(("id" = i64, Path, description = "Character id")),
    request_body = CharacterInput,
    responses(
        (status = 200, description = "Updated", body = Character),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn update_character(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Character>, ApiError> {
    let id = character_id(id)?;
    let parsed = json_body(body).map(|v| CharacterInput::from_json(&v));
    match parsed {
        Ok(Ok(input)) => Ok(Json(state.characters.update(id, input).await?)),
        // 未知 id 优先报告 404，其次才是请求体错误
        Ok(Err(errors)) => {
            state.characters.get(id).await?;
            Err(ApiError::Validation(errors))
        }
        Err(e) => {
            state.characters.get(id).await?;
            Err(e)
        }
    }
}

/// 删除指定角色
#[utoipa::path(
    delete, path = "/{id}/", tag = "characters",
    params(("id" = i64, Path, description = "Character id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn delete_character(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = character_id(id)?;
    state.characters.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
