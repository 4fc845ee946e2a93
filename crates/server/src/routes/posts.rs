use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use models::{Comment, Fields, LikeAction, Post};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    #[serde(default)]
    pub action: Option<Value>,
}

/// 列出全部帖子
pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.posts.list().await)
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(fields): Json<Fields>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state.posts.create(fields).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<usize>,
    Json(patch): Json<Fields>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.posts.update(id, patch).await?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<usize>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.posts.delete(id).await?))
}

/// `{"action": "like" | "unlike"}`; other actions return the post unchanged.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<usize>,
    Json(req): Json<LikeRequest>,
) -> Result<Json<Post>, ApiError> {
    let action = LikeAction::from_value(req.action.as_ref());
    Ok(Json(state.posts.like(id, action).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<usize>,
    Json(fields): Json<Fields>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.posts.add_comment(id, fields).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
